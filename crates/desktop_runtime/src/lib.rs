//! Window manager runtime for the browser desktop shell.
//!
//! [`WindowManager`] owns every open window: geometry, stacking order, focus, minimize/maximize
//! transitions, pointer gestures and the persistence round-trip through a
//! [`platform_host::KeyValueStore`]. Shell consumers read its state, subscribe to its
//! [`WindowEventBus`], and call its public operations; [`bootstrap`] wires a
//! [`desktop_app_contract::ModuleRegistry`] to it.

pub mod bootstrap;
pub mod config;
pub mod events;
pub mod geometry;
pub mod host;
pub mod interaction;
pub mod model;
pub mod persistence;
pub mod placement;
pub mod window_manager;

pub use bootstrap::{open_module, restore_session};
pub use config::{PlacementBounds, WindowManagerConfig, WINDOWS_NAMESPACE};
pub use events::{Subscription, WindowEventBus, WindowEventKind, WindowNotification};
#[cfg(target_arch = "wasm32")]
pub use host::DomSurfaceHost;
pub use host::{NoopSurfaceHost, PointerCapture, SurfaceHost};
pub use interaction::{Gesture, GestureKind, GestureSession};
pub use model::*;
pub use persistence::WindowStatePersistence;
pub use placement::{CascadePlacement, FixedPlacement, PlacementSource, SeededPlacement};
pub use window_manager::{OpenOutcome, WindowManager, WindowManagerError};
