//! Window state types: live records, rectangles and the persisted projection.

use desktop_app_contract::{ModuleId, Size};
use serde::{Deserialize, Serialize};

/// Smallest width a window may be resized to when its module declares no minimum.
pub const DEFAULT_MIN_WINDOW_WIDTH: i32 = 220;
/// Smallest height a window may be resized to when its module declares no minimum.
pub const DEFAULT_MIN_WINDOW_HEIGHT: i32 = 140;
/// Height of the strip that must stay inside the viewport while dragging (the title bar).
pub const MIN_VISIBLE_MARGIN: i32 = 32;
/// Pointer id browsers assign to the mouse.
pub const PRIMARY_POINTER_ID: i32 = 1;

/// Windows are keyed by the id of the module they host.
pub type WindowId = ModuleId;

/// Window rectangle in viewport pixels, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geometry {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Geometry {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Same size, moved by `(dx, dy)`. Saturates instead of overflowing.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            ..self
        }
    }

    pub fn size(self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Size of the desktop area windows are clamped into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: i32,
    pub height: i32,
}

impl Viewport {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// The rectangle a maximized window occupies.
    pub fn rect(self) -> Geometry {
        Geometry::new(0, 0, self.width, self.height)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280, 800)
    }
}

/// Pointer location in viewport pixels, tagged with the id of the pointer that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: i32,
    pub y: i32,
    #[serde(default = "primary_pointer_id")]
    pub pointer_id: i32,
}

fn primary_pointer_id() -> i32 {
    PRIMARY_POINTER_ID
}

impl PointerPosition {
    /// Position of the primary (mouse) pointer.
    pub const fn new(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            pointer_id: PRIMARY_POINTER_ID,
        }
    }

    pub const fn with_pointer_id(self, pointer_id: i32) -> Self {
        Self { pointer_id, ..self }
    }

    /// Reads client coordinates and pointer id from a DOM pointer event.
    #[cfg(target_arch = "wasm32")]
    pub fn from_pointer_event(ev: &web_sys::PointerEvent) -> Self {
        Self::new(ev.client_x(), ev.client_y()).with_pointer_id(ev.pointer_id())
    }
}

/// Live state for one open window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowRecord {
    pub id: WindowId,
    pub title: String,
    pub icon: String,
    pub geometry: Geometry,
    pub z_index: u64,
    pub minimized: bool,
    pub maximized: bool,
    /// Geometry captured right before the last maximize.
    pub restore_geometry: Option<Geometry>,
    pub open: bool,
}

impl WindowRecord {
    /// Geometry the window has (or returns to) outside the maximized state.
    pub fn normal_geometry(&self) -> Geometry {
        if self.maximized {
            self.restore_geometry.unwrap_or(self.geometry)
        } else {
            self.geometry
        }
    }

    /// What gets written to the store for this window.
    pub fn persisted_state(&self) -> PersistedWindowState {
        PersistedWindowState::from_geometry(
            self.normal_geometry(),
            self.minimized,
            self.maximized,
            self.open,
        )
    }
}

/// Durable projection of a [`WindowRecord`], one per module id.
///
/// While a window is maximized the stored rectangle is its restore geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedWindowState {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub minimized: bool,
    pub maximized: bool,
    pub open: bool,
}

impl PersistedWindowState {
    /// Flattens `geometry` and the state flags into the stored schema.
    pub const fn from_geometry(
        geometry: Geometry,
        minimized: bool,
        maximized: bool,
        open: bool,
    ) -> Self {
        Self {
            x: geometry.x,
            y: geometry.y,
            width: geometry.width,
            height: geometry.height,
            minimized,
            maximized,
            open,
        }
    }

    /// The stored rectangle.
    pub const fn geometry(&self) -> Geometry {
        Geometry::new(self.x, self.y, self.width, self.height)
    }
}
