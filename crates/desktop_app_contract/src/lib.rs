//! Shared contract types between the desktop window manager and the modules it hosts.
//!
//! A module is registered once under a stable [`ModuleId`] with a [`ModuleDescriptor`]. The
//! window manager reads sizing defaults from the descriptor and drives the module's
//! [`ModuleHooks`]; it never mutates the descriptor itself.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use std::{fmt, rc::Rc};

use platform_host::ScopedStore;
use serde::{Deserialize, Serialize};

pub mod registry;

pub use registry::ModuleRegistry;

/// Store namespace prefix for module-private state.
pub const MODULE_STORE_PREFIX: &str = "module";

/// Stable identifier for a module and, while it is open, its window.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleId(String);

impl ModuleId {
    /// Returns a module id when `raw` is a short lowercase token (`notes`, `mine-sweeper`,
    /// `games.snake`).
    pub fn new(raw: impl Into<String>) -> Result<Self, String> {
        let raw = raw.into();
        if is_valid_module_id(&raw) {
            Ok(Self(raw))
        } else {
            Err(format!(
                "invalid module id `{raw}`; expected lowercase letters, digits, `-`, `_` or `.`"
            ))
        }
    }

    /// Creates an id without validation for trusted constants.
    pub fn trusted(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the string form of the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_valid_module_id(raw: &str) -> bool {
    if raw.is_empty() || raw.len() > 64 {
        return false;
    }
    let Some(first) = raw.bytes().next() else {
        return false;
    };
    if !first.is_ascii_lowercase() {
        return false;
    }
    raw.bytes().all(|b| {
        b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'_' || b == b'.'
    }) && !raw.ends_with(['-', '_', '.'])
}

/// Width/height pair in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Size {
    /// Creates a size.
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Handle to the content region of a mounted window.
///
/// The surface host decides what the handle points at; for the browser shell it is the id of
/// the window body element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentArea {
    /// Window the area belongs to.
    pub window_id: ModuleId,
    /// Host-specific element identifier.
    pub element_id: String,
}

impl ContentArea {
    /// Content area with the conventional `window-<id>-content` element id.
    pub fn for_window(window_id: &ModuleId) -> Self {
        Self {
            window_id: window_id.clone(),
            element_id: format!("window-{window_id}-content"),
        }
    }
}

/// Lifecycle hooks a module exposes to the window manager.
///
/// Hooks take `&self`; modules keep their own state behind interior mutability since the whole
/// shell runs on one thread. Failures are reported as strings and logged by the caller.
pub trait ModuleHooks {
    /// Called once per window creation with the window's content area and a store scoped to
    /// the module.
    fn init(&self, content: &ContentArea, store: ScopedStore) -> Result<(), String>;

    /// Draws the module into the content area passed to [`ModuleHooks::init`].
    fn render(&self) -> Result<(), String>;

    /// Releases module resources before the window is torn down.
    fn destroy(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Registration metadata and hooks for one module.
#[derive(Clone)]
pub struct ModuleDescriptor {
    /// Stable module id.
    pub id: ModuleId,
    /// Human-readable title shown in window chrome and launchers.
    pub title: String,
    /// Icon identifier, opaque to the window manager.
    pub icon: String,
    /// Size used when no persisted geometry exists.
    pub default_size: Size,
    /// Smallest size resizing may reach. The window manager's default applies when absent.
    pub min_size: Option<Size>,
    /// Lifecycle hooks.
    pub hooks: Rc<dyn ModuleHooks>,
}

impl fmt::Debug for ModuleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleDescriptor")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("icon", &self.icon)
            .field("default_size", &self.default_size)
            .field("min_size", &self.min_size)
            .finish_non_exhaustive()
    }
}

impl ModuleDescriptor {
    /// Creates a descriptor without a minimum size.
    pub fn new(
        id: ModuleId,
        title: impl Into<String>,
        icon: impl Into<String>,
        default_size: Size,
        hooks: Rc<dyn ModuleHooks>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            icon: icon.into(),
            default_size,
            min_size: None,
            hooks,
        }
    }

    /// Sets the minimum size.
    pub fn with_min_size(mut self, min_size: Size) -> Self {
        self.min_size = Some(min_size);
        self
    }

    /// Namespace of the store view handed to this module's `init` hook.
    pub fn store_namespace(&self) -> String {
        format!("{MODULE_STORE_PREFIX}.{}", self.id)
    }
}

/// Hooks that do nothing, for modules that only need a window frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopModuleHooks;

impl ModuleHooks for NoopModuleHooks {
    fn init(&self, _content: &ContentArea, _store: ScopedStore) -> Result<(), String> {
        Ok(())
    }

    fn render(&self) -> Result<(), String> {
        Ok(())
    }
}
