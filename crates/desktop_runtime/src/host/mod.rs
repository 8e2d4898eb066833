//! Rendering seam between the window manager and whatever draws windows.
//!
//! The window manager owns window state; a [`SurfaceHost`] mirrors that state onto a canvas
//! (the DOM in the browser, nothing in headless tests) and lends pointer capture to gestures.

#[cfg(target_arch = "wasm32")]
mod dom;

use std::fmt;

use desktop_app_contract::ContentArea;

#[cfg(target_arch = "wasm32")]
pub use dom::DomSurfaceHost;

use crate::model::{PointerPosition, WindowId, WindowRecord};

/// Renders window records and tears them down.
pub trait SurfaceHost {
    /// Creates the window's surface and returns the content area modules draw into.
    fn mount(&self, record: &WindowRecord) -> ContentArea;

    /// Syncs geometry, stacking and visibility of an already mounted window.
    fn apply(&self, record: &WindowRecord);

    /// Removes the window's surface.
    fn unmount(&self, window_id: &WindowId);

    /// Routes input from `pointer`'s pointer id to `window_id` until the returned guard is
    /// dropped.
    fn capture_pointer(&self, window_id: &WindowId, pointer: PointerPosition) -> PointerCapture {
        let _ = (window_id, pointer);
        PointerCapture::noop()
    }
}

/// Scoped pointer capture; releases on drop.
pub struct PointerCapture {
    release: Option<Box<dyn FnOnce()>>,
}

impl fmt::Debug for PointerCapture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointerCapture")
            .field("held", &self.release.is_some())
            .finish()
    }
}

impl PointerCapture {
    /// Capture that runs `release` exactly once when dropped.
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Capture with nothing to release.
    pub fn noop() -> Self {
        Self { release: None }
    }
}

impl Drop for PointerCapture {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Surface host for headless use; every window gets a conventional content area.
pub struct NoopSurfaceHost;

impl SurfaceHost for NoopSurfaceHost {
    fn mount(&self, record: &WindowRecord) -> ContentArea {
        ContentArea::for_window(&record.id)
    }

    fn apply(&self, _record: &WindowRecord) {}

    fn unmount(&self, _window_id: &WindowId) {}
}
