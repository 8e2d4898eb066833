//! Window manager configuration.

use desktop_app_contract::Size;
use serde::{Deserialize, Serialize};

use crate::model::{
    Viewport, DEFAULT_MIN_WINDOW_HEIGHT, DEFAULT_MIN_WINDOW_WIDTH, MIN_VISIBLE_MARGIN,
};

/// Store namespace holding one persisted entry per module id.
pub const WINDOWS_NAMESPACE: &str = "windows";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Range of the offset from the viewport origin given to windows without a saved position.
pub struct PlacementBounds {
    /// Smallest offset on either axis.
    pub min_offset: i32,
    /// Largest offset on either axis.
    pub max_offset: i32,
}

impl Default for PlacementBounds {
    fn default() -> Self {
        Self {
            min_offset: 24,
            max_offset: 160,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Settings the application entry point hands to [`crate::WindowManager::new`].
pub struct WindowManagerConfig {
    /// Initial rendering surface size.
    pub viewport: Viewport,
    /// Minimum window size for modules that declare none.
    pub default_min_size: Size,
    /// Pixels of a dragged window that must stay above the viewport's bottom edge.
    pub min_visible_margin: i32,
    /// Store namespace for persisted window state.
    pub persistence_namespace: String,
    /// Offset range for new-window placement.
    pub placement: PlacementBounds,
}

impl Default for WindowManagerConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            default_min_size: Size::new(DEFAULT_MIN_WINDOW_WIDTH, DEFAULT_MIN_WINDOW_HEIGHT),
            min_visible_margin: MIN_VISIBLE_MARGIN,
            persistence_namespace: WINDOWS_NAMESPACE.to_string(),
            placement: PlacementBounds::default(),
        }
    }
}

impl WindowManagerConfig {
    /// Parses a (possibly partial) JSON config; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error when `raw` is not valid JSON for this shape.
    pub fn from_json(raw: &str) -> Result<Self, String> {
        serde_json::from_str(raw).map_err(|e| e.to_string())
    }

    /// Same config with a different viewport.
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }
}
