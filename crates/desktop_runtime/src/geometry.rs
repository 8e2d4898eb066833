//! Pure clamping and gesture math used by the window manager.

use desktop_app_contract::Size;

use crate::model::{Geometry, Viewport};

/// Floors `geometry`'s size at `min`, bounds it by the viewport, and clamps its position so the
/// whole window is inside the viewport.
///
/// When the viewport is smaller than `min`, the viewport wins.
pub fn fit_to_viewport(geometry: Geometry, min: Size, viewport: Viewport) -> Geometry {
    let width = geometry.width.max(min.width).min(viewport.width).max(0);
    let height = geometry.height.max(min.height).min(viewport.height).max(0);
    Geometry {
        x: geometry.x.clamp(0, (viewport.width - width).max(0)),
        y: geometry.y.clamp(0, (viewport.height - height).max(0)),
        width,
        height,
    }
}

/// Translates `origin` by the pointer delta, keeping the window horizontally inside the viewport
/// and its top `margin` pixels vertically inside it.
pub fn drag_to(origin: Geometry, dx: i32, dy: i32, viewport: Viewport, margin: i32) -> Geometry {
    let moved = origin.offset(dx, dy);
    Geometry {
        x: moved.x.clamp(0, (viewport.width - origin.width).max(0)),
        y: moved.y.clamp(0, (viewport.height - margin).max(0)),
        ..origin
    }
}

/// Extends `origin`'s size by the pointer delta with the top-left corner anchored.
///
/// Each dimension is floored at `min` and never grows past the viewport's right/bottom edge.
/// A window already hanging past an edge keeps its current size rather than being shrunk.
pub fn resize_to(origin: Geometry, dx: i32, dy: i32, min: Size, viewport: Viewport) -> Geometry {
    let width_limit = (viewport.width - origin.x).max(origin.width);
    let height_limit = (viewport.height - origin.y).max(origin.height);
    Geometry {
        width: origin.width.saturating_add(dx).max(min.width).min(width_limit),
        height: origin.height.saturating_add(dy).max(min.height).min(height_limit),
        ..origin
    }
}

/// Caps `geometry`'s size at the viewport and applies the drag clamp in place.
///
/// Used when the viewport itself changes, so a window moved low by the user stays where it was
/// as long as its title strip is still reachable.
pub fn clamp_reachable(geometry: Geometry, viewport: Viewport, margin: i32) -> Geometry {
    let sized = Geometry {
        width: geometry.width.min(viewport.width).max(0),
        height: geometry.height.min(viewport.height).max(0),
        ..geometry
    };
    drag_to(sized, 0, 0, viewport, margin)
}
