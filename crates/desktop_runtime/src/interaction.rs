//! Pointer gesture state machine for window drag and resize.
//!
//! One slot for the whole manager: a gesture is either idle, dragging one window or resizing one
//! window. Each active session owns the pointer capture lent by the surface host, so leaving the
//! active state through [`Gesture::take`] is the single place capture is released.

use std::mem;

use crate::{
    host::PointerCapture,
    model::{Geometry, PointerPosition, WindowId},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    Drag,
    Resize,
}

#[derive(Debug)]
pub struct GestureSession {
    pub window_id: WindowId,
    pub pointer_start: PointerPosition,
    /// Window geometry when the gesture began; cancel reverts to it.
    pub origin: Geometry,
    _capture: PointerCapture,
}

impl GestureSession {
    pub(crate) fn new(
        window_id: WindowId,
        pointer_start: PointerPosition,
        origin: Geometry,
        capture: PointerCapture,
    ) -> Self {
        Self {
            window_id,
            pointer_start,
            origin,
            _capture: capture,
        }
    }

    /// Pointer movement since the gesture began, saturating at the `i32` range.
    pub fn delta(&self, pointer: PointerPosition) -> (i32, i32) {
        (
            pointer.x.saturating_sub(self.pointer_start.x),
            pointer.y.saturating_sub(self.pointer_start.y),
        )
    }
}

#[derive(Debug, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Dragging(GestureSession),
    Resizing(GestureSession),
}

impl Gesture {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn kind(&self) -> Option<GestureKind> {
        match self {
            Self::Idle => None,
            Self::Dragging(_) => Some(GestureKind::Drag),
            Self::Resizing(_) => Some(GestureKind::Resize),
        }
    }

    pub fn session(&self) -> Option<&GestureSession> {
        match self {
            Self::Idle => None,
            Self::Dragging(session) | Self::Resizing(session) => Some(session),
        }
    }

    /// Whether the active gesture targets `window_id`.
    pub fn involves(&self, window_id: &WindowId) -> bool {
        self.session()
            .is_some_and(|session| &session.window_id == window_id)
    }

    /// Enters the active state. Fails, handing the session back, when a gesture is already active.
    pub(crate) fn start(
        &mut self,
        kind: GestureKind,
        session: GestureSession,
    ) -> Result<(), GestureSession> {
        if !self.is_idle() {
            return Err(session);
        }
        *self = match kind {
            GestureKind::Drag => Self::Dragging(session),
            GestureKind::Resize => Self::Resizing(session),
        };
        Ok(())
    }

    /// Returns to idle, yielding the finished session. Dropping it releases pointer capture.
    pub(crate) fn take(&mut self) -> Option<(GestureKind, GestureSession)> {
        match mem::take(self) {
            Self::Idle => None,
            Self::Dragging(session) => Some((GestureKind::Drag, session)),
            Self::Resizing(session) => Some((GestureKind::Resize, session)),
        }
    }
}
