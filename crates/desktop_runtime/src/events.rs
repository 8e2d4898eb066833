//! Typed notification bus owned by the window manager.
//!
//! Shell consumers (taskbar, start menu, desktop icons) subscribe here instead of polling window
//! state. Every subscription is tied to a [`Subscription`] handle that detaches the listener when
//! it is dropped or explicitly unsubscribed.

use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
    fmt,
    rc::{Rc, Weak},
};

use serde::{Deserialize, Serialize};

use crate::model::WindowId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Kinds of window notifications.
pub enum WindowEventKind {
    /// A new window record was created and mounted.
    Opened,
    /// A window record was destroyed.
    Closed,
    /// A window was hidden from the canvas.
    Minimized,
    /// A minimized window was shown again.
    Restored,
    /// A window became the active window.
    Focused,
}

impl WindowEventKind {
    /// Stable event name used by shell consumers.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Opened => "window-opened",
            Self::Closed => "window-closed",
            Self::Minimized => "window-minimized",
            Self::Restored => "window-restored",
            Self::Focused => "window-focused",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One emitted notification.
pub struct WindowNotification {
    /// What happened.
    pub kind: WindowEventKind,
    /// Window it happened to.
    pub window_id: WindowId,
}

type Listener = Rc<dyn Fn(&WindowNotification)>;

#[derive(Default)]
struct BusInner {
    next_listener_id: u64,
    listeners: BTreeMap<u64, Listener>,
}

#[derive(Clone, Default)]
/// Publish/subscribe channel for [`WindowNotification`]s.
pub struct WindowEventBus {
    inner: Rc<RefCell<BusInner>>,
}

impl fmt::Debug for WindowEventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowEventBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl WindowEventBus {
    /// Registers `listener`; it stays attached for as long as the returned handle lives.
    #[must_use = "dropping the subscription detaches the listener immediately"]
    pub fn subscribe(&self, listener: impl Fn(&WindowNotification) + 'static) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_listener_id;
        inner.next_listener_id += 1;
        inner.listeners.insert(id, Rc::new(listener));
        Subscription {
            bus: Rc::downgrade(&self.inner),
            id,
            active: Cell::new(true),
        }
    }

    /// Number of attached listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// Delivers `notification` to every listener attached when emission starts.
    ///
    /// Listeners may subscribe or unsubscribe from inside the callback.
    pub(crate) fn emit(&self, kind: WindowEventKind, window_id: &WindowId) {
        let notification = WindowNotification {
            kind,
            window_id: window_id.clone(),
        };
        let listeners = self
            .inner
            .borrow()
            .listeners
            .values()
            .cloned()
            .collect::<Vec<_>>();
        for listener in listeners {
            listener(&notification);
        }
    }
}

/// Drop-based handle for a bus listener.
pub struct Subscription {
    bus: Weak<RefCell<BusInner>>,
    id: u64,
    active: Cell<bool>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.active.get())
            .finish()
    }
}

impl Subscription {
    /// Detaches the listener if still attached.
    pub fn unsubscribe(&self) {
        if self.active.replace(false) {
            if let Some(bus) = self.bus.upgrade() {
                // Drop the listener after the borrow ends; its captures may own subscriptions.
                let removed = bus.borrow_mut().listeners.remove(&self.id);
                drop(removed);
            }
        }
    }

    /// Whether the listener is still attached.
    pub fn is_active(&self) -> bool {
        self.active.get() && self.bus.strong_count() > 0
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
