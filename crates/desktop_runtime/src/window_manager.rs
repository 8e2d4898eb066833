//! The window manager: live window set, stacking and focus, drag/resize gestures and the
//! persistence round-trip.
//!
//! Every operation runs to completion synchronously. Operations that reference a window with no
//! live record are logged no-ops returning `false`; nothing here panics or surfaces a fatal error.

use std::{collections::BTreeMap, fmt, rc::Rc};

use desktop_app_contract::{ContentArea, ModuleDescriptor, Size};
use leptos::logging;
use platform_host::{KeyValueStore, ScopedStore};
use thiserror::Error;

use crate::{
    config::WindowManagerConfig,
    events::{Subscription, WindowEventBus, WindowEventKind, WindowNotification},
    geometry::{clamp_reachable, drag_to, fit_to_viewport, resize_to},
    host::{NoopSurfaceHost, SurfaceHost},
    interaction::{Gesture, GestureKind, GestureSession},
    model::{
        Geometry, PersistedWindowState, PointerPosition, Viewport, WindowId, WindowRecord,
    },
    persistence::WindowStatePersistence,
    placement::{PlacementSource, SeededPlacement},
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Errors reported to callers that open modules by id.
pub enum WindowManagerError {
    /// No module with this id is registered; no window was created.
    #[error("module `{0}` is not registered")]
    ModuleNotRegistered(WindowId),
    /// The requested id is not a valid module id.
    #[error("{0}")]
    InvalidModuleId(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// What [`WindowManager::create_or_focus`] did.
pub enum OpenOutcome {
    /// A new window record was created.
    Created,
    /// The existing window was raised.
    Focused,
    /// The existing window was minimized and has been restored.
    Restored,
}

struct LiveWindow {
    record: WindowRecord,
    module: Rc<ModuleDescriptor>,
}

/// Owns every open window for one desktop.
pub struct WindowManager {
    config: WindowManagerConfig,
    viewport: Viewport,
    persistence: WindowStatePersistence,
    surfaces: Rc<dyn SurfaceHost>,
    placement: Box<dyn PlacementSource>,
    windows: BTreeMap<WindowId, LiveWindow>,
    next_z_index: u64,
    active: Option<WindowId>,
    gesture: Gesture,
    events: WindowEventBus,
}

impl fmt::Debug for WindowManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowManager")
            .field("viewport", &self.viewport)
            .field("windows", &self.windows.keys().collect::<Vec<_>>())
            .field("next_z_index", &self.next_z_index)
            .field("active", &self.active)
            .field("gesture", &self.gesture.kind())
            .finish_non_exhaustive()
    }
}

fn min_size(module: &ModuleDescriptor, fallback: Size) -> Size {
    module.min_size.unwrap_or(fallback)
}

impl WindowManager {
    /// Creates a manager persisting into `store` and rendering through `surfaces`.
    ///
    /// New windows are placed with a clock-seeded [`SeededPlacement`]; use
    /// [`WindowManager::with_placement`] for deterministic placement.
    pub fn new(
        config: WindowManagerConfig,
        store: Rc<dyn KeyValueStore>,
        surfaces: Rc<dyn SurfaceHost>,
    ) -> Self {
        let persistence = WindowStatePersistence::new(store, config.persistence_namespace.clone());
        Self {
            viewport: config.viewport,
            config,
            persistence,
            surfaces,
            placement: Box::new(SeededPlacement::from_clock()),
            windows: BTreeMap::new(),
            next_z_index: 0,
            active: None,
            gesture: Gesture::Idle,
            events: WindowEventBus::default(),
        }
    }

    /// Creates a manager that renders nothing.
    pub fn headless(config: WindowManagerConfig, store: Rc<dyn KeyValueStore>) -> Self {
        Self::new(config, store, Rc::new(NoopSurfaceHost))
    }

    /// Replaces the placement source for windows without saved geometry.
    pub fn with_placement(mut self, placement: impl PlacementSource + 'static) -> Self {
        self.placement = Box::new(placement);
        self
    }

    /// Opens a window for `module`, or refocuses the one already open.
    pub fn create_or_focus(&mut self, module: Rc<ModuleDescriptor>) -> OpenOutcome {
        let id = module.id.clone();
        if let Some(minimized) = self.windows.get(&id).map(|w| w.record.minimized) {
            if minimized {
                self.restore(&id);
                return OpenOutcome::Restored;
            }
            self.bring_to_front(&id);
            return OpenOutcome::Focused;
        }

        let min = min_size(&module, self.config.default_min_size);
        let (seed, maximized) = match self.persistence.load(&id) {
            Some(saved) => (saved.geometry(), saved.maximized),
            None => {
                let (x, y) = self.placement.next_offset(self.config.placement);
                let size = module.default_size;
                (Geometry::new(x, y, size.width, size.height), false)
            }
        };
        let normal = fit_to_viewport(seed, min, self.viewport);
        let record = WindowRecord {
            id: id.clone(),
            title: module.title.clone(),
            icon: module.icon.clone(),
            geometry: if maximized {
                self.viewport.rect()
            } else {
                normal
            },
            z_index: self.allocate_z_index(),
            minimized: false,
            maximized,
            restore_geometry: maximized.then_some(normal),
            open: true,
        };
        self.persistence.save_record(&record);
        let content = self.surfaces.mount(&record);
        self.windows.insert(
            id.clone(),
            LiveWindow {
                record,
                module: module.clone(),
            },
        );
        self.run_mount_hooks(&module, &content);
        self.events.emit(WindowEventKind::Opened, &id);
        self.set_active(Some(id));
        OpenOutcome::Created
    }

    fn run_mount_hooks(&self, module: &ModuleDescriptor, content: &ContentArea) {
        let store = ScopedStore::new(self.persistence.store(), module.store_namespace());
        if let Err(err) = module.hooks.init(content, store) {
            logging::warn!("module `{}` init failed: {err}", module.id);
            return;
        }
        if let Err(err) = module.hooks.render() {
            logging::warn!("module `{}` render failed: {err}", module.id);
        }
    }

    /// Raises `window_id` above every other window and makes it active.
    ///
    /// A minimized window is restored instead. Every call allocates a fresh stacking value.
    pub fn bring_to_front(&mut self, window_id: &WindowId) -> bool {
        let Some(minimized) = self.windows.get(window_id).map(|w| w.record.minimized) else {
            return self.missing("bring_to_front", window_id);
        };
        if minimized {
            return self.restore(window_id);
        }
        let z_index = self.allocate_z_index();
        if let Some(window) = self.windows.get_mut(window_id) {
            window.record.z_index = z_index;
            self.surfaces.apply(&window.record);
        }
        self.set_active(Some(window_id.clone()));
        true
    }

    /// Hides a window without touching its geometry or stacking value.
    pub fn minimize(&mut self, window_id: &WindowId) -> bool {
        if !self.windows.contains_key(window_id) {
            return self.missing("minimize", window_id);
        }
        if self.gesture.involves(window_id) {
            self.cancel_gesture();
        }
        let Some(window) = self.windows.get_mut(window_id) else {
            return false;
        };
        if window.record.minimized {
            return false;
        }
        window.record.minimized = true;
        self.surfaces.apply(&window.record);
        self.persistence.save_record(&window.record);
        self.events.emit(WindowEventKind::Minimized, window_id);
        if self.active.as_ref() == Some(window_id) {
            self.active = None;
            self.focus_topmost_visible();
        }
        true
    }

    /// Shows a minimized window again and raises it.
    pub fn restore(&mut self, window_id: &WindowId) -> bool {
        let Some(window) = self.windows.get_mut(window_id) else {
            return self.missing("restore", window_id);
        };
        if !window.record.minimized {
            return false;
        }
        window.record.minimized = false;
        self.bring_to_front(window_id);
        self.persist(window_id);
        self.events.emit(WindowEventKind::Restored, window_id);
        true
    }

    /// Maximizes a normal window or returns a maximized one to its saved geometry, re-clamped
    /// against the current viewport.
    ///
    /// Does nothing while the window is minimized.
    pub fn toggle_maximize(&mut self, window_id: &WindowId) -> bool {
        let Some(minimized) = self.windows.get(window_id).map(|w| w.record.minimized) else {
            return self.missing("toggle_maximize", window_id);
        };
        if minimized {
            logging::log!("toggle_maximize ignored: window `{window_id}` is minimized");
            return false;
        }
        if self.gesture.involves(window_id) {
            self.cancel_gesture();
        }
        let viewport = self.viewport;
        let margin = self.config.min_visible_margin;
        let Some(window) = self.windows.get_mut(window_id) else {
            return false;
        };
        let record = &mut window.record;
        if record.maximized {
            let normal = record.restore_geometry.unwrap_or(record.geometry);
            record.geometry = clamp_reachable(normal, viewport, margin);
            record.restore_geometry = Some(record.geometry);
            record.maximized = false;
        } else {
            record.restore_geometry = Some(record.geometry);
            record.geometry = viewport.rect();
            record.maximized = true;
        }
        self.surfaces.apply(&window.record);
        self.persistence.save_record(&window.record);
        true
    }

    /// Destroys a window: runs the module's `destroy` hook, removes the surface and the record,
    /// and records `open = false`.
    pub fn close(&mut self, window_id: &WindowId) -> bool {
        let Some(window) = self.windows.remove(window_id) else {
            return self.missing("close", window_id);
        };
        if self.gesture.involves(window_id) {
            drop(self.gesture.take());
        }
        if let Err(err) = window.module.hooks.destroy() {
            logging::warn!("module `{window_id}` destroy failed: {err}");
        }
        self.surfaces.unmount(window_id);
        self.persistence.save_closed(&window.record);
        self.events.emit(WindowEventKind::Closed, window_id);
        if self.active.as_ref() == Some(window_id) {
            self.active = None;
            self.focus_topmost_visible();
        }
        true
    }

    /// Taskbar button behavior: restore if minimized, minimize if active, otherwise raise.
    pub fn toggle_taskbar(&mut self, window_id: &WindowId) -> bool {
        let Some(minimized) = self.windows.get(window_id).map(|w| w.record.minimized) else {
            return self.missing("toggle_taskbar", window_id);
        };
        if minimized {
            self.restore(window_id)
        } else if self.active.as_ref() == Some(window_id) {
            self.minimize(window_id)
        } else {
            self.bring_to_front(window_id)
        }
    }

    /// Starts dragging `window_id`. Rejected while maximized, minimized, or while any other
    /// gesture is active.
    pub fn begin_drag(&mut self, window_id: &WindowId, pointer: PointerPosition) -> bool {
        self.begin_gesture(GestureKind::Drag, window_id, pointer)
    }

    /// Starts resizing `window_id` from its bottom-right corner. Same guards as
    /// [`WindowManager::begin_drag`].
    pub fn begin_resize(&mut self, window_id: &WindowId, pointer: PointerPosition) -> bool {
        self.begin_gesture(GestureKind::Resize, window_id, pointer)
    }

    fn begin_gesture(
        &mut self,
        kind: GestureKind,
        window_id: &WindowId,
        pointer: PointerPosition,
    ) -> bool {
        let Some(window) = self.windows.get(window_id) else {
            return self.missing("begin gesture", window_id);
        };
        if window.record.maximized || window.record.minimized {
            logging::log!("{kind:?} ignored: window `{window_id}` is not in normal state");
            return false;
        }
        if !self.gesture.is_idle() {
            logging::warn!("{kind:?} on `{window_id}` rejected: another gesture is active");
            return false;
        }
        self.bring_to_front(window_id);
        let Some(origin) = self.windows.get(window_id).map(|w| w.record.geometry) else {
            return false;
        };
        let capture = self.surfaces.capture_pointer(window_id, pointer);
        let session = GestureSession::new(window_id.clone(), pointer, origin, capture);
        self.gesture.start(kind, session).is_ok()
    }

    /// Applies a pointer move to the active gesture. Nothing is persisted mid-gesture.
    pub fn on_pointer_move(&mut self, pointer: PointerPosition) -> bool {
        let (Some(kind), Some(session)) = (self.gesture.kind(), self.gesture.session()) else {
            return false;
        };
        let (dx, dy) = session.delta(pointer);
        let origin = session.origin;
        let window_id = session.window_id.clone();
        let viewport = self.viewport;
        let margin = self.config.min_visible_margin;
        let fallback_min = self.config.default_min_size;

        let Some(window) = self.windows.get_mut(&window_id) else {
            drop(self.gesture.take());
            return false;
        };
        let next = match kind {
            GestureKind::Drag => drag_to(origin, dx, dy, viewport, margin),
            GestureKind::Resize => resize_to(
                origin,
                dx,
                dy,
                min_size(&window.module, fallback_min),
                viewport,
            ),
        };
        if next == window.record.geometry {
            return false;
        }
        window.record.geometry = next;
        self.surfaces.apply(&window.record);
        true
    }

    /// Ends an active drag with a single persistence write.
    pub fn end_drag(&mut self) -> bool {
        self.finish_gesture(GestureKind::Drag)
    }

    /// Ends an active resize with a single persistence write.
    pub fn end_resize(&mut self) -> bool {
        self.finish_gesture(GestureKind::Resize)
    }

    fn finish_gesture(&mut self, kind: GestureKind) -> bool {
        if self.gesture.kind() != Some(kind) {
            return false;
        }
        let Some((_, session)) = self.gesture.take() else {
            return false;
        };
        if let Some(window) = self.windows.get(&session.window_id) {
            self.persistence.save_record(&window.record);
        }
        true
    }

    /// Abandons the active gesture and puts the window back where it started.
    ///
    /// Persisted state already matches the starting geometry, so nothing is written.
    pub fn cancel_gesture(&mut self) -> bool {
        let Some((_, session)) = self.gesture.take() else {
            return false;
        };
        if let Some(window) = self.windows.get_mut(&session.window_id) {
            window.record.geometry = session.origin;
            self.surfaces.apply(&window.record);
        }
        true
    }

    /// Changes the viewport and re-clamps every open window against it.
    ///
    /// Maximized windows are refit to the new viewport and their restore geometry is clamped.
    /// Windows whose geometry changed are persisted. An active gesture is cancelled first.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.cancel_gesture();
        self.viewport = viewport;
        let margin = self.config.min_visible_margin;
        for window in self.windows.values_mut() {
            let record = &mut window.record;
            let before = (record.geometry, record.restore_geometry);
            if record.maximized {
                record.geometry = viewport.rect();
                record.restore_geometry = record
                    .restore_geometry
                    .map(|g| clamp_reachable(g, viewport, margin));
            } else {
                record.geometry = clamp_reachable(record.geometry, viewport, margin);
            }
            if (record.geometry, record.restore_geometry) != before {
                self.surfaces.apply(&window.record);
                self.persistence.save_record(&window.record);
            }
        }
    }

    /// Removes the persisted state of `window_id` so its next window opens at default placement.
    pub fn clear_persisted(&self, window_id: &WindowId) {
        self.persistence.clear(window_id);
    }

    /// Whether `window_id` has a live record.
    pub fn is_open(&self, window_id: &WindowId) -> bool {
        self.windows.contains_key(window_id)
    }

    /// Live record for `window_id`.
    pub fn get_window(&self, window_id: &WindowId) -> Option<&WindowRecord> {
        self.windows.get(window_id).map(|w| &w.record)
    }

    /// Whether the persisted state says the window was open when last written.
    pub fn was_open(&self, window_id: &WindowId) -> bool {
        self.persistence.was_open(window_id)
    }

    /// Persisted state for `window_id`, whether or not it is open.
    pub fn persisted_state(&self, window_id: &WindowId) -> Option<PersistedWindowState> {
        self.persistence.load(window_id)
    }

    /// The focused window, if any.
    pub fn active_window(&self) -> Option<&WindowRecord> {
        self.active.as_ref().and_then(|id| self.get_window(id))
    }

    /// Open windows from bottom to top.
    pub fn windows_by_z(&self) -> Vec<&WindowRecord> {
        let mut records = self.windows.values().map(|w| &w.record).collect::<Vec<_>>();
        records.sort_by_key(|record| record.z_index);
        records
    }

    /// Number of open windows.
    pub fn open_count(&self) -> usize {
        self.windows.len()
    }

    /// Current gesture state.
    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn config(&self) -> &WindowManagerConfig {
        &self.config
    }

    /// Notification bus for shell consumers.
    pub fn events(&self) -> &WindowEventBus {
        &self.events
    }

    /// Shorthand for `self.events().subscribe(listener)`.
    #[must_use = "dropping the subscription detaches the listener immediately"]
    pub fn subscribe(&self, listener: impl Fn(&WindowNotification) + 'static) -> Subscription {
        self.events.subscribe(listener)
    }

    fn allocate_z_index(&mut self) -> u64 {
        self.next_z_index += 1;
        self.next_z_index
    }

    fn set_active(&mut self, next: Option<WindowId>) {
        if self.active == next {
            return;
        }
        self.active = next;
        if let Some(id) = self.active.clone() {
            self.events.emit(WindowEventKind::Focused, &id);
        }
    }

    fn focus_topmost_visible(&mut self) {
        let next = self
            .windows
            .values()
            .filter(|w| !w.record.minimized)
            .max_by_key(|w| w.record.z_index)
            .map(|w| w.record.id.clone());
        if let Some(id) = next {
            self.bring_to_front(&id);
        }
    }

    fn persist(&self, window_id: &WindowId) {
        if let Some(window) = self.windows.get(window_id) {
            self.persistence.save_record(&window.record);
        }
    }

    fn missing(&self, op: &str, window_id: &WindowId) -> bool {
        logging::log!("{op}: no open window `{window_id}`");
        false
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use desktop_app_contract::{ModuleHooks, ModuleId, NoopModuleHooks};
    use platform_host::MemoryKeyValueStore;
    use pretty_assertions::assert_eq;
    use serde_json::Value;

    use super::*;
    use crate::placement::FixedPlacement;

    const VIEWPORT: Viewport = Viewport::new(1000, 700);

    fn module(id: &str, width: i32, height: i32) -> Rc<ModuleDescriptor> {
        Rc::new(ModuleDescriptor::new(
            ModuleId::trusted(id),
            id,
            id,
            Size::new(width, height),
            Rc::new(NoopModuleHooks),
        ))
    }

    fn manager() -> (WindowManager, Rc<MemoryKeyValueStore>) {
        let store = Rc::new(MemoryKeyValueStore::default());
        let manager = WindowManager::headless(
            WindowManagerConfig::default().with_viewport(VIEWPORT),
            store.clone(),
        )
        .with_placement(FixedPlacement { x: 40, y: 30 });
        (manager, store)
    }

    fn id(raw: &str) -> WindowId {
        WindowId::trusted(raw)
    }

    fn saved(store: &MemoryKeyValueStore, raw: &str) -> Option<PersistedWindowState> {
        platform_host::load_typed_with(store, "windows", raw).expect("readable state")
    }

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _namespace: &str, _key: &str) -> Result<Option<Value>, String> {
            Err("quota exceeded".to_string())
        }

        fn set(&self, _namespace: &str, _key: &str, _value: Value) -> Result<(), String> {
            Err("quota exceeded".to_string())
        }

        fn remove(&self, _namespace: &str, _key: &str) -> Result<(), String> {
            Err("quota exceeded".to_string())
        }

        fn keys(&self, _namespace: &str) -> Result<Vec<String>, String> {
            Err("quota exceeded".to_string())
        }
    }

    #[derive(Default)]
    struct RecordingHooks {
        calls: RefCell<Vec<String>>,
        fail_init: bool,
        fail_destroy: bool,
    }

    impl ModuleHooks for RecordingHooks {
        fn init(&self, content: &ContentArea, store: ScopedStore) -> Result<(), String> {
            self.calls
                .borrow_mut()
                .push(format!("init:{}:{}", content.element_id, store.namespace()));
            if self.fail_init {
                return Err("init exploded".to_string());
            }
            Ok(())
        }

        fn render(&self) -> Result<(), String> {
            self.calls.borrow_mut().push("render".to_string());
            Ok(())
        }

        fn destroy(&self) -> Result<(), String> {
            self.calls.borrow_mut().push("destroy".to_string());
            if self.fail_destroy {
                return Err("destroy exploded".to_string());
            }
            Ok(())
        }
    }

    #[test]
    fn create_places_default_size_at_offset_and_persists() {
        let (mut wm, store) = manager();
        assert_eq!(wm.create_or_focus(module("notes", 400, 300)), OpenOutcome::Created);

        let record = wm.get_window(&id("notes")).expect("record");
        assert_eq!(record.geometry, Geometry::new(40, 30, 400, 300));
        assert_eq!(record.z_index, 1);
        assert!(record.open && !record.minimized && !record.maximized);
        assert_eq!(record.restore_geometry, None);
        assert_eq!(wm.active_window().map(|w| w.id.clone()), Some(id("notes")));
        assert_eq!(
            saved(&store, "notes").map(|s| (s.geometry(), s.open)),
            Some((Geometry::new(40, 30, 400, 300), true))
        );
    }

    #[test]
    fn second_open_focuses_existing_window() {
        let (mut wm, _) = manager();
        let notes = module("notes", 400, 300);
        wm.create_or_focus(notes.clone());
        wm.create_or_focus(module("clock", 300, 200));

        assert_eq!(wm.create_or_focus(notes), OpenOutcome::Focused);
        assert_eq!(wm.open_count(), 2);
        assert_eq!(wm.active_window().map(|w| w.z_index), Some(3));
    }

    #[test]
    fn open_of_minimized_window_restores_it() {
        let (mut wm, _) = manager();
        let notes = module("notes", 400, 300);
        wm.create_or_focus(notes.clone());
        wm.minimize(&id("notes"));

        assert_eq!(wm.create_or_focus(notes), OpenOutcome::Restored);
        assert!(!wm.get_window(&id("notes")).expect("record").minimized);
    }

    #[test]
    fn create_clamps_saved_geometry_into_viewport() {
        let (mut wm, store) = manager();
        platform_host::save_typed_with(
            store.as_ref(),
            "windows",
            "notes",
            &PersistedWindowState::from_geometry(
                Geometry::new(900, 650, 400, 300),
                true,
                false,
                true,
            ),
        )
        .expect("seed");

        wm.create_or_focus(module("notes", 400, 300));
        let record = wm.get_window(&id("notes")).expect("record");
        assert_eq!(record.geometry, Geometry::new(600, 400, 400, 300));
        assert!(!record.minimized);
    }

    #[test]
    fn create_restores_maximized_flag_with_restore_geometry() {
        let (mut wm, store) = manager();
        platform_host::save_typed_with(
            store.as_ref(),
            "windows",
            "notes",
            &PersistedWindowState::from_geometry(
                Geometry::new(10, 20, 400, 300),
                false,
                true,
                false,
            ),
        )
        .expect("seed");

        wm.create_or_focus(module("notes", 400, 300));
        let record = wm.get_window(&id("notes")).expect("record");
        assert!(record.maximized);
        assert_eq!(record.geometry, VIEWPORT.rect());
        assert_eq!(record.restore_geometry, Some(Geometry::new(10, 20, 400, 300)));

        wm.toggle_maximize(&id("notes"));
        let record = wm.get_window(&id("notes")).expect("record");
        assert_eq!(record.geometry, Geometry::new(10, 20, 400, 300));
    }

    #[test]
    fn drag_moves_clamps_and_persists_once_on_end() {
        let (mut wm, store) = manager();
        wm.create_or_focus(module("notes", 400, 300));

        assert!(wm.begin_drag(&id("notes"), PointerPosition::new(100, 100)));
        wm.on_pointer_move(PointerPosition::new(150, 120));
        assert_eq!(
            wm.get_window(&id("notes")).map(|w| w.geometry),
            Some(Geometry::new(90, 50, 400, 300))
        );
        assert_eq!(
            saved(&store, "notes").map(|s| s.geometry()),
            Some(Geometry::new(40, 30, 400, 300)),
            "no writes mid-drag"
        );

        wm.on_pointer_move(PointerPosition::new(5000, 5000));
        assert_eq!(
            wm.get_window(&id("notes")).map(|w| w.geometry),
            Some(Geometry::new(600, 668, 400, 300))
        );

        assert!(wm.end_drag());
        assert!(wm.gesture().is_idle());
        assert_eq!(
            saved(&store, "notes").map(|s| s.geometry()),
            Some(Geometry::new(600, 668, 400, 300))
        );
    }

    #[test]
    fn resize_is_floored_at_module_minimum() {
        let (mut wm, _) = manager();
        let paint = Rc::new(
            ModuleDescriptor::new(
                ModuleId::trusted("paint"),
                "Paint",
                "paint",
                Size::new(500, 400),
                Rc::new(NoopModuleHooks),
            )
            .with_min_size(Size::new(320, 240)),
        );
        wm.create_or_focus(paint);

        assert!(wm.begin_resize(&id("paint"), PointerPosition::new(0, 0)));
        wm.on_pointer_move(PointerPosition::new(-900, -900));
        assert_eq!(
            wm.get_window(&id("paint")).map(|w| w.geometry),
            Some(Geometry::new(40, 30, 320, 240))
        );
        assert!(!wm.end_drag(), "end_drag does not end a resize");
        assert!(wm.end_resize());
    }

    #[test]
    fn resize_uses_default_minimum_when_module_declares_none() {
        let (mut wm, _) = manager();
        wm.create_or_focus(module("notes", 400, 300));
        wm.begin_resize(&id("notes"), PointerPosition::new(0, 0));
        wm.on_pointer_move(PointerPosition::new(-900, -900));
        assert_eq!(
            wm.get_window(&id("notes")).map(|w| w.geometry.size()),
            Some(Size::new(220, 140))
        );
    }

    #[test]
    fn second_gesture_is_rejected_while_one_is_active() {
        let (mut wm, _) = manager();
        wm.create_or_focus(module("notes", 400, 300));
        wm.create_or_focus(module("clock", 300, 200));

        assert!(wm.begin_drag(&id("notes"), PointerPosition::new(0, 0)));
        assert!(!wm.begin_resize(&id("notes"), PointerPosition::new(0, 0)));
        assert!(!wm.begin_drag(&id("clock"), PointerPosition::new(0, 0)));
        assert!(wm.gesture().involves(&id("notes")));
        assert_eq!(wm.gesture().kind(), Some(GestureKind::Drag));
    }

    #[test]
    fn gestures_are_refused_while_maximized() {
        let (mut wm, _) = manager();
        wm.create_or_focus(module("notes", 400, 300));
        wm.toggle_maximize(&id("notes"));

        assert!(!wm.begin_drag(&id("notes"), PointerPosition::new(0, 0)));
        assert!(!wm.begin_resize(&id("notes"), PointerPosition::new(0, 0)));
        assert!(wm.gesture().is_idle());
    }

    #[test]
    fn cancel_reverts_to_origin_without_writing() {
        let (mut wm, store) = manager();
        wm.create_or_focus(module("notes", 400, 300));
        wm.begin_drag(&id("notes"), PointerPosition::new(0, 0));
        wm.on_pointer_move(PointerPosition::new(200, 200));

        assert!(wm.cancel_gesture());
        assert_eq!(
            wm.get_window(&id("notes")).map(|w| w.geometry),
            Some(Geometry::new(40, 30, 400, 300))
        );
        assert_eq!(
            saved(&store, "notes").map(|s| s.geometry()),
            Some(Geometry::new(40, 30, 400, 300))
        );
        assert!(!wm.cancel_gesture());
    }

    #[test]
    fn maximize_round_trip_restores_exact_geometry() {
        let (mut wm, store) = manager();
        wm.create_or_focus(module("notes", 400, 300));
        wm.begin_drag(&id("notes"), PointerPosition::new(0, 0));
        wm.on_pointer_move(PointerPosition::new(100, 500));
        wm.end_drag();
        let before = wm.get_window(&id("notes")).map(|w| w.geometry);

        wm.toggle_maximize(&id("notes"));
        let record = wm.get_window(&id("notes")).expect("record");
        assert!(record.maximized);
        assert_eq!(record.geometry, VIEWPORT.rect());
        assert_eq!(
            saved(&store, "notes").map(|s| (s.maximized, Some(s.geometry()))),
            Some((true, before))
        );

        wm.toggle_maximize(&id("notes"));
        let record = wm.get_window(&id("notes")).expect("record");
        assert!(!record.maximized);
        assert_eq!(Some(record.geometry), before);
        assert_eq!(record.restore_geometry, before);
    }

    #[test]
    fn unmaximize_reclamps_restore_geometry_to_viewport() {
        let (mut wm, store) = manager();
        platform_host::save_typed_with(
            store.as_ref(),
            "windows",
            "notes",
            &PersistedWindowState::from_geometry(
                Geometry::new(550, 380, 450, 320),
                false,
                true,
                false,
            ),
        )
        .expect("seed");
        wm.create_or_focus(module("notes", 400, 300));
        wm.viewport = Viewport::new(800, 600);

        wm.toggle_maximize(&id("notes"));
        let record = wm.get_window(&id("notes")).expect("record");
        assert!(!record.maximized);
        assert_eq!(record.geometry, Geometry::new(350, 380, 450, 320));
        assert_eq!(
            saved(&store, "notes").map(|s| s.geometry()),
            Some(Geometry::new(350, 380, 450, 320))
        );
    }

    #[test]
    fn store_failures_leave_in_memory_state_authoritative() {
        let mut wm = WindowManager::headless(
            WindowManagerConfig::default().with_viewport(VIEWPORT),
            Rc::new(FailingStore),
        )
        .with_placement(FixedPlacement { x: 40, y: 30 });

        assert_eq!(wm.create_or_focus(module("notes", 400, 300)), OpenOutcome::Created);
        assert_eq!(
            wm.get_window(&id("notes")).map(|w| w.geometry),
            Some(Geometry::new(40, 30, 400, 300))
        );

        assert!(wm.begin_drag(&id("notes"), PointerPosition::new(0, 0)));
        wm.on_pointer_move(PointerPosition::new(25, 15));
        assert!(wm.end_drag());
        assert_eq!(
            wm.get_window(&id("notes")).map(|w| w.geometry),
            Some(Geometry::new(65, 45, 400, 300))
        );
        assert!(wm.gesture().is_idle());

        assert!(wm.minimize(&id("notes")));
        assert!(wm.get_window(&id("notes")).expect("record").minimized);
        assert!(wm.active_window().is_none());

        assert!(wm.close(&id("notes")));
        assert!(!wm.is_open(&id("notes")));
        assert_eq!(wm.open_count(), 0);
        assert!(!wm.was_open(&id("notes")));
        assert_eq!(wm.persisted_state(&id("notes")), None);
    }

    #[test]
    fn toggle_maximize_is_ignored_while_minimized() {
        let (mut wm, _) = manager();
        wm.create_or_focus(module("notes", 400, 300));
        wm.minimize(&id("notes"));
        assert!(!wm.toggle_maximize(&id("notes")));
        assert!(!wm.get_window(&id("notes")).expect("record").maximized);
    }

    #[test]
    fn minimize_keeps_geometry_and_z_and_is_idempotent() {
        let (mut wm, _) = manager();
        wm.create_or_focus(module("notes", 400, 300));
        let before = wm.get_window(&id("notes")).cloned().expect("record");

        assert!(wm.minimize(&id("notes")));
        let once = wm.get_window(&id("notes")).cloned().expect("record");
        assert!(!wm.minimize(&id("notes")));
        let twice = wm.get_window(&id("notes")).cloned().expect("record");

        assert_eq!(once, twice);
        assert!(once.minimized);
        assert_eq!(once.geometry, before.geometry);
        assert_eq!(once.z_index, before.z_index);
        assert!(wm.active_window().is_none());
    }

    #[test]
    fn minimize_and_restore_return_to_maximized_state() {
        let (mut wm, _) = manager();
        wm.create_or_focus(module("notes", 400, 300));
        wm.toggle_maximize(&id("notes"));
        wm.minimize(&id("notes"));
        assert!(wm.restore(&id("notes")));

        let record = wm.get_window(&id("notes")).expect("record");
        assert!(record.maximized && !record.minimized);
        assert_eq!(record.geometry, VIEWPORT.rect());
    }

    #[test]
    fn minimizing_active_window_hands_focus_to_next_visible() {
        let (mut wm, _) = manager();
        wm.create_or_focus(module("a", 300, 200));
        wm.create_or_focus(module("b", 300, 200));
        wm.create_or_focus(module("c", 300, 200));
        wm.minimize(&id("b"));

        wm.minimize(&id("c"));
        let active = wm.active_window().expect("active");
        assert_eq!(active.id, id("a"));
        let max_z = wm.windows_by_z().last().map(|w| w.z_index);
        assert_eq!(Some(active.z_index), max_z);
    }

    #[test]
    fn bring_to_front_always_allocates_a_larger_z_index() {
        let (mut wm, _) = manager();
        wm.create_or_focus(module("a", 300, 200));
        wm.create_or_focus(module("b", 300, 200));

        let mut last = 0;
        for target in ["a", "a", "b", "a"] {
            assert!(wm.bring_to_front(&id(target)));
            let z = wm.get_window(&id(target)).expect("record").z_index;
            assert!(z > last);
            last = z;
        }
        let order = wm
            .windows_by_z()
            .iter()
            .map(|w| w.id.as_str().to_string())
            .collect::<Vec<_>>();
        assert_eq!(order, vec!["b", "a"]);
    }

    #[test]
    fn toggle_taskbar_cycles_focus_minimize_restore() {
        let (mut wm, _) = manager();
        wm.create_or_focus(module("a", 300, 200));
        wm.create_or_focus(module("b", 300, 200));

        wm.toggle_taskbar(&id("a"));
        assert_eq!(wm.active_window().map(|w| w.id.clone()), Some(id("a")));
        wm.toggle_taskbar(&id("a"));
        assert!(wm.get_window(&id("a")).expect("a").minimized);
        wm.toggle_taskbar(&id("a"));
        assert!(!wm.get_window(&id("a")).expect("a").minimized);
        assert_eq!(wm.active_window().map(|w| w.id.clone()), Some(id("a")));
    }

    #[test]
    fn missing_windows_are_silent_no_ops() {
        let (mut wm, store) = manager();
        let ghost = id("ghost");
        assert!(!wm.bring_to_front(&ghost));
        assert!(!wm.minimize(&ghost));
        assert!(!wm.restore(&ghost));
        assert!(!wm.toggle_maximize(&ghost));
        assert!(!wm.close(&ghost));
        assert!(!wm.begin_drag(&ghost, PointerPosition::new(0, 0)));
        assert!(!wm.on_pointer_move(PointerPosition::new(1, 1)));
        assert!(!wm.end_drag());
        assert_eq!(store.namespace_count(), 0);
    }

    #[test]
    fn hooks_run_in_order_with_scoped_store() {
        let (mut wm, _) = manager();
        let hooks = Rc::new(RecordingHooks::default());
        let descriptor = Rc::new(ModuleDescriptor::new(
            ModuleId::trusted("notes"),
            "Notes",
            "notes",
            Size::new(400, 300),
            hooks.clone(),
        ));
        wm.create_or_focus(descriptor);
        wm.close(&id("notes"));

        assert_eq!(
            *hooks.calls.borrow(),
            vec![
                "init:window-notes-content:module.notes".to_string(),
                "render".to_string(),
                "destroy".to_string(),
            ]
        );
    }

    #[test]
    fn failing_hooks_do_not_corrupt_bookkeeping() {
        let (mut wm, store) = manager();
        let hooks = Rc::new(RecordingHooks {
            fail_init: true,
            fail_destroy: true,
            ..RecordingHooks::default()
        });
        let descriptor = Rc::new(ModuleDescriptor::new(
            ModuleId::trusted("notes"),
            "Notes",
            "notes",
            Size::new(400, 300),
            hooks.clone(),
        ));

        wm.create_or_focus(descriptor);
        assert!(wm.is_open(&id("notes")));
        assert!(!hooks.calls.borrow().contains(&"render".to_string()));

        assert!(wm.close(&id("notes")));
        assert!(!wm.is_open(&id("notes")));
        assert_eq!(saved(&store, "notes").map(|s| s.open), Some(false));
    }

    #[test]
    fn close_keeps_last_persisted_geometry_and_clears_gesture() {
        let (mut wm, store) = manager();
        wm.create_or_focus(module("notes", 400, 300));
        wm.begin_drag(&id("notes"), PointerPosition::new(0, 0));
        wm.on_pointer_move(PointerPosition::new(300, 300));

        assert!(wm.close(&id("notes")));
        assert!(wm.gesture().is_idle());
        assert!(!wm.was_open(&id("notes")));
        assert_eq!(
            saved(&store, "notes").map(|s| s.geometry()),
            Some(Geometry::new(40, 30, 400, 300))
        );
    }

    #[test]
    fn notifications_follow_lifecycle() {
        let (mut wm, _) = manager();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let _sub = wm.subscribe(move |n| {
            sink.borrow_mut()
                .push(format!("{}:{}", n.kind.token(), n.window_id))
        });

        wm.create_or_focus(module("notes", 400, 300));
        wm.minimize(&id("notes"));
        wm.minimize(&id("notes"));
        wm.restore(&id("notes"));
        wm.close(&id("notes"));

        assert_eq!(
            *seen.borrow(),
            vec![
                "window-opened:notes",
                "window-focused:notes",
                "window-minimized:notes",
                "window-focused:notes",
                "window-restored:notes",
                "window-closed:notes",
            ]
        );
    }

    #[test]
    fn viewport_shrink_reclamps_open_windows() {
        let (mut wm, store) = manager();
        wm.create_or_focus(module("notes", 400, 300));
        wm.begin_drag(&id("notes"), PointerPosition::new(0, 0));
        wm.on_pointer_move(PointerPosition::new(560, 0));
        wm.end_drag();
        wm.create_or_focus(module("clock", 300, 200));
        wm.toggle_maximize(&id("clock"));

        wm.set_viewport(Viewport::new(800, 600));

        assert_eq!(
            wm.get_window(&id("notes")).map(|w| w.geometry),
            Some(Geometry::new(400, 30, 400, 300))
        );
        assert_eq!(
            saved(&store, "notes").map(|s| s.geometry()),
            Some(Geometry::new(400, 30, 400, 300))
        );
        let clock = wm.get_window(&id("clock")).expect("clock");
        assert_eq!(clock.geometry, Geometry::new(0, 0, 800, 600));
        assert_eq!(wm.viewport(), Viewport::new(800, 600));
    }

    #[test]
    fn clear_persisted_forgets_geometry() {
        let (mut wm, store) = manager();
        wm.create_or_focus(module("notes", 400, 300));
        wm.close(&id("notes"));
        wm.clear_persisted(&id("notes"));
        assert_eq!(store.get("windows", "notes").expect("get"), None::<Value>);
    }
}
