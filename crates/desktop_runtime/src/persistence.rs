//! Persisted window state adapter over the host key/value store.
//!
//! Reads and writes are best-effort: a failed read is treated as "nothing saved" and a failed
//! write is logged while the in-memory state stays authoritative for the session.

use std::rc::Rc;

use leptos::logging;
use platform_host::{load_typed_with, save_typed_with, KeyValueStore};

use crate::model::{PersistedWindowState, WindowId, WindowRecord};

#[derive(Clone)]
pub struct WindowStatePersistence {
    store: Rc<dyn KeyValueStore>,
    namespace: String,
}

impl std::fmt::Debug for WindowStatePersistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowStatePersistence")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

impl WindowStatePersistence {
    pub fn new(store: Rc<dyn KeyValueStore>, namespace: impl Into<String>) -> Self {
        Self {
            store,
            namespace: namespace.into(),
        }
    }

    /// Shared store handle, used to build module-scoped views.
    pub fn store(&self) -> Rc<dyn KeyValueStore> {
        self.store.clone()
    }

    pub fn load(&self, window_id: &WindowId) -> Option<PersistedWindowState> {
        match load_typed_with(self.store.as_ref(), &self.namespace, window_id.as_str()) {
            Ok(state) => state,
            Err(err) => {
                logging::warn!("window state load failed for `{window_id}`: {err}");
                None
            }
        }
    }

    pub fn save(&self, window_id: &WindowId, state: &PersistedWindowState) {
        if let Err(err) =
            save_typed_with(self.store.as_ref(), &self.namespace, window_id.as_str(), state)
        {
            logging::warn!("window state save failed for `{window_id}`: {err}");
        }
    }

    pub fn save_record(&self, record: &WindowRecord) {
        self.save(&record.id, &record.persisted_state());
    }

    /// Records `open = false`, keeping whatever geometry was last saved.
    ///
    /// Falls back to `record`'s own projection when nothing readable was saved.
    pub fn save_closed(&self, record: &WindowRecord) {
        let mut state = self
            .load(&record.id)
            .unwrap_or_else(|| record.persisted_state());
        state.open = false;
        self.save(&record.id, &state);
    }

    pub fn was_open(&self, window_id: &WindowId) -> bool {
        self.load(window_id).is_some_and(|state| state.open)
    }

    pub fn clear(&self, window_id: &WindowId) {
        if let Err(err) = self.store.remove(&self.namespace, window_id.as_str()) {
            logging::warn!("window state clear failed for `{window_id}`: {err}");
        }
    }
}
