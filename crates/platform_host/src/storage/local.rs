//! Browser `localStorage` adapter for [`KeyValueStore`](super::kv::KeyValueStore).

use serde_json::Value;

use super::kv::KeyValueStore;

#[derive(Debug, Clone)]
/// Stores each value as JSON text under `<prefix>:<namespace>:<key>`.
pub struct LocalStorageStore {
    prefix: String,
}

impl LocalStorageStore {
    /// Creates an adapter writing keys under `prefix`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    fn full_key(&self, namespace: &str, key: &str) -> String {
        format!("{}:{namespace}:{key}", self.prefix)
    }

    fn storage() -> Result<web_sys::Storage, String> {
        web_sys::window()
            .ok_or_else(|| "no window".to_string())?
            .local_storage()
            .map_err(|e| format!("localStorage unavailable: {e:?}"))?
            .ok_or_else(|| "localStorage unavailable".to_string())
    }
}

impl KeyValueStore for LocalStorageStore {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<Value>, String> {
        let raw = Self::storage()?
            .get_item(&self.full_key(namespace, key))
            .map_err(|e| format!("localStorage read failed: {e:?}"))?;
        match raw {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| e.to_string()),
            None => Ok(None),
        }
    }

    fn set(&self, namespace: &str, key: &str, value: Value) -> Result<(), String> {
        let raw = serde_json::to_string(&value).map_err(|e| e.to_string())?;
        Self::storage()?
            .set_item(&self.full_key(namespace, key), &raw)
            .map_err(|e| format!("localStorage write failed: {e:?}"))
    }

    fn remove(&self, namespace: &str, key: &str) -> Result<(), String> {
        Self::storage()?
            .remove_item(&self.full_key(namespace, key))
            .map_err(|e| format!("localStorage remove failed: {e:?}"))
    }

    fn keys(&self, namespace: &str) -> Result<Vec<String>, String> {
        let storage = Self::storage()?;
        let scope = format!("{}:{namespace}:", self.prefix);
        let len = storage
            .length()
            .map_err(|e| format!("localStorage length failed: {e:?}"))?;
        let mut keys = Vec::new();
        for index in 0..len {
            let Ok(Some(full)) = storage.key(index) else {
                continue;
            };
            if let Some(key) = full.strip_prefix(&scope) {
                keys.push(key.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }
}
