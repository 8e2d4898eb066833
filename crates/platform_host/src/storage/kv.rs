//! Namespaced key/value storage contracts and adapters.
//!
//! Values are arbitrary JSON. Every read and write is addressed by a `(namespace, key)` pair so
//! callers can be handed a [`ScopedStore`] that only sees their own namespace.

use std::{cell::RefCell, collections::HashMap, fmt, rc::Rc};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

/// Host service for namespaced JSON values.
///
/// Implementations are synchronous; the desktop runtime performs every write inside a single
/// input-event turn.
pub trait KeyValueStore {
    /// Reads the raw JSON value stored under `namespace`/`key`.
    fn get(&self, namespace: &str, key: &str) -> Result<Option<Value>, String>;

    /// Stores a raw JSON value under `namespace`/`key`, replacing any previous value.
    fn set(&self, namespace: &str, key: &str, value: Value) -> Result<(), String>;

    /// Removes the value stored under `namespace`/`key`. Missing keys are not an error.
    fn remove(&self, namespace: &str, key: &str) -> Result<(), String>;

    /// Lists keys present in `namespace`, sorted.
    fn keys(&self, namespace: &str) -> Result<Vec<String>, String>;
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op store for unsupported targets and baseline tests.
pub struct NoopKeyValueStore;

impl KeyValueStore for NoopKeyValueStore {
    fn get(&self, _namespace: &str, _key: &str) -> Result<Option<Value>, String> {
        Ok(None)
    }

    fn set(&self, _namespace: &str, _key: &str, _value: Value) -> Result<(), String> {
        Ok(())
    }

    fn remove(&self, _namespace: &str, _key: &str) -> Result<(), String> {
        Ok(())
    }

    fn keys(&self, _namespace: &str) -> Result<Vec<String>, String> {
        Ok(Vec::new())
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory store. Clones share the same backing map.
pub struct MemoryKeyValueStore {
    inner: Rc<RefCell<HashMap<String, HashMap<String, Value>>>>,
}

impl MemoryKeyValueStore {
    /// Number of namespaces currently holding at least one key.
    pub fn namespace_count(&self) -> usize {
        self.inner.borrow().len()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<Value>, String> {
        Ok(self
            .inner
            .borrow()
            .get(namespace)
            .and_then(|entries| entries.get(key))
            .cloned())
    }

    fn set(&self, namespace: &str, key: &str, value: Value) -> Result<(), String> {
        self.inner
            .borrow_mut()
            .entry(namespace.to_string())
            .or_default()
            .insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, namespace: &str, key: &str) -> Result<(), String> {
        let mut inner = self.inner.borrow_mut();
        if let Some(entries) = inner.get_mut(namespace) {
            entries.remove(key);
            if entries.is_empty() {
                inner.remove(namespace);
            }
        }
        Ok(())
    }

    fn keys(&self, namespace: &str) -> Result<Vec<String>, String> {
        let mut keys = self
            .inner
            .borrow()
            .get(namespace)
            .map(|entries| entries.keys().cloned().collect::<Vec<_>>())
            .unwrap_or_default();
        keys.sort();
        Ok(keys)
    }
}

/// Loads and deserializes a typed value through a [`KeyValueStore`] implementation.
///
/// # Errors
///
/// Returns an error when the store read or JSON deserialization fails.
pub fn load_typed_with<S: KeyValueStore + ?Sized, T: DeserializeOwned>(
    store: &S,
    namespace: &str,
    key: &str,
) -> Result<Option<T>, String> {
    let Some(raw) = store.get(namespace, key)? else {
        return Ok(None);
    };
    let value = serde_json::from_value(raw).map_err(|e| e.to_string())?;
    Ok(Some(value))
}

/// Serializes and saves a typed value through a [`KeyValueStore`] implementation.
///
/// # Errors
///
/// Returns an error when serialization or the store write fails.
pub fn save_typed_with<S: KeyValueStore + ?Sized, T: Serialize>(
    store: &S,
    namespace: &str,
    key: &str,
    value: &T,
) -> Result<(), String> {
    let raw = serde_json::to_value(value).map_err(|e| e.to_string())?;
    store.set(namespace, key, raw)
}

#[derive(Clone)]
/// A view of a shared store restricted to one namespace.
pub struct ScopedStore {
    store: Rc<dyn KeyValueStore>,
    namespace: String,
}

impl fmt::Debug for ScopedStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedStore")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

impl ScopedStore {
    /// Scopes `store` to `namespace`.
    pub fn new(store: Rc<dyn KeyValueStore>, namespace: impl Into<String>) -> Self {
        Self {
            store,
            namespace: namespace.into(),
        }
    }

    /// Namespace this view reads and writes.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Reads a raw JSON value.
    pub fn get_json(&self, key: &str) -> Result<Option<Value>, String> {
        self.store.get(&self.namespace, key)
    }

    /// Stores a raw JSON value.
    pub fn set_json(&self, key: &str, value: Value) -> Result<(), String> {
        self.store.set(&self.namespace, key, value)
    }

    /// Removes a key.
    pub fn remove(&self, key: &str) -> Result<(), String> {
        self.store.remove(&self.namespace, key)
    }

    /// Lists keys in this namespace.
    pub fn keys(&self) -> Result<Vec<String>, String> {
        self.store.keys(&self.namespace)
    }

    /// Reads and deserializes a typed value.
    ///
    /// # Errors
    ///
    /// Returns an error when the read or deserialization fails.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, String> {
        load_typed_with(self.store.as_ref(), &self.namespace, key)
    }

    /// Serializes and stores a typed value.
    ///
    /// # Errors
    ///
    /// Returns an error when serialization or the write fails.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), String> {
        save_typed_with(self.store.as_ref(), &self.namespace, key, value)
    }
}
