//! Typed host-domain contracts shared by the desktop runtime and modules.
//!
//! This crate is the boundary for platform services the window manager depends on: the
//! namespaced key/value store and its adapters, plus clock helpers. Browser adapters are only
//! compiled for `wasm32`.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod storage;
pub mod time;

#[cfg(target_arch = "wasm32")]
pub use storage::local::LocalStorageStore;
pub use storage::kv::{
    load_typed_with, save_typed_with, KeyValueStore, MemoryKeyValueStore, NoopKeyValueStore,
    ScopedStore,
};
pub use time::{clock_seed, unix_time_ms_now};
