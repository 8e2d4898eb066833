//! Persistence contracts used by the desktop runtime and modules.

pub mod kv;
#[cfg(target_arch = "wasm32")]
pub mod local;
