//! Clock helpers shared across host contracts and adapters.

use std::cell::Cell;
#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};

thread_local! {
    static SEED_SALT: Cell<u64> = const { Cell::new(0) };
}

/// Returns the current unix timestamp in milliseconds.
pub fn unix_time_ms_now() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now().max(0.0) as u64
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

/// Returns a non-zero seed derived from the clock.
///
/// Successive calls within the same millisecond still return distinct values.
pub fn clock_seed() -> u64 {
    let salt = SEED_SALT.with(|salt| {
        let next = salt.get().wrapping_add(0x9E37_79B9_7F4A_7C15);
        salt.set(next);
        next
    });
    (unix_time_ms_now() ^ salt) | 1
}
