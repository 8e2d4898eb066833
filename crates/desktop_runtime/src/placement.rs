//! Initial placement for windows that have no saved geometry.

use crate::config::PlacementBounds;

/// Source of the offset from the viewport origin given to a new window.
pub trait PlacementSource {
    /// Returns the `(x, y)` offset for the next new window.
    fn next_offset(&mut self, bounds: PlacementBounds) -> (i32, i32);
}

#[derive(Debug, Clone)]
/// Pseudo-random offsets from an xorshift generator.
pub struct SeededPlacement {
    state: u64,
}

impl SeededPlacement {
    /// Generator with a fixed seed. A zero seed is replaced by a non-zero constant.
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { 0x2545_F491_4F6C_DD1D } else { seed },
        }
    }

    /// Generator seeded from the host clock.
    pub fn from_clock() -> Self {
        Self::new(platform_host::clock_seed())
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    fn next_in(&mut self, bounds: PlacementBounds) -> i32 {
        let low = i64::from(bounds.min_offset.min(bounds.max_offset));
        let high = i64::from(bounds.max_offset.max(bounds.min_offset));
        // Spans the full i32 range at most, so neither step can overflow in i64.
        let span = (high - low + 1).unsigned_abs();
        let picked = low + (self.next_u64() % span) as i64;
        i32::try_from(picked).unwrap_or(i32::MAX)
    }
}

impl PlacementSource for SeededPlacement {
    fn next_offset(&mut self, bounds: PlacementBounds) -> (i32, i32) {
        let x = self.next_in(bounds);
        let y = self.next_in(bounds);
        (x, y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Always places new windows at the same offset.
pub struct FixedPlacement {
    pub x: i32,
    pub y: i32,
}

impl PlacementSource for FixedPlacement {
    fn next_offset(&mut self, _bounds: PlacementBounds) -> (i32, i32) {
        (self.x, self.y)
    }
}

#[derive(Debug, Clone, Default)]
/// Diagonal cascade: each new window steps 20px further down-right, wrapping after 8.
pub struct CascadePlacement {
    opened: i32,
}

impl PlacementSource for CascadePlacement {
    fn next_offset(&mut self, bounds: PlacementBounds) -> (i32, i32) {
        let step = self.opened * 20;
        self.opened = (self.opened + 1) % 8;
        let offset = bounds
            .min_offset
            .saturating_add(step)
            .min(bounds.max_offset.max(bounds.min_offset));
        (offset, offset)
    }
}
