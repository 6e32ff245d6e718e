//! Wraparound-safe millisecond timestamps
//!
//! The firmware samples a free-running 32-bit millisecond counter. It wraps
//! after roughly 49.7 days, so every elapsed-time check in the crate goes
//! through [`Millis::elapsed_since`], which uses modular subtraction.

/// A sample of the monotonic millisecond counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Millis(pub u32);

impl Millis {
    /// Counter value zero
    pub const ZERO: Self = Self(0);

    /// Create a timestamp from a raw counter value
    pub const fn new(ms: u32) -> Self {
        Self(ms)
    }

    /// Raw counter value
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Milliseconds from `earlier` to `self`, modulo 2^32
    ///
    /// Correct across a counter wrap as long as the true interval is
    /// shorter than one full counter period.
    pub const fn elapsed_since(self, earlier: Millis) -> u32 {
        self.0.wrapping_sub(earlier.0)
    }

    /// True once at least `duration_ms` have passed since `start`
    pub const fn has_elapsed(self, start: Millis, duration_ms: u32) -> bool {
        self.elapsed_since(start) >= duration_ms
    }

    /// Timestamp `ms` later, wrapping
    pub const fn wrapping_add(self, ms: u32) -> Millis {
        Millis(self.0.wrapping_add(ms))
    }
}

impl From<u32> for Millis {
    fn from(ms: u32) -> Self {
        Self(ms)
    }
}
