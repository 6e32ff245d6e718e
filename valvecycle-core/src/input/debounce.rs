//! Software button debouncer

use crate::time::Millis;

/// Default debounce window in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u32 = 50;

/// Debounced digital input
///
/// A raw level change is accepted only after the level has stayed the same
/// for longer than the debounce window. Every raw change restarts the
/// window.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window_ms: u32,
    active_low: bool,
    last_raw: bool,
    stable: bool,
    last_change: Millis,
}

impl Debouncer {
    /// Create a debouncer
    ///
    /// - `idle_level`: raw level read at startup, taken as stable
    /// - `active_low`: the pressed level is low
    pub fn new(window_ms: u32, active_low: bool, idle_level: bool, now: Millis) -> Self {
        Self {
            window_ms,
            active_low,
            last_raw: idle_level,
            stable: idle_level,
            last_change: now,
        }
    }

    /// Current accepted level
    pub fn level(&self) -> bool {
        self.stable
    }

    /// Accepted level is the pressed level
    pub fn is_pressed(&self) -> bool {
        self.stable != self.active_low
    }

    /// Feed one raw sample
    ///
    /// Returns `true` exactly once per accepted transition into the
    /// pressed level.
    pub fn update(&mut self, raw: bool, now: Millis) -> bool {
        if raw != self.last_raw {
            self.last_raw = raw;
            self.last_change = now;
            return false;
        }

        if raw == self.stable || now.elapsed_since(self.last_change) <= self.window_ms {
            return false;
        }

        self.stable = raw;
        self.is_pressed()
    }
}
