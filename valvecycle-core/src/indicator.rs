//! Run indicator
//!
//! The button LED blinks while the cycle is running and is off otherwise.

use crate::time::Millis;

/// Default blink half-period
pub const DEFAULT_BLINK_MS: u32 = 700;

/// Button LED blinker
#[derive(Debug, Clone)]
pub struct RunIndicator {
    period_ms: u32,
    lit: bool,
    last_toggle: Millis,
}

impl RunIndicator {
    /// Create an indicator that toggles every `period_ms`
    pub const fn new(period_ms: u32) -> Self {
        Self {
            period_ms,
            lit: false,
            last_toggle: Millis::ZERO,
        }
    }

    /// Current LED level
    pub fn is_lit(&self) -> bool {
        self.lit
    }

    /// Update for the current run state
    ///
    /// Returns the new level when it changed.
    pub fn update(&mut self, running: bool, now: Millis) -> Option<bool> {
        if !running {
            self.last_toggle = now;
            return self.set(false);
        }
        if now.has_elapsed(self.last_toggle, self.period_ms) {
            self.last_toggle = now;
            return self.set(!self.lit);
        }
        None
    }

    fn set(&mut self, lit: bool) -> Option<bool> {
        if self.lit == lit {
            return None;
        }
        self.lit = lit;
        Some(lit)
    }
}

impl Default for RunIndicator {
    fn default() -> Self {
        Self::new(DEFAULT_BLINK_MS)
    }
}
