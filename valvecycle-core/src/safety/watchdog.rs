//! Watchdog supervision
//!
//! Wraps the hardware watchdog and tracks main-loop latency between pings.
//! A loop that stops pinging is reset by the hardware and recovered through
//! the failsafe checkpoint like any other crash.

use crate::time::Millis;
use crate::traits::Watchdog;

/// Hardware watchdog timeout
pub const WATCHDOG_TIMEOUT_MS: u32 = 8000;

/// Loop health after a ping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoopHealth {
    /// Gap since the previous ping is within half the timeout
    Ok,
    /// Gap exceeded half the timeout; the loop is close to a reset
    Late { gap_ms: u32 },
}

/// Watchdog supervisor
#[derive(Debug)]
pub struct WatchdogSupervisor<W> {
    watchdog: W,
    timeout_ms: u32,
    armed: bool,
    last_ping: Millis,
    longest_gap_ms: u32,
}

impl<W: Watchdog> WatchdogSupervisor<W> {
    /// Create an unarmed supervisor
    pub fn new(watchdog: W, timeout_ms: u32) -> Self {
        Self {
            watchdog,
            timeout_ms,
            armed: false,
            last_ping: Millis::ZERO,
            longest_gap_ms: 0,
        }
    }

    /// Start the hardware countdown
    pub fn arm(&mut self, now: Millis) {
        self.watchdog.start(self.timeout_ms);
        self.armed = true;
        self.last_ping = now;
    }

    /// Whether [`arm`](Self::arm) has been called
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Configured timeout
    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }

    /// Liveness ping, called once per loop iteration
    pub fn ping(&mut self, now: Millis) -> LoopHealth {
        if !self.armed {
            return LoopHealth::Ok;
        }
        self.watchdog.feed();

        let gap_ms = now.elapsed_since(self.last_ping);
        self.last_ping = now;
        self.longest_gap_ms = self.longest_gap_ms.max(gap_ms);

        if gap_ms > self.timeout_ms / 2 {
            LoopHealth::Late { gap_ms }
        } else {
            LoopHealth::Ok
        }
    }

    /// Longest gap observed between pings
    pub fn longest_gap_ms(&self) -> u32 {
        self.longest_gap_ms
    }

    /// The hardware would already have reset if no ping arrived by `now`
    pub fn overdue(&self, now: Millis) -> bool {
        self.armed && now.has_elapsed(self.last_ping, self.timeout_ms)
    }

    /// Borrow the hardware watchdog
    pub fn watchdog(&self) -> &W {
        &self.watchdog
    }
}
