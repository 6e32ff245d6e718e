//! Hardware watchdog trait

/// A hardware watchdog timer
///
/// Once started, the device resets unconditionally unless [`feed`] is
/// called at least once per timeout period.
///
/// [`feed`]: Watchdog::feed
pub trait Watchdog {
    /// Start the countdown with the given timeout
    fn start(&mut self, timeout_ms: u32);

    /// Restart the countdown
    fn feed(&mut self);
}
