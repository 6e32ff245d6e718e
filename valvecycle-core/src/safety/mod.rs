//! Liveness supervision
//!
//! Keeps the hardware watchdog fed from the main loop.

pub mod watchdog;

pub use watchdog::{LoopHealth, WatchdogSupervisor, WATCHDOG_TIMEOUT_MS};
