//! Valve cycle scheduler
//!
//! Runs the six-state sequence by elapsed time and keeps the failsafe
//! checkpoint current.

pub mod executor;

pub use executor::{BootOutcome, CycleScheduler, RunContext, SchedulerEvent};
