//! Valve cycle definition
//!
//! The states, their order, and the table of durations and relay masks
//! the scheduler runs from.

pub mod cycle;

pub use cycle::{CycleState, CycleTable, Durations, TimedState, ValveMap, MAX_NAME_LEN};
