//! Persistent storage
//!
//! A fixed-layout region holding the four editable durations, the four
//! failsafe in-progress flags and the crash counter.

pub mod layout;
pub mod store;

pub use layout::{Layout, Persist, Slot, LAYOUT_REVISION};
pub use store::{OpenOutcome, PersistentStore};
