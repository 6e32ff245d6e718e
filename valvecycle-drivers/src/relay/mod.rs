//! Relay board drivers

pub mod grove;

pub use grove::{GroveRelay, DEFAULT_ADDRESS as GROVE_RELAY_ADDRESS};
