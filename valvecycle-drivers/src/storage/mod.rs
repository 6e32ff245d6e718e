//! Persistent storage drivers

pub mod at24;

pub use at24::{At24, At24Variant};
