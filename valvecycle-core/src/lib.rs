//! Board-agnostic core logic for the valve cycle controller firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (relay board, EEPROM, display, watchdog)
//! - The six-state valve cycle and its scheduler
//! - Persistent store with the failsafe checkpoint protocol
//! - Operator input decoding and the settings menu
//! - Watchdog supervision
//! - Screen rendering and configuration types

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod controller;
pub mod indicator;
pub mod input;
pub mod menu;
pub mod persist;
pub mod safety;
pub mod scheduler;
pub mod state;
pub mod time;
pub mod traits;
pub mod view;

#[cfg(test)]
mod mock;

pub use controller::{BootReport, ControlError, Controller, Outcome};
pub use time::Millis;
