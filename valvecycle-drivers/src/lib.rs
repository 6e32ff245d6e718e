//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in valvecycle-core for the Grove I2C modules on the controller board:
//!
//! - Relay output (Grove 4-channel I2C relay)
//! - Text display (Grove RGB LCD 16x2)
//! - Persistent storage (AT24Cxx I2C EEPROM)
//!
//! All drivers are blocking and generic over `embedded_hal::i2c::I2c`, so
//! several of them can share one bus through a bus-sharing wrapper.

#![no_std]
#![deny(unsafe_code)]

pub mod display;
pub mod relay;
pub mod storage;

#[cfg(test)]
pub(crate) mod fake;
