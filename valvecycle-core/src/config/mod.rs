//! Machine configuration
//!
//! Plain configuration types plus a minimal `no_std` parser for the
//! `valvecycle.toml` file embedded in the firmware.

pub mod parse;
pub mod types;

pub use parse::{parse_config, ParseError};
pub use types::*;
