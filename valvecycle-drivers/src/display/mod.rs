//! Character display drivers

pub mod grove_lcd;

pub use grove_lcd::{GroveLcd, Rgb};
