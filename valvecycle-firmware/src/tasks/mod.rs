//! Embassy async tasks
//!
//! The encoder task samples the rotary encoder and owns the position
//! counter. The control task runs the cooperative main loop and owns
//! everything else.

pub mod control;
pub mod encoder;

pub use control::{control_task, ControlLoop, LOOP_INTERVAL_MS};
pub use encoder::{encoder_task, ENCODER_SAMPLE_MS};
