//! Inter-task shared state
//!
//! The encoder task is the only producer; the control loop only reads.

use portable_atomic::{AtomicI32, Ordering};

/// Detent counter written by the encoder task
///
/// Wraps on overflow; readers take the wrapping difference.
pub static ENCODER_POSITION: AtomicI32 = AtomicI32::new(0);

/// Add detent steps
pub fn add_encoder_steps(steps: i8) {
    ENCODER_POSITION.fetch_add(i32::from(steps), Ordering::Relaxed);
}

/// Current detent counter
pub fn encoder_position() -> i32 {
    ENCODER_POSITION.load(Ordering::Relaxed)
}
