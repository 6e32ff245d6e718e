//! Rotary encoder sampling task
//!
//! Samples both encoder phases every millisecond and feeds the quadrature
//! decoder. Completed detents are added to the shared position counter;
//! nothing else is touched from here.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::{Duration, Ticker};

use valvecycle_core::input::QuadratureDecoder;

use crate::channels::add_encoder_steps;

/// Sampling period in milliseconds
pub const ENCODER_SAMPLE_MS: u64 = 1;

/// Encoder task
#[embassy_executor::task]
pub async fn encoder_task(pin_a: Input<'static>, pin_b: Input<'static>) {
    info!("Encoder task started");

    let mut ticker = Ticker::every(Duration::from_millis(ENCODER_SAMPLE_MS));
    let mut decoder = QuadratureDecoder::new(pin_a.is_high(), pin_b.is_high());

    loop {
        ticker.next().await;

        if let Some(step) = decoder.sample(pin_a.is_high(), pin_b.is_high()) {
            trace!("Encoder step {}", step);
            add_encoder_steps(step);
        }
    }
}
