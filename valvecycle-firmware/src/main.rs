//! Valve cycle controller firmware
//!
//! Runs a filtration plant's six-state valve sequence on an RP2040 with a
//! Grove I2C relay board, RGB LCD, AT24 EEPROM and a push-button rotary
//! encoder. The cycle survives resets: the last active state is checkpointed
//! and resumed on boot.

#![no_std]
#![no_main]

use core::cell::RefCell;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::watchdog::{ResetReason, Watchdog};
use embassy_time::Timer;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use valvecycle_core::indicator::RunIndicator;
use valvecycle_core::input::{InputDispatcher, InputSample};
use valvecycle_core::persist::OpenOutcome;
use valvecycle_core::safety::WatchdogSupervisor;
use valvecycle_core::scheduler::BootOutcome;
use valvecycle_core::view::Screen;
use valvecycle_core::{BootReport, ControlError, Controller};

mod board;
mod channels;
mod config;
mod display;
mod tasks;

use board::{BoardWatchdog, I2cBus};
use display::LcdSink;

/// Shared I2C bus (must live forever for the device handles)
static I2C_BUS: StaticCell<I2cBus> = StaticCell::new();

/// Delay between boot attempts when the EEPROM or relay board is unreachable
const BOOT_RETRY_MS: u64 = 1000;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Valve cycle firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let watchdog = Watchdog::new(p.WATCHDOG);
    match watchdog.reset_reason() {
        Some(ResetReason::TimedOut) => warn!("Previous run ended by watchdog timeout"),
        Some(ResetReason::Forced) => info!("Previous run ended by forced reset"),
        None => info!("Power-on reset"),
    }

    let config = config::load();

    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = board::I2C_FREQUENCY_HZ;
    let i2c = I2c::new_blocking(p.I2C0, p.PIN_9, p.PIN_8, i2c_config);
    let bus: &'static I2cBus = I2C_BUS.init(RefCell::new(i2c));
    info!("I2C0 initialized at {} Hz", board::I2C_FREQUENCY_HZ);

    let mut display = LcdSink::new(board::lcd(bus));
    display.show(&Screen::boot());

    let (controller, report) = loop {
        let (eeprom, relay) = board::devices(bus);
        match Controller::boot(eeprom, relay, &config) {
            Ok(booted) => break booted,
            Err(e) => {
                match e {
                    ControlError::Storage(e) => error!("Boot failed: storage error {:?}", e),
                    ControlError::Relay(e) => error!("Boot failed: relay error {:?}", e),
                }
                let mut screen = Screen::boot();
                screen.set_line(1, "Bus error, retry");
                display.show(&screen);
                Timer::after_millis(BOOT_RETRY_MS).await;
            }
        }
    };
    log_boot(&report);

    let now = board::now();
    let mut supervisor =
        WatchdogSupervisor::new(BoardWatchdog(watchdog), config.watchdog.timeout_ms);
    supervisor.arm(now);
    info!("Watchdog armed ({}ms)", supervisor.timeout_ms());

    // Encoder: A=GP16, B=GP17, push button GP18 (pulled up), LED GP19
    let pin_a = Input::new(p.PIN_16, Pull::Up);
    let pin_b = Input::new(p.PIN_17, Pull::Up);
    let button = Input::new(p.PIN_18, Pull::Up);
    let led = Output::new(p.PIN_19, Level::Low);

    let input = InputDispatcher::new(
        InputSample {
            position: channels::encoder_position(),
            button: button.is_high(),
        },
        config.input.debounce_ms,
        config.input.button_active_low,
        now,
    );

    let control = tasks::ControlLoop {
        controller,
        display,
        input,
        button,
        led,
        indicator: RunIndicator::new(config.indicator.blink_ms),
        supervisor,
    };

    spawner.spawn(unwrap!(tasks::encoder_task(pin_a, pin_b)));
    spawner.spawn(unwrap!(tasks::control_task(control)));

    info!("All tasks spawned, firmware running");
}

fn log_boot(report: &BootReport) {
    if report.store == OpenOutcome::Formatted {
        warn!("Persistent store formatted with factory durations");
    }
    match report.outcome {
        BootOutcome::Fresh => info!("Clean boot, cycle stopped"),
        BootOutcome::Recovered { state, crash_count } => {
            warn!("Recovered from reset in {:?} (crash #{})", state, crash_count);
        }
    }
    info!("Durations: {:?}, crashes: {}", report.durations, report.crash_count);
}
