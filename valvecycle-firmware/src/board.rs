//! Board wiring and hardware glue
//!
//! Pin assignment (Raspberry Pi Pico with Grove shield):
//!
//! | Signal            | Pin        |
//! |-------------------|------------|
//! | I2C0 SDA / SCL    | GP8 / GP9  |
//! | Encoder A / B     | GP16 / GP17|
//! | Encoder button    | GP18       |
//! | Button LED        | GP19       |
//!
//! The relay board, the LCD (two addresses) and the EEPROM share I2C0.

use core::cell::RefCell;

use embassy_rp::i2c::{Blocking, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_rp::watchdog::Watchdog as RpWatchdog;
use embassy_time::{Delay, Duration, Instant};
use embedded_hal_bus::i2c::RefCellDevice;

use valvecycle_core::traits::Watchdog;
use valvecycle_core::Millis;
use valvecycle_drivers::display::GroveLcd;
use valvecycle_drivers::relay::GroveRelay;
use valvecycle_drivers::storage::{At24, At24Variant};

/// I2C clock
pub const I2C_FREQUENCY_HZ: u32 = 100_000;

/// EEPROM part fitted on the board
pub const EEPROM_VARIANT: At24Variant = At24Variant::At24c32;

/// The shared I2C0 bus
pub type I2cBus = RefCell<I2c<'static, I2C0, Blocking>>;

/// One device's handle on the shared bus
pub type BusDevice = RefCellDevice<'static, I2c<'static, I2C0, Blocking>>;

pub type Lcd = GroveLcd<BusDevice, Delay>;
pub type Relay = GroveRelay<BusDevice>;
pub type Eeprom = At24<BusDevice, Delay>;

/// Build the device drivers on the shared bus
pub fn devices(bus: &'static I2cBus) -> (Eeprom, Relay) {
    (
        At24::new(RefCellDevice::new(bus), Delay, EEPROM_VARIANT),
        GroveRelay::new(RefCellDevice::new(bus)),
    )
}

/// Build the display driver on the shared bus
pub fn lcd(bus: &'static I2cBus) -> Lcd {
    GroveLcd::new(RefCellDevice::new(bus), Delay)
}

/// Monotonic milliseconds since boot, wrapping
pub fn now() -> Millis {
    Millis(Instant::now().as_millis() as u32)
}

/// RP2040 hardware watchdog
pub struct BoardWatchdog(pub RpWatchdog);

impl Watchdog for BoardWatchdog {
    fn start(&mut self, timeout_ms: u32) {
        self.0.start(Duration::from_millis(u64::from(timeout_ms)));
    }

    fn feed(&mut self) {
        self.0.feed();
    }
}
