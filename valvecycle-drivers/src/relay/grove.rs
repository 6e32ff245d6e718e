//! Grove 4-channel I2C relay
//!
//! The board's microcontroller accepts single-byte commands followed by
//! an argument:
//!
//! - `0x10 mask`: drive all channels at once, bit *n* = channel *n + 1*
//! - `0x13`: read the board firmware version
//!
//! The whole mask is written in one transaction, so channels switch
//! together.

use embedded_hal::i2c::I2c;
use valvecycle_core::traits::{RelayError, RelayMask, RelayOutput};

/// Factory I2C address
pub const DEFAULT_ADDRESS: u8 = 0x11;

/// Relay channels on the board
pub const CHANNELS: u8 = 4;

/// Board commands
pub mod cmd {
    /// Set all channel states from a bitmask
    pub const CHANNEL_CTRL: u8 = 0x10;
    /// Read the firmware version
    pub const READ_FIRMWARE_VER: u8 = 0x13;
}

/// Grove I2C relay driver
pub struct GroveRelay<I2C> {
    i2c: I2C,
    address: u8,
    state: RelayMask,
}

impl<I2C: I2c> GroveRelay<I2C> {
    /// Create a driver at the factory address
    pub fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, DEFAULT_ADDRESS)
    }

    /// Create a driver at a custom address
    pub fn with_address(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            state: RelayMask::CLOSED,
        }
    }

    /// Last mask written successfully
    pub fn state(&self) -> RelayMask {
        self.state
    }

    /// Board firmware version
    pub fn firmware_version(&mut self) -> Result<u8, RelayError> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.address, &[cmd::READ_FIRMWARE_VER], &mut buf)
            .map_err(|_| RelayError::Bus)?;
        Ok(buf[0])
    }

    /// Release the bus
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> RelayOutput for GroveRelay<I2C> {
    fn set_channels(&mut self, mask: RelayMask) -> Result<(), RelayError> {
        if mask.bits() >> CHANNELS != 0 {
            return Err(RelayError::InvalidMask);
        }
        self.i2c
            .write(self.address, &[cmd::CHANNEL_CTRL, mask.bits()])
            .map_err(|_| RelayError::Bus)?;
        self.state = mask;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakeI2c;

    #[test]
    fn test_set_channels_writes_mask() {
        let mut relay = GroveRelay::new(FakeI2c::new(&[DEFAULT_ADDRESS]));
        relay.set_channels(RelayMask(0b0101)).unwrap();
        relay.close_all().unwrap();
        assert_eq!(relay.state(), RelayMask::CLOSED);

        let bus = relay.release();
        let writes: heapless::Vec<&[u8], 4> = bus.writes_to(DEFAULT_ADDRESS).collect();
        assert_eq!(writes.as_slice(), &[&[0x10, 0b0101][..], &[0x10, 0x00][..]]);
    }

    #[test]
    fn test_rejects_missing_channels() {
        let mut relay = GroveRelay::new(FakeI2c::new(&[DEFAULT_ADDRESS]));
        assert_eq!(
            relay.set_channels(RelayMask(0b1_0000)),
            Err(RelayError::InvalidMask)
        );
        assert!(relay.release().frames.is_empty());
    }

    #[test]
    fn test_bus_error_keeps_state() {
        let mut bus = FakeI2c::new(&[DEFAULT_ADDRESS]);
        bus.nack_next = 1;
        let mut relay = GroveRelay::new(bus);
        assert_eq!(relay.set_channels(RelayMask(0b0001)), Err(RelayError::Bus));
        assert_eq!(relay.state(), RelayMask::CLOSED);
        relay.set_channels(RelayMask(0b0001)).unwrap();
        assert_eq!(relay.state(), RelayMask(0b0001));
    }

    #[test]
    fn test_firmware_version() {
        let mut bus = FakeI2c::new(&[DEFAULT_ADDRESS]);
        bus.memory[0] = 0x05;
        let mut relay = GroveRelay::new(bus);
        assert_eq!(relay.firmware_version(), Ok(0x05));
    }
}
