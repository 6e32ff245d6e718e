//! AT24Cxx I2C EEPROM
//!
//! Two-byte word addressing (AT24C32 and up). Writes are split at page
//! boundaries; after each page the device is busy with its internal write
//! cycle and NACKs its address, so the driver polls until it answers.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use valvecycle_core::traits::{Eeprom, StorageError};

/// Address with A0-A2 tied low
pub const DEFAULT_ADDRESS: u8 = 0x50;

/// Polls of the busy device before giving up (datasheet max is 5 ms)
const WRITE_POLL_ATTEMPTS: u32 = 10;
const WRITE_POLL_INTERVAL_US: u32 = 1000;

/// Largest page among the supported parts
const MAX_PAGE: usize = 64;

/// Supported parts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum At24Variant {
    /// 4 KiB, 32-byte pages
    At24c32,
    /// 8 KiB, 32-byte pages
    At24c64,
    /// 32 KiB, 64-byte pages
    At24c256,
}

impl At24Variant {
    /// Capacity in bytes
    pub const fn capacity(self) -> usize {
        match self {
            At24Variant::At24c32 => 4096,
            At24Variant::At24c64 => 8192,
            At24Variant::At24c256 => 32768,
        }
    }

    /// Page size in bytes
    pub const fn page_size(self) -> usize {
        match self {
            At24Variant::At24c32 | At24Variant::At24c64 => 32,
            At24Variant::At24c256 => 64,
        }
    }
}

/// AT24Cxx driver
pub struct At24<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
    variant: At24Variant,
}

impl<I2C: I2c, D: DelayNs> At24<I2C, D> {
    /// Create a driver at the default address
    pub fn new(i2c: I2C, delay: D, variant: At24Variant) -> Self {
        Self {
            i2c,
            delay,
            address: DEFAULT_ADDRESS,
            variant,
        }
    }

    /// Use a different bus address
    pub fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    /// Release the bus and delay
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    fn check_bounds(&self, offset: usize, len: usize) -> Result<(), StorageError> {
        match offset.checked_add(len) {
            Some(end) if end <= self.variant.capacity() => Ok(()),
            _ => Err(StorageError::OutOfBounds),
        }
    }

    fn write_page(&mut self, offset: usize, data: &[u8]) -> Result<(), StorageError> {
        let mut frame = [0u8; 2 + MAX_PAGE];
        frame[0] = (offset >> 8) as u8;
        frame[1] = offset as u8;
        frame[2..2 + data.len()].copy_from_slice(data);
        self.i2c
            .write(self.address, &frame[..2 + data.len()])
            .map_err(|_| StorageError::Bus)?;
        self.wait_ready(offset)
    }

    /// Acknowledge polling
    fn wait_ready(&mut self, offset: usize) -> Result<(), StorageError> {
        let word = [(offset >> 8) as u8, offset as u8];
        for _ in 0..WRITE_POLL_ATTEMPTS {
            self.delay.delay_us(WRITE_POLL_INTERVAL_US);
            if self.i2c.write(self.address, &word).is_ok() {
                return Ok(());
            }
        }
        Err(StorageError::Timeout)
    }
}

impl<I2C: I2c, D: DelayNs> Eeprom for At24<I2C, D> {
    fn capacity(&self) -> usize {
        self.variant.capacity()
    }

    fn read(&mut self, offset: usize, buffer: &mut [u8]) -> Result<(), StorageError> {
        self.check_bounds(offset, buffer.len())?;
        if buffer.is_empty() {
            return Ok(());
        }
        let word = [(offset >> 8) as u8, offset as u8];
        self.i2c
            .write_read(self.address, &word, buffer)
            .map_err(|_| StorageError::Bus)
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), StorageError> {
        self.check_bounds(offset, data.len())?;
        let page = self.variant.page_size();
        let mut offset = offset;
        let mut rest = data;
        while !rest.is_empty() {
            let room = page - offset % page;
            let (chunk, tail) = rest.split_at(room.min(rest.len()));
            self.write_page(offset, chunk)?;
            offset += chunk.len();
            rest = tail;
        }
        Ok(())
    }
}
