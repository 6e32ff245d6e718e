//! Byte-addressable persistent storage trait

/// Errors from the persistent storage device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// Access beyond the device capacity
    OutOfBounds,
    /// Bus transaction failed
    Bus,
    /// Device did not finish its internal write cycle in time
    Timeout,
}

/// Byte-addressable storage with finite write endurance
///
/// Models an EEPROM: any offset can be read or written individually and
/// contents survive power loss. Callers are responsible for limiting
/// writes; implementations write exactly what they are given.
pub trait Eeprom {
    /// Total capacity in bytes
    fn capacity(&self) -> usize;

    /// Read `buffer.len()` bytes starting at `offset`
    fn read(&mut self, offset: usize, buffer: &mut [u8]) -> Result<(), StorageError>;

    /// Write `data` starting at `offset`
    ///
    /// Returns once the data is durable.
    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), StorageError>;
}
