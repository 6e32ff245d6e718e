//! In-memory fakes for unit tests

use heapless::Vec;

use crate::traits::{Eeprom, RelayError, RelayMask, RelayOutput, StorageError, Watchdog};

/// Maximum device images kept by [`MemEeprom::record_snapshots`]
const MAX_SNAPSHOTS: usize = 32;

/// RAM-backed EEPROM that starts erased (0xFF) and counts writes
pub struct MemEeprom<const N: usize> {
    cells: [u8; N],
    writes: usize,
    recording: bool,
    snapshots: Vec<[u8; N], MAX_SNAPSHOTS>,
}

impl<const N: usize> MemEeprom<N> {
    pub fn new() -> Self {
        Self {
            cells: [0xFF; N],
            writes: 0,
            recording: false,
            snapshots: Vec::new(),
        }
    }

    /// Number of `write` calls that reached the device
    pub fn write_count(&self) -> usize {
        self.writes
    }

    /// Keep a copy of the whole device after every write
    pub fn record_snapshots(&mut self, on: bool) {
        self.recording = on;
        self.snapshots.clear();
    }

    pub fn snapshots(&self) -> &[[u8; N]] {
        &self.snapshots
    }
}

impl<const N: usize> Eeprom for MemEeprom<N> {
    fn capacity(&self) -> usize {
        N
    }

    fn read(&mut self, offset: usize, buffer: &mut [u8]) -> Result<(), StorageError> {
        let end = offset + buffer.len();
        if end > N {
            return Err(StorageError::OutOfBounds);
        }
        buffer.copy_from_slice(&self.cells[offset..end]);
        Ok(())
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), StorageError> {
        let end = offset + data.len();
        if end > N {
            return Err(StorageError::OutOfBounds);
        }
        self.cells[offset..end].copy_from_slice(data);
        self.writes += 1;
        if self.recording {
            let _ = self.snapshots.push(self.cells);
        }
        Ok(())
    }
}

/// Relay sink that remembers every mask it was given
pub struct RecordingRelay {
    pub current: RelayMask,
    pub history: Vec<RelayMask, 64>,
}

impl RecordingRelay {
    pub fn new() -> Self {
        Self {
            current: RelayMask::CLOSED,
            history: Vec::new(),
        }
    }
}

impl RelayOutput for RecordingRelay {
    fn set_channels(&mut self, mask: RelayMask) -> Result<(), RelayError> {
        self.current = mask;
        let _ = self.history.push(mask);
        Ok(())
    }
}

/// Watchdog that counts feeds
#[derive(Default)]
pub struct FakeWatchdog {
    pub timeout_ms: Option<u32>,
    pub feeds: u32,
}

impl Watchdog for FakeWatchdog {
    fn start(&mut self, timeout_ms: u32) {
        self.timeout_ms = Some(timeout_ms);
    }

    fn feed(&mut self) {
        self.feeds += 1;
    }
}
