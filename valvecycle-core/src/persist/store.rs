//! Wear-aware persistent store and failsafe flags
//!
//! Every write first reads the stored bytes and skips the device write when
//! nothing would change. Flag updates touch one flag at a time so a reset
//! between any two writes leaves at most one flag set.

use super::layout::{Layout, Persist, Slot, MAX_FIELD_SIZE};
use crate::state::{Durations, TimedState};
use crate::traits::{Eeprom, StorageError};

/// Result of opening the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OpenOutcome {
    /// Schema marker matched; contents kept
    Existing,
    /// Schema marker missing or stale; store reformatted with factory values
    Formatted,
}

/// Persistent store over a byte-addressable device
pub struct PersistentStore<E> {
    eeprom: E,
    layout: Layout,
}

impl<E: Eeprom> PersistentStore<E> {
    /// Wrap a device, computing the layout
    ///
    /// Fails with [`StorageError::OutOfBounds`] if the device is smaller
    /// than the layout.
    pub fn new(eeprom: E) -> Result<Self, StorageError> {
        let layout = Layout::compute();
        if eeprom.capacity() < layout.size() {
            return Err(StorageError::OutOfBounds);
        }
        Ok(Self { eeprom, layout })
    }

    /// Wrap a device and validate its schema marker
    ///
    /// A mismatched marker means the device is blank or was written by a
    /// firmware with a different layout. The store is then formatted with
    /// `factory` durations, cleared flags and a zero crash counter.
    pub fn open(eeprom: E, factory: &Durations) -> Result<(Self, OpenOutcome), StorageError> {
        let mut store = Self::new(eeprom)?;
        let marker = store.get(store.layout.schema)?;
        if marker == store.layout.schema_marker() {
            return Ok((store, OpenOutcome::Existing));
        }
        store.format(factory)?;
        Ok((store, OpenOutcome::Formatted))
    }

    /// Field layout
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Underlying device
    pub fn eeprom(&self) -> &E {
        &self.eeprom
    }

    /// Release the underlying device
    pub fn into_inner(self) -> E {
        self.eeprom
    }

    /// Read a field
    pub fn get<T: Persist>(&mut self, slot: Slot<T>) -> Result<T, StorageError> {
        let mut buf = [0u8; MAX_FIELD_SIZE];
        let bytes = &mut buf[..T::SIZE];
        self.eeprom.read(slot.offset(), bytes)?;
        Ok(T::decode(bytes))
    }

    /// Write a field unless it already holds `value`
    ///
    /// Returns `true` if the device was written.
    pub fn put<T: Persist>(&mut self, slot: Slot<T>, value: T) -> Result<bool, StorageError> {
        if self.get(slot)? == value {
            return Ok(false);
        }
        let mut buf = [0u8; MAX_FIELD_SIZE];
        let bytes = &mut buf[..T::SIZE];
        value.encode(bytes);
        self.eeprom.write(slot.offset(), bytes)?;
        Ok(true)
    }

    /// Write factory values and the schema marker
    ///
    /// The marker goes last so a reset mid-format is retried on next boot.
    pub fn format(&mut self, factory: &Durations) -> Result<(), StorageError> {
        self.save_durations(factory)?;
        self.clear_flags()?;
        self.put(self.layout.crash_counter, 0)?;
        let marker = self.layout.schema_marker();
        self.put(self.layout.schema, marker)?;
        Ok(())
    }

    /// Read the four editable durations
    pub fn load_durations(&mut self) -> Result<Durations, StorageError> {
        let mut durations = Durations::default();
        for phase in TimedState::ALL {
            durations.set(phase, self.get(self.layout.duration(phase))?);
        }
        Ok(durations)
    }

    /// Persist the four editable durations
    ///
    /// Returns the number of fields actually written.
    pub fn save_durations(&mut self, durations: &Durations) -> Result<usize, StorageError> {
        let mut written = 0;
        for (phase, ms) in durations.iter() {
            if self.put(self.layout.duration(phase), ms)? {
                written += 1;
            }
        }
        Ok(written)
    }

    /// Group whose in-progress flag is set, if any
    ///
    /// If several are set (never produced by this store) the earliest in
    /// cycle order wins.
    pub fn in_progress(&mut self) -> Result<Option<TimedState>, StorageError> {
        for group in TimedState::ALL {
            if self.get(self.layout.flag(group))? {
                return Ok(Some(group));
            }
        }
        Ok(None)
    }

    /// Set exactly one in-progress flag
    ///
    /// Clears every other flag first, then sets `group`. Flags that already
    /// hold the desired value are not rewritten.
    pub fn set_exclusive_flag(&mut self, group: TimedState) -> Result<(), StorageError> {
        for other in TimedState::ALL {
            if other != group {
                self.put(self.layout.flag(other), false)?;
            }
        }
        self.put(self.layout.flag(group), true)?;
        Ok(())
    }

    /// Clear every in-progress flag
    pub fn clear_flags(&mut self) -> Result<(), StorageError> {
        for group in TimedState::ALL {
            self.put(self.layout.flag(group), false)?;
        }
        Ok(())
    }

    /// Clear one in-progress flag
    pub fn clear_flag(&mut self, group: TimedState) -> Result<(), StorageError> {
        self.put(self.layout.flag(group), false)?;
        Ok(())
    }

    /// Number of recovered resets
    pub fn crash_count(&mut self) -> Result<u16, StorageError> {
        self.get(self.layout.crash_counter)
    }

    /// Increment the crash counter, saturating
    ///
    /// Returns the new count.
    pub fn record_crash(&mut self) -> Result<u16, StorageError> {
        let count = self.crash_count()?.saturating_add(1);
        self.put(self.layout.crash_counter, count)?;
        Ok(count)
    }
}
