//! Persistent field layout
//!
//! Offsets are assigned by walking the schema once at startup and summing
//! the encoded size of each field. Changing a field's type moves every
//! field after it and changes the schema marker, so a store written by an
//! older firmware is detected and reformatted instead of misread.

use core::marker::PhantomData;

use crate::state::TimedState;

/// Largest encoded field, in bytes
pub const MAX_FIELD_SIZE: usize = 4;

/// Bumped when field meaning changes without a size change
pub const LAYOUT_REVISION: u8 = 1;

/// A value with a fixed-width byte encoding
pub trait Persist: Copy + PartialEq {
    /// Encoded size in bytes (at most [`MAX_FIELD_SIZE`])
    const SIZE: usize;

    /// Encode into `out`, which is exactly `SIZE` bytes
    fn encode(&self, out: &mut [u8]);

    /// Decode from `bytes`, which is exactly `SIZE` bytes
    fn decode(bytes: &[u8]) -> Self;
}

impl Persist for u8 {
    const SIZE: usize = 1;

    fn encode(&self, out: &mut [u8]) {
        out[0] = *self;
    }

    fn decode(bytes: &[u8]) -> Self {
        bytes[0]
    }
}

impl Persist for bool {
    const SIZE: usize = 1;

    fn encode(&self, out: &mut [u8]) {
        out[0] = u8::from(*self);
    }

    // Erased cells read 0xFF; only an explicit 1 counts as set.
    fn decode(bytes: &[u8]) -> Self {
        bytes[0] == 1
    }
}

impl Persist for u16 {
    const SIZE: usize = 2;

    fn encode(&self, out: &mut [u8]) {
        out.copy_from_slice(&self.to_le_bytes());
    }

    fn decode(bytes: &[u8]) -> Self {
        u16::from_le_bytes([bytes[0], bytes[1]])
    }
}

impl Persist for u32 {
    const SIZE: usize = 4;

    fn encode(&self, out: &mut [u8]) {
        out.copy_from_slice(&self.to_le_bytes());
    }

    fn decode(bytes: &[u8]) -> Self {
        u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }
}

/// A typed field at a computed offset
#[derive(Debug)]
pub struct Slot<T> {
    offset: usize,
    _marker: PhantomData<T>,
}

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Slot<T> {}

impl<T> PartialEq for Slot<T> {
    fn eq(&self, other: &Self) -> bool {
        self.offset == other.offset
    }
}

impl<T> Eq for Slot<T> {}

impl<T: Persist> Slot<T> {
    /// Byte offset of the field
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Offset one past the last byte of the field
    pub const fn end(&self) -> usize {
        self.offset + T::SIZE
    }
}

/// Assigns consecutive offsets
struct LayoutBuilder {
    cursor: usize,
    fields: u8,
}

impl LayoutBuilder {
    fn new() -> Self {
        Self { cursor: 0, fields: 0 }
    }

    fn slot<T: Persist>(&mut self) -> Slot<T> {
        let slot = Slot {
            offset: self.cursor,
            _marker: PhantomData,
        };
        self.cursor += T::SIZE;
        self.fields += 1;
        slot
    }
}

/// Named fields of the persistent region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Schema marker identifying this layout
    pub schema: Slot<u16>,
    /// Editable durations, indexed by [`TimedState::index`]
    pub durations: [Slot<u32>; TimedState::COUNT],
    /// In-progress flags, indexed by [`TimedState::index`]
    pub flags: [Slot<bool>; TimedState::COUNT],
    /// Count of resumed-after-reset events
    pub crash_counter: Slot<u16>,
    size: usize,
    fields: u8,
}

impl Layout {
    /// Walk the schema and assign offsets
    pub fn compute() -> Self {
        let mut b = LayoutBuilder::new();
        let schema = b.slot();
        let durations = [b.slot(), b.slot(), b.slot(), b.slot()];
        let flags = [b.slot(), b.slot(), b.slot(), b.slot()];
        let crash_counter = b.slot();

        Self {
            schema,
            durations,
            flags,
            crash_counter,
            size: b.cursor,
            fields: b.fields,
        }
    }

    /// Total bytes used
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Number of fields
    pub const fn field_count(&self) -> u8 {
        self.fields
    }

    /// Marker value written to [`Layout::schema`]
    ///
    /// Encodes the revision, field count and total size. Never equals the
    /// erased (0xFFFF) or zeroed pattern.
    pub const fn schema_marker(&self) -> u16 {
        ((LAYOUT_REVISION as u16 & 0x0F) << 12)
            | ((self.fields as u16 & 0x0F) << 8)
            | (self.size as u16 & 0xFF)
    }

    /// Duration field of a timed phase
    pub const fn duration(&self, phase: TimedState) -> Slot<u32> {
        self.durations[phase.index()]
    }

    /// In-progress flag of a failsafe group
    pub const fn flag(&self, group: TimedState) -> Slot<bool> {
        self.flags[group.index()]
    }
}
