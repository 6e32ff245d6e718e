//! Relay output trait

/// Bitmask of energized relay channels
///
/// Bit *n* energizes valve channel *n + 1*. A mask of zero closes every
/// valve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RelayMask(pub u8);

impl RelayMask {
    /// All valves closed
    pub const CLOSED: Self = Self(0);

    /// Mask with a single 1-based channel energized
    ///
    /// Returns `None` for channel 0 or channels beyond the 8-bit mask.
    pub const fn channel(channel: u8) -> Option<Self> {
        if channel == 0 || channel > 8 {
            None
        } else {
            Some(Self(1 << (channel - 1)))
        }
    }

    /// Raw bitmask
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// True if no channel is energized
    pub const fn is_closed(self) -> bool {
        self.0 == 0
    }

    /// Check whether a 1-based channel is energized
    pub const fn contains(self, channel: u8) -> bool {
        channel != 0 && channel <= 8 && (self.0 & (1 << (channel - 1))) != 0
    }
}

/// Errors from the relay board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RelayError {
    /// Bus transaction failed
    Bus,
    /// Mask selects channels the board does not have
    InvalidMask,
}

/// Sink for relay channel masks
///
/// The cycle scheduler is the only writer. Implementations apply the whole
/// mask at once; channels not set in the mask are released.
pub trait RelayOutput {
    /// Energize exactly the channels in `mask`
    fn set_channels(&mut self, mask: RelayMask) -> Result<(), RelayError>;

    /// Release every channel
    fn close_all(&mut self) -> Result<(), RelayError> {
        self.set_channels(RelayMask::CLOSED)
    }
}
