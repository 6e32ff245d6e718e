//! Menu state types
//!
//! The menu is a tagged state machine: the top level holds a tab, the
//! settings level holds an entry, and only duration entries carry an edit
//! state.

use crate::state::TimedState;

/// Top-level tab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MainTab {
    /// Start, stop or resume the cycle
    StartStop,
    /// Open the settings list
    Settings,
}

impl MainTab {
    /// The other tab
    pub const fn toggle(self) -> Self {
        match self {
            MainTab::StartStop => MainTab::Settings,
            MainTab::Settings => MainTab::StartStop,
        }
    }
}

/// Duration editor sub-state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EditState {
    /// Entry selected, not editing
    #[default]
    Browsing,
    /// LEFT/RIGHT change the minutes component
    Minutes,
    /// LEFT/RIGHT change the seconds component
    Seconds,
}

impl EditState {
    /// SELECT cycles Browsing -> Minutes -> Seconds -> Browsing
    pub const fn next(self) -> Self {
        match self {
            EditState::Browsing => EditState::Minutes,
            EditState::Minutes => EditState::Seconds,
            EditState::Seconds => EditState::Browsing,
        }
    }

    /// Step applied per detent in milliseconds, if editing
    pub const fn step_ms(self) -> Option<u32> {
        match self {
            EditState::Browsing => None,
            EditState::Minutes => Some(MINUTE_STEP_MS),
            EditState::Seconds => Some(SECOND_STEP_MS),
        }
    }

    /// A field is under edit
    pub const fn is_editing(self) -> bool {
        !matches!(self, EditState::Browsing)
    }
}

/// Minutes field step
pub const MINUTE_STEP_MS: u32 = 60_000;
/// Seconds field step
pub const SECOND_STEP_MS: u32 = 1_000;

/// One entry of the settings list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingsEntry {
    Return,
    Duration(TimedState, EditState),
    Save,
    Load,
    Reset,
    Failsafe,
}

impl SettingsEntry {
    /// Number of entries in the list
    pub const COUNT: usize = 5 + TimedState::COUNT;

    /// Position in the list
    pub const fn ordinal(self) -> usize {
        match self {
            SettingsEntry::Return => 0,
            SettingsEntry::Duration(phase, _) => 1 + phase.index(),
            SettingsEntry::Save => 5,
            SettingsEntry::Load => 6,
            SettingsEntry::Reset => 7,
            SettingsEntry::Failsafe => 8,
        }
    }

    /// Entry at a list position, wrapping out-of-range ordinals
    pub fn from_ordinal(ordinal: usize) -> Self {
        match ordinal % Self::COUNT {
            0 => SettingsEntry::Return,
            n @ 1..=4 => SettingsEntry::Duration(TimedState::ALL[n - 1], EditState::Browsing),
            5 => SettingsEntry::Save,
            6 => SettingsEntry::Load,
            7 => SettingsEntry::Reset,
            _ => SettingsEntry::Failsafe,
        }
    }

    /// Neighbouring entry, wrapping in both directions
    pub fn step(self, delta: i8) -> Self {
        let count = Self::COUNT as isize;
        let ordinal = (self.ordinal() as isize + delta as isize).rem_euclid(count);
        Self::from_ordinal(ordinal as usize)
    }

    /// Edit state, if this is a duration entry
    pub const fn edit_state(self) -> Option<EditState> {
        match self {
            SettingsEntry::Duration(_, edit) => Some(edit),
            _ => None,
        }
    }
}

/// Where the operator is in the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuState {
    Main(MainTab),
    Settings(SettingsEntry),
}

impl Default for MenuState {
    fn default() -> Self {
        MenuState::Main(MainTab::StartStop)
    }
}

/// Effect the menu asks its owner to carry out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuCommand {
    /// Start, resume or stop the cycle
    ToggleRun,
    /// Left the settings list; persist the durations
    ExitSettings,
    /// Write the durations to persistent storage
    Save,
    /// Replace the durations with the persisted ones
    Load,
    /// Return the cycle to its initial condition
    Reset,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinals_round_trip() {
        for ordinal in 0..SettingsEntry::COUNT {
            assert_eq!(SettingsEntry::from_ordinal(ordinal).ordinal(), ordinal);
        }
    }

    #[test]
    fn test_step_wraps() {
        assert_eq!(SettingsEntry::Return.step(-1), SettingsEntry::Failsafe);
        assert_eq!(SettingsEntry::Failsafe.step(1), SettingsEntry::Return);
        assert_eq!(
            SettingsEntry::Return.step(1),
            SettingsEntry::Duration(TimedState::Filtration, EditState::Browsing)
        );
    }

    #[test]
    fn test_step_leaves_edit_state() {
        let entry = SettingsEntry::Duration(TimedState::GasJet, EditState::Seconds);
        assert_eq!(
            entry.step(1),
            SettingsEntry::Duration(TimedState::PressureRelief, EditState::Browsing)
        );
    }

    #[test]
    fn test_edit_cycle() {
        assert_eq!(EditState::Browsing.next(), EditState::Minutes);
        assert_eq!(EditState::Minutes.next(), EditState::Seconds);
        assert_eq!(EditState::Seconds.next(), EditState::Browsing);
        assert_eq!(EditState::Browsing.step_ms(), None);
    }
}
