//! The six-step valve cycle
//!
//! The cycle is a fixed, cyclic sequence. Four of the steps are timed
//! phases whose durations the operator can edit; the two close-all steps
//! are short fixed pauses with every valve closed.

use crate::traits::RelayMask;

/// Maximum display name length
pub const MAX_NAME_LEN: usize = 16;

/// One phase of the repeating valve sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CycleState {
    /// Filtration valve open
    Filtration,
    /// All valves closed before the gas jet
    CloseAll1,
    /// Gas-jet valve open
    GasJet,
    /// All valves closed before pressure relief
    CloseAll2,
    /// Relief valve open
    PressureRelief,
    /// All valves closed, waiting for the next filtration
    Waiting,
}

impl CycleState {
    /// Number of states in the cycle
    pub const COUNT: usize = 6;

    /// All states in cycle order
    pub const ALL: [CycleState; Self::COUNT] = [
        CycleState::Filtration,
        CycleState::CloseAll1,
        CycleState::GasJet,
        CycleState::CloseAll2,
        CycleState::PressureRelief,
        CycleState::Waiting,
    ];

    /// Position in the cycle (0-5)
    pub const fn index(self) -> usize {
        self as usize
    }

    /// State at a cycle position
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The state that follows this one, wrapping from the last to the first
    pub const fn next(self) -> Self {
        match self {
            CycleState::Filtration => CycleState::CloseAll1,
            CycleState::CloseAll1 => CycleState::GasJet,
            CycleState::GasJet => CycleState::CloseAll2,
            CycleState::CloseAll2 => CycleState::PressureRelief,
            CycleState::PressureRelief => CycleState::Waiting,
            CycleState::Waiting => CycleState::Filtration,
        }
    }

    /// Operator-visible name (at most 16 characters)
    pub const fn name(self) -> &'static str {
        match self {
            CycleState::Filtration => "Filtration",
            CycleState::CloseAll1 | CycleState::CloseAll2 => "Close All",
            CycleState::GasJet => "Gas-Jet",
            CycleState::PressureRelief => "Pressure Relief",
            CycleState::Waiting => "Waiting",
        }
    }

    /// The timed phase whose duration governs this state
    ///
    /// `None` for the two fixed close-all states.
    pub const fn timed(self) -> Option<TimedState> {
        match self {
            CycleState::Filtration => Some(TimedState::Filtration),
            CycleState::GasJet => Some(TimedState::GasJet),
            CycleState::PressureRelief => Some(TimedState::PressureRelief),
            CycleState::Waiting => Some(TimedState::Waiting),
            CycleState::CloseAll1 | CycleState::CloseAll2 => None,
        }
    }

    /// Failsafe group checkpointed while this state is active
    ///
    /// A close-all state belongs to the timed phase that follows it, so a
    /// reset during the short closing pause resumes into the next phase.
    pub const fn failsafe_group(self) -> TimedState {
        match self {
            CycleState::Filtration => TimedState::Filtration,
            CycleState::CloseAll1 | CycleState::GasJet => TimedState::GasJet,
            CycleState::CloseAll2 | CycleState::PressureRelief => TimedState::PressureRelief,
            CycleState::Waiting => TimedState::Waiting,
        }
    }

    /// True for the two close-all states
    pub const fn is_close_all(self) -> bool {
        matches!(self, CycleState::CloseAll1 | CycleState::CloseAll2)
    }
}

/// One of the four timed phases
///
/// Names both an editable duration and a failsafe group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimedState {
    Filtration,
    GasJet,
    PressureRelief,
    Waiting,
}

impl TimedState {
    /// Number of timed phases
    pub const COUNT: usize = 4;

    /// All timed phases in cycle order
    pub const ALL: [TimedState; Self::COUNT] = [
        TimedState::Filtration,
        TimedState::GasJet,
        TimedState::PressureRelief,
        TimedState::Waiting,
    ];

    /// Ordinal among the timed phases (0-3)
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The cycle state this phase resumes into
    pub const fn state(self) -> CycleState {
        match self {
            TimedState::Filtration => CycleState::Filtration,
            TimedState::GasJet => CycleState::GasJet,
            TimedState::PressureRelief => CycleState::PressureRelief,
            TimedState::Waiting => CycleState::Waiting,
        }
    }

    /// Operator-visible name
    pub const fn name(self) -> &'static str {
        self.state().name()
    }
}

/// The four operator-editable durations, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Durations {
    ms: [u32; TimedState::COUNT],
}

impl Durations {
    /// Build from per-phase values in cycle order
    pub const fn new(
        filtration_ms: u32,
        gas_jet_ms: u32,
        pressure_relief_ms: u32,
        waiting_ms: u32,
    ) -> Self {
        Self {
            ms: [filtration_ms, gas_jet_ms, pressure_relief_ms, waiting_ms],
        }
    }

    /// Duration of a timed phase
    pub const fn get(&self, phase: TimedState) -> u32 {
        self.ms[phase.index()]
    }

    /// Replace the duration of a timed phase
    pub fn set(&mut self, phase: TimedState, ms: u32) {
        self.ms[phase.index()] = ms;
    }

    /// Mutable access for in-place editing
    pub fn get_mut(&mut self, phase: TimedState) -> &mut u32 {
        &mut self.ms[phase.index()]
    }

    /// Iterate `(phase, duration)` pairs in cycle order
    pub fn iter(&self) -> impl Iterator<Item = (TimedState, u32)> + '_ {
        TimedState::ALL.iter().map(move |&p| (p, self.get(p)))
    }
}

/// Relay channel masks for each timed phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ValveMap {
    masks: [RelayMask; TimedState::COUNT],
}

impl ValveMap {
    /// Build from per-phase masks in cycle order
    pub const fn new(
        filtration: RelayMask,
        gas_jet: RelayMask,
        pressure_relief: RelayMask,
        waiting: RelayMask,
    ) -> Self {
        Self {
            masks: [filtration, gas_jet, pressure_relief, waiting],
        }
    }

    /// Mask energized during a timed phase
    pub const fn get(&self, phase: TimedState) -> RelayMask {
        self.masks[phase.index()]
    }
}

impl Default for ValveMap {
    /// Filtration on channel 1, gas jet on channel 3, relief on channel 2
    fn default() -> Self {
        Self::new(RelayMask(0b0001), RelayMask(0b0100), RelayMask(0b0010), RelayMask::CLOSED)
    }
}

/// Runtime cycle table
///
/// Owned by the controller. The scheduler only reads it; the settings
/// menu edits [`CycleTable::durations`] in place.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleTable {
    /// Editable durations
    pub durations: Durations,
    /// Fixed duration of both close-all states
    pub close_all_ms: u32,
    /// Relay masks of the timed phases
    pub valves: ValveMap,
}

impl CycleTable {
    /// Create a table
    pub const fn new(durations: Durations, close_all_ms: u32, valves: ValveMap) -> Self {
        Self {
            durations,
            close_all_ms,
            valves,
        }
    }

    /// Nominal duration of a state
    pub fn duration(&self, state: CycleState) -> u32 {
        match state.timed() {
            Some(phase) => self.durations.get(phase),
            None => self.close_all_ms,
        }
    }

    /// Relay mask energized while a state is active
    pub fn relay_mask(&self, state: CycleState) -> RelayMask {
        match state.timed() {
            Some(phase) => self.valves.get(phase),
            None => RelayMask::CLOSED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_order_wraps() {
        let mut state = CycleState::Filtration;
        for expected in CycleState::ALL.iter().cycle().skip(1).take(12) {
            state = state.next();
            assert_eq!(state, *expected);
        }
    }

    #[test]
    fn test_index_roundtrip() {
        for (i, state) in CycleState::ALL.iter().enumerate() {
            assert_eq!(state.index(), i);
            assert_eq!(CycleState::from_index(i), Some(*state));
        }
        assert_eq!(CycleState::from_index(6), None);
    }

    #[test]
    fn test_close_all_maps_to_following_group() {
        assert_eq!(CycleState::CloseAll1.failsafe_group(), TimedState::GasJet);
        assert_eq!(CycleState::CloseAll2.failsafe_group(), TimedState::PressureRelief);
        for phase in TimedState::ALL {
            assert_eq!(phase.state().failsafe_group(), phase);
        }
    }

    #[test]
    fn test_names_fit_display() {
        for state in CycleState::ALL {
            assert!(state.name().len() <= MAX_NAME_LEN);
        }
    }

    #[test]
    fn test_table_lookup() {
        let table = CycleTable::new(
            Durations::new(360_000, 60_000, 1_000, 120_000),
            2_000,
            ValveMap::default(),
        );
        assert_eq!(table.duration(CycleState::GasJet), 60_000);
        assert_eq!(table.duration(CycleState::CloseAll1), 2_000);
        assert_eq!(table.duration(CycleState::CloseAll2), 2_000);
        assert_eq!(table.relay_mask(CycleState::Filtration), RelayMask(0b0001));
        assert_eq!(table.relay_mask(CycleState::CloseAll2), RelayMask::CLOSED);
        assert_eq!(table.relay_mask(CycleState::Waiting), RelayMask::CLOSED);
    }
}
