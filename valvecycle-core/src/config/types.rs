//! Configuration type definitions
//!
//! These types represent the machine configuration loaded from
//! `valvecycle.toml` at boot.

use crate::input::DEFAULT_DEBOUNCE_MS;
use crate::indicator::DEFAULT_BLINK_MS;
use crate::safety::WATCHDOG_TIMEOUT_MS;
use crate::state::{CycleTable, Durations, ValveMap};
use crate::traits::RelayMask;

/// Channels on the relay board
pub const RELAY_CHANNELS: u8 = 4;

/// Factory cycle timing, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleConfig {
    pub filtration_s: u32,
    pub gas_jet_s: u32,
    pub pressure_relief_s: u32,
    pub waiting_s: u32,
    /// Fixed pause of both close-all states
    pub close_all_s: u32,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            filtration_s: 360,
            gas_jet_s: 60,
            pressure_relief_s: 1,
            waiting_s: 120,
            close_all_s: 2,
        }
    }
}

impl CycleConfig {
    /// Factory durations in milliseconds
    pub fn durations(&self) -> Durations {
        Durations::new(
            secs_to_ms(self.filtration_s),
            secs_to_ms(self.gas_jet_s),
            secs_to_ms(self.pressure_relief_s),
            secs_to_ms(self.waiting_s),
        )
    }

    /// Close-all pause in milliseconds
    pub fn close_all_ms(&self) -> u32 {
        secs_to_ms(self.close_all_s)
    }
}

/// Relay channel per valve (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RelayConfig {
    pub filtration: u8,
    pub gas_jet: u8,
    pub pressure_relief: u8,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            filtration: 1,
            gas_jet: 3,
            pressure_relief: 2,
        }
    }
}

impl RelayConfig {
    /// Relay masks for the timed phases; waiting keeps every valve closed
    ///
    /// Out-of-range channels map to a closed mask; the parser rejects them.
    pub fn valves(&self) -> ValveMap {
        let mask = |ch: u8| RelayMask::channel(ch).unwrap_or(RelayMask::CLOSED);
        ValveMap::new(
            mask(self.filtration),
            mask(self.gas_jet),
            mask(self.pressure_relief),
            RelayMask::CLOSED,
        )
    }
}

/// Button input settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputConfig {
    pub debounce_ms: u32,
    /// Button pulls the line low when pressed
    pub button_active_low: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            button_active_low: true,
        }
    }
}

/// Run indicator settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IndicatorConfig {
    pub blink_ms: u32,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            blink_ms: DEFAULT_BLINK_MS,
        }
    }
}

/// Watchdog settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WatchdogConfig {
    pub timeout_ms: u32,
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self {
            timeout_ms: WATCHDOG_TIMEOUT_MS,
        }
    }
}

/// Complete machine configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MachineConfig {
    pub cycle: CycleConfig,
    pub relay: RelayConfig,
    pub input: InputConfig,
    pub indicator: IndicatorConfig,
    pub watchdog: WatchdogConfig,
}

impl MachineConfig {
    /// Cycle table seeded with the factory durations
    pub fn table(&self) -> CycleTable {
        CycleTable::new(
            self.cycle.durations(),
            self.cycle.close_all_ms(),
            self.relay.valves(),
        )
    }
}

fn secs_to_ms(s: u32) -> u32 {
    s.saturating_mul(1000)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{CycleState, TimedState};

    #[test]
    fn test_default_table() {
        let table = MachineConfig::default().table();
        assert_eq!(table.durations.get(TimedState::Filtration), 360_000);
        assert_eq!(table.durations.get(TimedState::PressureRelief), 1_000);
        assert_eq!(table.close_all_ms, 2_000);
        assert_eq!(table.valves, ValveMap::default());
        assert_eq!(table.relay_mask(CycleState::Waiting), RelayMask::CLOSED);
    }

    #[test]
    fn test_secs_saturate() {
        let cycle = CycleConfig {
            waiting_s: u32::MAX,
            ..CycleConfig::default()
        };
        assert_eq!(cycle.durations().get(TimedState::Waiting), u32::MAX);
    }
}
