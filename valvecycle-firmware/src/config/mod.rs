//! Configuration loading
//!
//! The configuration is the `valvecycle.toml` embedded at build time,
//! parsed by the core crate's no_std parser.

use defmt::*;

use valvecycle_core::config::{parse_config, MachineConfig};

/// Embedded configuration (compiled into firmware)
/// Edit valvecycle.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../../valvecycle.toml");

/// Parse the embedded configuration, falling back to defaults
pub fn load() -> MachineConfig {
    let config = match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            error!("Embedded config invalid ({:?}), using defaults", e);
            MachineConfig::default()
        }
    };

    let cycle = &config.cycle;
    info!(
        "Cycle: filtration={}s gas_jet={}s relief={}s waiting={}s close_all={}s",
        cycle.filtration_s,
        cycle.gas_jet_s,
        cycle.pressure_relief_s,
        cycle.waiting_s,
        cycle.close_all_s
    );
    info!(
        "Relay channels: filtration={} gas_jet={} relief={}",
        config.relay.filtration, config.relay.gas_jet, config.relay.pressure_relief
    );
    debug!(
        "Input: debounce={}ms active_low={}, blink={}ms, watchdog={}ms",
        config.input.debounce_ms,
        config.input.button_active_low,
        config.indicator.blink_ms,
        config.watchdog.timeout_ms
    );

    config
}
