//! Minimal TOML parser for `valvecycle.toml`
//!
//! Handles only the subset the configuration needs. It does NOT support
//! the full TOML spec.
//!
//! Supported features:
//! - `[section]` headers
//! - `key = value` pairs with integer or boolean values
//! - Comments (`# ...`), whole-line or trailing
//!
//! Keys not listed below are rejected so typos do not pass silently.

use super::types::{MachineConfig, RELAY_CHANNELS};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Line is not `key = value`
    InvalidLine,
    /// Key not valid in this section
    UnknownKey,
    /// Value has the wrong type or is out of range
    InvalidValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Cycle,
    Relay,
    Input,
    Indicator,
    Watchdog,
}

/// Parse a configuration file
///
/// Missing sections and keys keep their default values.
pub fn parse_config(input: &str) -> Result<MachineConfig, ParseError> {
    let mut config = MachineConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = strip_comment(line).trim();
        if line.is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let name = header.strip_suffix(']').ok_or(ParseError::InvalidSection)?;
            section = parse_section_header(name.trim())?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidLine)?;
        apply(&mut config, section, key, value)?;
    }

    Ok(config)
}

fn apply(
    config: &mut MachineConfig,
    section: Section,
    key: &str,
    value: &str,
) -> Result<(), ParseError> {
    match (section, key) {
        (Section::Cycle, "filtration_s") => config.cycle.filtration_s = parse_int(value)?,
        (Section::Cycle, "gas_jet_s") => config.cycle.gas_jet_s = parse_int(value)?,
        (Section::Cycle, "pressure_relief_s") => config.cycle.pressure_relief_s = parse_int(value)?,
        (Section::Cycle, "waiting_s") => config.cycle.waiting_s = parse_int(value)?,
        (Section::Cycle, "close_all_s") => config.cycle.close_all_s = parse_int(value)?,

        (Section::Relay, "filtration") => config.relay.filtration = parse_channel(value)?,
        (Section::Relay, "gas_jet") => config.relay.gas_jet = parse_channel(value)?,
        (Section::Relay, "pressure_relief") => config.relay.pressure_relief = parse_channel(value)?,

        (Section::Input, "debounce_ms") => config.input.debounce_ms = parse_int(value)?,
        (Section::Input, "button_active_low") => {
            config.input.button_active_low = parse_bool(value)?
        }

        (Section::Indicator, "blink_ms") => config.indicator.blink_ms = parse_nonzero(value)?,

        (Section::Watchdog, "timeout_ms") => config.watchdog.timeout_ms = parse_nonzero(value)?,

        _ => return Err(ParseError::UnknownKey),
    }
    Ok(())
}

fn parse_section_header(name: &str) -> Result<Section, ParseError> {
    match name {
        "cycle" => Ok(Section::Cycle),
        "relay" => Ok(Section::Relay),
        "input" => Ok(Section::Input),
        "indicator" => Ok(Section::Indicator),
        "watchdog" => Ok(Section::Watchdog),
        _ => Err(ParseError::InvalidSection),
    }
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Parse "key = value"
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let value = value.trim();

    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

/// Integer with optional `_` digit separators
fn parse_int(value: &str) -> Result<u32, ParseError> {
    let mut result: u32 = 0;
    let mut digits = 0;
    for c in value.chars() {
        match c {
            '_' => continue,
            '0'..='9' => {
                result = result
                    .checked_mul(10)
                    .and_then(|r| r.checked_add(c as u32 - '0' as u32))
                    .ok_or(ParseError::InvalidValue)?;
                digits += 1;
            }
            _ => return Err(ParseError::InvalidValue),
        }
    }
    if digits == 0 {
        return Err(ParseError::InvalidValue);
    }
    Ok(result)
}

fn parse_nonzero(value: &str) -> Result<u32, ParseError> {
    match parse_int(value)? {
        0 => Err(ParseError::InvalidValue),
        n => Ok(n),
    }
}

fn parse_channel(value: &str) -> Result<u8, ParseError> {
    let channel = parse_int(value)?;
    if (1..=u32::from(RELAY_CHANNELS)).contains(&channel) {
        Ok(channel as u8)
    } else {
        Err(ParseError::InvalidValue)
    }
}

fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}
