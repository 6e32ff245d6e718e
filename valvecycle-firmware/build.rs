//! Build script for valvecycle-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates valvecycle.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Relay channels on the Grove relay board
const RELAY_CHANNELS: i64 = 4;

/// RP2040 watchdog limit in milliseconds
const MAX_WATCHDOG_MS: i64 = 8388;

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
}

/// Validate valvecycle.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=valvecycle.toml");

    let config_path = Path::new("valvecycle.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: valvecycle.toml not found!                               ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds valvecycle.toml as its configuration.       ║\n\
            ║  Please create one in the valvecycle-firmware directory.         ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read valvecycle.toml                           ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in valvecycle.toml                   ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_required_sections(&config, &mut errors);
    validate_cycle(&config, &mut errors);
    validate_relay(&config, &mut errors);
    validate_timing(&config, &mut errors);
    report("Invalid configuration in valvecycle.toml", &errors);

    println!("cargo:warning=valvecycle.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn report(title: &str, errors: &[String]) {
    if errors.is_empty() {
        return;
    }
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

/// Every section the firmware reads must be present
fn validate_required_sections(config: &toml::Value, errors: &mut Vec<String>) {
    for section in ["cycle", "relay", "input", "indicator", "watchdog"] {
        match config.get(section) {
            Some(toml::Value::Table(_)) => {}
            Some(_) => errors.push(format!("[{}] must be a table", section)),
            None => errors.push(format!("Missing [{}] section", section)),
        }
    }
}

/// Integer key within `min..=max`
fn check_int(
    config: &toml::Value,
    section: &str,
    key: &str,
    min: i64,
    max: i64,
    errors: &mut Vec<String>,
) -> Option<i64> {
    let value = config.get(section)?.get(key);
    match value {
        Some(toml::Value::Integer(v)) if (min..=max).contains(v) => Some(*v),
        Some(toml::Value::Integer(_)) => {
            errors.push(format!("[{}] {} must be {}-{}", section, key, min, max));
            None
        }
        Some(_) => {
            errors.push(format!("[{}] {} must be an integer", section, key));
            None
        }
        None => {
            errors.push(format!("[{}] missing '{}'", section, key));
            None
        }
    }
}

/// Durations must fit in u32 milliseconds
fn validate_cycle(config: &toml::Value, errors: &mut Vec<String>) {
    let max_s = i64::from(u32::MAX) / 1000;
    for key in ["filtration_s", "gas_jet_s", "pressure_relief_s", "waiting_s", "close_all_s"] {
        check_int(config, "cycle", key, 0, max_s, errors);
    }
}

/// Channels must exist on the board and not be shared
fn validate_relay(config: &toml::Value, errors: &mut Vec<String>) {
    let mut used = Vec::new();
    for key in ["filtration", "gas_jet", "pressure_relief"] {
        if let Some(ch) = check_int(config, "relay", key, 1, RELAY_CHANNELS, errors) {
            if used.contains(&ch) {
                errors.push(format!("[relay] channel {} assigned twice", ch));
            }
            used.push(ch);
        }
    }
}

fn validate_timing(config: &toml::Value, errors: &mut Vec<String>) {
    check_int(config, "input", "debounce_ms", 0, 1000, errors);
    match config.get("input").and_then(|i| i.get("button_active_low")) {
        Some(toml::Value::Boolean(_)) => {}
        Some(_) => errors.push("[input] button_active_low must be true or false".to_string()),
        None => errors.push("[input] missing 'button_active_low'".to_string()),
    }
    check_int(config, "indicator", "blink_ms", 1, 60_000, errors);
    check_int(config, "watchdog", "timeout_ms", 1000, MAX_WATCHDOG_MS, errors);
}
