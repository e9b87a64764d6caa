//! Minimal TOML reader for the device configuration
//!
//! Handles only the subset the config file uses. It does NOT support the
//! full TOML spec.
//!
//! Supported:
//! - `[timing]`, `[gate]`, `[display]` and `[remote]` section headers
//! - `key = value` with integer (decimal or `0x` hex), boolean or
//!   single-character string values
//! - Comments (`# ...`), including trailing comments
//!
//! Unknown sections and keys are errors so that typos don't silently
//! fall back to defaults.

use super::types::{ConfigError, DeviceConfig};

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Timing,
    Gate,
    Display,
    Remote,
}

/// Parse config text into a validated `DeviceConfig`
///
/// Keys that are absent keep their default values.
pub fn parse_config(input: &str) -> Result<DeviceConfig, ConfigError> {
    let mut config = DeviceConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = strip_comment(line).trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ConfigError::InvalidValue)?;
        apply_value(&mut config, section, key, value)?;
    }

    config.validate()?;
    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ConfigError> {
    match header.trim() {
        "timing" => Ok(Section::Timing),
        "gate" => Ok(Section::Gate),
        "display" => Ok(Section::Display),
        "remote" => Ok(Section::Remote),
        _ => Err(ConfigError::InvalidSection),
    }
}

/// Drop a `#` comment unless it sits inside a quoted string
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}

fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let value = value.trim();
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

fn apply_value(
    config: &mut DeviceConfig,
    section: Section,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    match (section, key) {
        (Section::Timing, "min_trigger_ms") => config.timing.min_trigger_ms = parse_u32(value)?,
        (Section::Timing, "stop_dwell_ms") => config.timing.stop_dwell_ms = parse_u32(value)?,
        (Section::Timing, "reset_holdoff_ms") => {
            config.timing.reset_holdoff_ms = parse_u32(value)?
        }
        (Section::Timing, "tick_ms") => config.timing.tick_ms = parse_u32(value)?,
        (Section::Timing, "start_marker") => config.timing.start_marker = parse_char(value)?,

        (Section::Gate, "inverted") => config.gate.inverted = parse_bool(value)?,

        (Section::Display, "i2c_address") => {
            config.display.i2c_address =
                u8::try_from(parse_u32(value)?).map_err(|_| ConfigError::InvalidValue)?
        }

        (Section::Remote, "enabled") => config.remote.enabled = parse_bool(value)?,
        (Section::Remote, "baudrate") => config.remote.baudrate = parse_u32(value)?,

        _ => return Err(ConfigError::UnknownKey),
    }
    Ok(())
}

fn parse_u32(value: &str) -> Result<u32, ConfigError> {
    // TOML allows `_` as a digit separator (`115_200`)
    let mut digits: heapless::String<16> = heapless::String::new();
    for ch in value.chars().filter(|&c| c != '_') {
        digits.push(ch).map_err(|_| ConfigError::InvalidValue)?;
    }

    let parsed = match digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => digits.parse(),
    };
    parsed.map_err(|_| ConfigError::InvalidValue)
}

fn parse_bool(value: &str) -> Result<bool, ConfigError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ConfigError::InvalidValue),
    }
}

/// Parse a quoted single ASCII character such as `"S"`
fn parse_char(value: &str) -> Result<u8, ConfigError> {
    let inner = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .ok_or(ConfigError::InvalidValue)?;
    match inner.as_bytes() {
        [byte] if byte.is_ascii() => Ok(*byte),
        _ => Err(ConfigError::InvalidValue),
    }
}
