//! Configuration type definitions
//!
//! Board-agnostic device settings. Defaults match the values the timer
//! ships with; `validate` rejects anything outside the supported range.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Minimum pulse width (ms) for a crossing to count
pub const MIN_TRIGGER_MS: u32 = 15;

/// Minimum run time (ms) before the reset input may stop a run
pub const STOP_DWELL_MS: u32 = 500;

/// Time (ms) the reset input is ignored after it changed the state
pub const RESET_HOLDOFF_MS: u32 = 500;

/// Controller tick interval in milliseconds
pub const TICK_INTERVAL_MS: u32 = 10;

/// Payload byte the remote starter sends
pub const DEFAULT_START_MARKER: u8 = lightgate_protocol::START_MARKER;

/// SSD1306 I2C address (0x3C or 0x3D depending on the SA0 strap)
pub const DEFAULT_DISPLAY_ADDRESS: u8 = 0x3D;

/// Remote link baud rate
pub const DEFAULT_REMOTE_BAUD: u32 = 9600;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Unknown `[section]` header
    InvalidSection,
    /// Key not recognised in its section
    UnknownKey,
    /// Value could not be parsed for its key
    InvalidValue,
    /// Value parsed but is outside the allowed range
    OutOfRange(&'static str),
}

/// Timing parameters for the run state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimingConfig {
    /// Pulses must be strictly wider than this (ms) to be recorded
    pub min_trigger_ms: u32,
    /// A run must be older than this (ms) before reset stops it
    pub stop_dwell_ms: u32,
    /// Reset is ignored for this long (ms) after a reset-driven transition
    pub reset_holdoff_ms: u32,
    /// Controller tick period (ms)
    pub tick_ms: u32,
    /// Remote payload that starts a run
    pub start_marker: u8,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            min_trigger_ms: MIN_TRIGGER_MS,
            stop_dwell_ms: STOP_DWELL_MS,
            reset_holdoff_ms: RESET_HOLDOFF_MS,
            tick_ms: TICK_INTERVAL_MS,
            start_marker: DEFAULT_START_MARKER,
        }
    }
}

impl TimingConfig {
    /// Check that every field is within its supported range
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_trigger_ms == 0 || self.min_trigger_ms > 1000 {
            return Err(ConfigError::OutOfRange("timing.min_trigger_ms"));
        }
        if self.stop_dwell_ms > 60_000 {
            return Err(ConfigError::OutOfRange("timing.stop_dwell_ms"));
        }
        if self.reset_holdoff_ms > 10_000 {
            return Err(ConfigError::OutOfRange("timing.reset_holdoff_ms"));
        }
        if self.tick_ms == 0 || self.tick_ms > 100 {
            return Err(ConfigError::OutOfRange("timing.tick_ms"));
        }
        if !self.start_marker.is_ascii_graphic() {
            return Err(ConfigError::OutOfRange("timing.start_marker"));
        }
        Ok(())
    }
}

/// Light gate input settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GateConfig {
    /// Gate output is low while the beam is broken
    pub inverted: bool,
}

impl GateConfig {
    /// Whether the given pin level means the beam is unobstructed
    pub fn beam_clear(&self, level_high: bool) -> bool {
        level_high == self.inverted
    }
}

/// Display hardware settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayConfig {
    /// 7-bit I2C address of the OLED
    pub i2c_address: u8,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            i2c_address: DEFAULT_DISPLAY_ADDRESS,
        }
    }
}

/// Remote start link settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RemoteConfig {
    /// Listen for remote start frames
    pub enabled: bool,
    /// Radio modem UART baud rate
    pub baudrate: u32,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            baudrate: DEFAULT_REMOTE_BAUD,
        }
    }
}

/// Complete device configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeviceConfig {
    pub timing: TimingConfig,
    pub gate: GateConfig,
    pub display: DisplayConfig,
    pub remote: RemoteConfig,
}

impl DeviceConfig {
    /// Validate all sections
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.timing.validate()?;

        // 7-bit addresses outside the reserved ranges
        if !(0x08..=0x77).contains(&self.display.i2c_address) {
            return Err(ConfigError::OutOfRange("display.i2c_address"));
        }

        if !(1200..=921_600).contains(&self.remote.baudrate) {
            return Err(ConfigError::OutOfRange("remote.baudrate"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(DeviceConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_default_timing_constants() {
        let timing = TimingConfig::default();
        assert_eq!(timing.min_trigger_ms, 15);
        assert_eq!(timing.stop_dwell_ms, 500);
        assert_eq!(timing.start_marker, b'S');
    }

    #[test]
    fn test_zero_trigger_rejected() {
        let mut config = DeviceConfig::default();
        config.timing.min_trigger_ms = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::OutOfRange("timing.min_trigger_ms"))
        );
    }

    #[test]
    fn test_reserved_i2c_address_rejected() {
        let mut config = DeviceConfig::default();
        config.display.i2c_address = 0x78;
        assert_eq!(
            config.validate(),
            Err(ConfigError::OutOfRange("display.i2c_address"))
        );
    }

    #[test]
    fn test_control_marker_rejected() {
        let mut config = DeviceConfig::default();
        config.timing.start_marker = b'\n';
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_gate_polarity() {
        let normal = GateConfig { inverted: false };
        assert!(normal.beam_clear(false));
        assert!(!normal.beam_clear(true));

        let inverted = GateConfig { inverted: true };
        assert!(inverted.beam_clear(true));
        assert!(!inverted.beam_clear(false));
    }
}
