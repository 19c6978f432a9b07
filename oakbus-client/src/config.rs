//! Configuration for the RTU client.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] json5::Error),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}

/// Serial line settings for an RTU channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerialConfig {
    /// Serial port path (e.g., "/dev/ttyUSB0" or "COM1")
    pub port: String,

    /// Baud rate (default: 9600)
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,

    /// Data bits (default: 8)
    #[serde(default = "default_data_bits")]
    pub data_bits: u8,

    /// Parity: "none", "even", or "odd" (default: "none")
    #[serde(default = "default_parity")]
    pub parity: String,

    /// Stop bits: 1 or 2 (default: 1)
    #[serde(default = "default_stop_bits")]
    pub stop_bits: u8,
}

fn default_baud_rate() -> u32 {
    9600
}

fn default_data_bits() -> u8 {
    8
}

fn default_parity() -> String {
    "none".to_string()
}

fn default_stop_bits() -> u8 {
    1
}

impl SerialConfig {
    /// Line settings for `port` with everything else at its default.
    pub fn with_defaults(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            baud_rate: default_baud_rate(),
            data_bits: default_data_bits(),
            parity: default_parity(),
            stop_bits: default_stop_bits(),
        }
    }

    /// Validate the line settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port.is_empty() {
            return Err(ConfigError::Validation(
                "Serial port path cannot be empty".to_string(),
            ));
        }

        match self.parity.to_lowercase().as_str() {
            "none" | "even" | "odd" => {}
            other => {
                return Err(ConfigError::Validation(format!(
                    "Invalid parity '{}' (use none, even, or odd)",
                    other
                )));
            }
        }

        if !(5..=8).contains(&self.data_bits) {
            return Err(ConfigError::Validation(format!(
                "Invalid data bits {} (use 5-8)",
                self.data_bits
            )));
        }

        if self.stop_bits != 1 && self.stop_bits != 2 {
            return Err(ConfigError::Validation(format!(
                "Invalid stop bits {} (use 1 or 2)",
                self.stop_bits
            )));
        }

        Ok(())
    }
}

/// Complete client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Serial line settings
    pub serial: SerialConfig,

    /// Station address to talk to (1-247)
    #[serde(default = "default_station")]
    pub station: u8,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_station() -> u8 {
    1
}

impl ClientConfig {
    /// Load configuration from a JSON5 file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: ClientConfig = json5::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.serial.validate()?;

        if self.station == 0 || self.station > 247 {
            return Err(ConfigError::Validation(format!(
                "Station address {} out of range (use 1-247)",
                self.station
            )));
        }

        Ok(())
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let json = r#"{
            serial: { port: "/dev/ttyUSB0" }
        }"#;

        let config: ClientConfig = json5::from_str(json).unwrap();
        config.validate().unwrap();

        assert_eq!(config.serial.port, "/dev/ttyUSB0");
        assert_eq!(config.serial.baud_rate, 9600);
        assert_eq!(config.serial.data_bits, 8);
        assert_eq!(config.serial.parity, "none");
        assert_eq!(config.serial.stop_bits, 1);
        assert_eq!(config.station, 1);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_full_config() {
        let json = r#"{
            serial: {
                port: "COM3",
                baud_rate: 19200,
                parity: "even",
                stop_bits: 2,
            },
            station: 6,
            logging: { level: "debug" },
        }"#;

        let config: ClientConfig = json5::from_str(json).unwrap();
        config.validate().unwrap();

        assert_eq!(config.serial.baud_rate, 19200);
        assert_eq!(config.serial.parity, "even");
        assert_eq!(config.serial.stop_bits, 2);
        assert_eq!(config.station, 6);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_validate_rejects_bad_parity() {
        let json = r#"{
            serial: { port: "/dev/ttyUSB0", parity: "mark" }
        }"#;

        let config: ClientConfig = json5::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_station_zero() {
        let json = r#"{
            serial: { port: "/dev/ttyUSB0" },
            station: 0,
        }"#;

        let config: ClientConfig = json5::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_station_above_range() {
        let json = r#"{
            serial: { port: "/dev/ttyUSB0" },
            station: 248,
        }"#;

        let config: ClientConfig = json5::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_with_defaults() {
        let serial = SerialConfig::with_defaults("/dev/ttyACM1");
        serial.validate().unwrap();
        assert_eq!(serial.port, "/dev/ttyACM1");
        assert_eq!(serial.baud_rate, 9600);
    }
}
