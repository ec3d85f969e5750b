//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub team: TeamConfig,

    #[serde(default)]
    pub channels: ChannelsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Competition team settings
#[derive(Debug, Deserialize, Clone)]
pub struct TeamConfig {
    /// Team identifier, byte 4 of every HYI frame
    #[serde(default = "default_team_id")]
    pub id: u8,

    /// HYI transmit period in milliseconds
    #[serde(default = "default_transmit_interval_ms")]
    pub transmit_interval_ms: u64,
}

/// Optional device paths to connect at startup
///
/// A missing path leaves that channel closed until a connect command
/// arrives.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ChannelsConfig {
    #[serde(default)]
    pub avionics_device: Option<String>,

    #[serde(default)]
    pub payload_device: Option<String>,

    #[serde(default)]
    pub judging_device: Option<String>,
}

/// Sample file logging settings
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Per-decode payload sample file
    #[serde(default = "default_payload_log_path")]
    pub payload_log_path: String,

    /// Merged avionics + payload snapshot file
    #[serde(default = "default_merged_log_path")]
    pub merged_log_path: String,
}

// Default value functions
fn default_team_id() -> u8 { 22 }
fn default_transmit_interval_ms() -> u64 { 200 }

fn default_payload_log_path() -> String { "payload_samples.txt".to_string() }
fn default_merged_log_path() -> String { "raw_telemetry_log.txt".to_string() }

impl Default for TeamConfig {
    fn default() -> Self {
        Self {
            id: default_team_id(),
            transmit_interval_ms: default_transmit_interval_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            payload_log_path: default_payload_log_path(),
            merged_log_path: default_merged_log_path(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// * `Result<Config>` - Loaded and validated configuration
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, TOML parsing fails or
    /// validation fails.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.team.transmit_interval_ms == 0 || self.team.transmit_interval_ms > 10000 {
            return Err(crate::error::BridgeError::Config(toml::de::Error::custom(
                "transmit_interval_ms must be between 1 and 10000",
            )));
        }

        if self.logging.payload_log_path.is_empty() || self.logging.merged_log_path.is_empty() {
            return Err(crate::error::BridgeError::Config(toml::de::Error::custom(
                "log paths cannot be empty",
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.team.id, 22);
        assert_eq!(config.team.transmit_interval_ms, 200);
        assert!(config.channels.avionics_device.is_none());
        assert_eq!(config.logging.payload_log_path, "payload_samples.txt");
    }

    #[test]
    fn test_full_config_parses() {
        let toml = r#"
            [team]
            id = 7
            transmit_interval_ms = 200

            [channels]
            avionics_device = "/dev/ttyUSB0"
            payload_device = "/dev/ttyUSB1"
            judging_device = "/dev/ttyUSB2"

            [logging]
            payload_log_path = "payload.txt"
            merged_log_path = "merged.txt"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        config.validate().unwrap();
        assert_eq!(config.team.id, 7);
        assert_eq!(
            config.channels.judging_device.as_deref(),
            Some("/dev/ttyUSB2")
        );
    }

    #[test]
    fn test_zero_interval_rejected() {
        let config: Config = toml::from_str("[team]\ntransmit_interval_ms = 0").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_log_path_rejected() {
        let config: Config = toml::from_str("[logging]\nmerged_log_path = \"\"").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = Config::load("/nonexistent/bridge-config.toml");
        assert!(matches!(result, Err(crate::error::BridgeError::Io(_))));
    }
}
