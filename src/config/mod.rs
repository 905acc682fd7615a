//! Configuration management module
//!
//! Holds the per-run benchmark parameters and the persisted user
//! defaults, including loading and saving the settings file.

use crate::{Result, SpeedTestError, APP_NAME, CONFIG_FILE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Maximum accepted payload size
const MAX_FILE_SIZE: u64 = 100 * 1024 * 1024 * 1024; // 100 GiB

/// Parameters for a single benchmark run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Normalized identifier of the volume under test
    pub target_volume: String,
    /// Payload size in bytes
    pub file_size: u64,
    /// Number of write/read cycles to execute
    pub iterations: u32,
}

impl RunConfig {
    /// Build a run configuration from user-facing units.
    ///
    /// The size is given in megabytes and converted to bytes; an
    /// iteration request of zero or less is coerced to a single
    /// iteration.
    pub fn new(target_volume: &str, file_size_mb: u64, iterations: i64) -> Self {
        Self {
            target_volume: target_volume.to_string(),
            file_size: file_size_mb * 1024 * 1024,
            iterations: iterations.clamp(1, u32::MAX as i64) as u32,
        }
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.file_size == 0 {
            return Err(SpeedTestError::Config(
                "file size must be greater than 0".to_string(),
            ));
        }

        if self.file_size > MAX_FILE_SIZE {
            return Err(SpeedTestError::Config(format!(
                "file size too large: {} bytes (max: {} bytes)",
                self.file_size, MAX_FILE_SIZE
            )));
        }

        Ok(())
    }
}

/// Persisted user defaults for the command-line parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Default test file size in megabytes
    pub file_size_mb: u64,
    /// Default number of iterations
    pub iterations: i64,
    /// Default volume identifier
    pub drive: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            file_size_mb: 128,
            iterations: 1,
            drive: default_drive(),
        }
    }
}

impl Settings {
    /// Load settings from the standard config file location.
    /// Returns the defaults if the file doesn't exist.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file_path()?;

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(|e| {
            SpeedTestError::Config(format!(
                "failed to read config file {}: {}",
                config_path.display(),
                e
            ))
        })?;

        let settings: Self = toml::from_str(&content).map_err(|e| {
            SpeedTestError::Config(format!(
                "failed to parse config file {}: {}",
                config_path.display(),
                e
            ))
        })?;

        Ok(settings)
    }

    /// Save settings to the standard config file location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_file_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SpeedTestError::Config(format!(
                    "failed to create config directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let content = toml::to_string_pretty(self)?;

        fs::write(&config_path, content).map_err(|e| {
            SpeedTestError::Config(format!(
                "failed to write config file {}: {}",
                config_path.display(),
                e
            ))
        })?;

        Ok(())
    }

    /// Get the standard configuration file path
    /// Uses $CONFIG_HOME/drivespeed/drivespeed.toml
    pub fn config_file_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            SpeedTestError::Config("unable to determine config directory".to_string())
        })?;

        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }
}

/// Platform default volume identifier: the system drive on Windows,
/// the root mount elsewhere.
pub fn default_drive() -> String {
    if cfg!(windows) {
        "c".to_string()
    } else {
        "/".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_conversion_to_bytes() {
        let config = RunConfig::new("c", 128, 1);
        assert_eq!(config.file_size, 128 * 1024 * 1024);
        assert_eq!(config.iterations, 1);
        assert_eq!(config.target_volume, "c");
    }

    #[test]
    fn test_iterations_coerced_to_at_least_one() {
        assert_eq!(RunConfig::new("c", 1, 0).iterations, 1);
        assert_eq!(RunConfig::new("c", 1, -5).iterations, 1);
        assert_eq!(RunConfig::new("c", 1, 3).iterations, 3);
    }

    #[test]
    fn test_validate_rejects_zero_size() {
        let config = RunConfig::new("c", 0, 1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_oversized_request() {
        let config = RunConfig::new("c", 200 * 1024, 1); // 200 GiB
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_reasonable_request() {
        let config = RunConfig::new("c", 128, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_settings_toml_round_trip() {
        let settings = Settings {
            file_size_mb: 256,
            iterations: 5,
            drive: "d".to_string(),
        };

        let toml_str = toml::to_string(&settings).expect("failed to serialize to TOML");
        let restored: Settings = toml::from_str(&toml_str).expect("failed to parse TOML");

        assert_eq!(restored.file_size_mb, 256);
        assert_eq!(restored.iterations, 5);
        assert_eq!(restored.drive, "d");
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.file_size_mb, 128);
        assert_eq!(settings.iterations, 1);
        assert_eq!(settings.drive, default_drive());
    }

    #[test]
    fn test_config_file_path() {
        let path = Settings::config_file_path().unwrap();
        assert!(path.to_string_lossy().contains("drivespeed"));
        assert!(path.to_string_lossy().ends_with("drivespeed.toml"));
    }
}
