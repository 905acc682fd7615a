//! drivespeed - storage volume speed tester
//!
//! Measures sequential write and read throughput of a mounted storage
//! volume by writing a random payload to a temporary file, timing the
//! write and a full read back, then deleting the file.

use std::fmt;

// Public re-exports
pub mod bench;
pub mod config;
pub mod models;
pub mod util;
pub mod volume;

// Common error types
#[derive(Debug)]
pub enum SpeedTestError {
    /// I/O operation failed during the benchmark
    Storage(std::io::Error),
    /// Requested volume is absent from the mount table
    VolumeNotMounted {
        /// Normalized identifier the user asked for
        requested: String,
        /// Normalized identifiers of everything that is mounted
        mounted: Vec<String>,
    },
    /// Configuration validation or parsing error
    Config(String),
    /// Benchmark execution error
    Benchmark(String),
}

impl fmt::Display for SpeedTestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpeedTestError::Storage(err) => write!(f, "storage I/O error: {}", err),
            SpeedTestError::VolumeNotMounted { requested, mounted } => write!(
                f,
                "the volume `{}` is not mounted (mounted volumes: {:?})",
                requested, mounted
            ),
            SpeedTestError::Config(msg) => write!(f, "configuration error: {}", msg),
            SpeedTestError::Benchmark(msg) => write!(f, "benchmark error: {}", msg),
        }
    }
}

impl std::error::Error for SpeedTestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SpeedTestError::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SpeedTestError {
    fn from(err: std::io::Error) -> Self {
        SpeedTestError::Storage(err)
    }
}

impl From<toml::de::Error> for SpeedTestError {
    fn from(err: toml::de::Error) -> Self {
        SpeedTestError::Config(format!("TOML parsing error: {}", err))
    }
}

impl From<toml::ser::Error> for SpeedTestError {
    fn from(err: toml::ser::Error) -> Self {
        SpeedTestError::Config(format!("TOML serialization error: {}", err))
    }
}

impl From<serde_json::Error> for SpeedTestError {
    fn from(err: serde_json::Error) -> Self {
        SpeedTestError::Config(format!("JSON serialization error: {}", err))
    }
}

/// Result type alias for drivespeed operations
pub type Result<T> = std::result::Result<T, SpeedTestError>;

/// Error handling utilities
pub mod error {
    use super::SpeedTestError;

    /// Process exit status for a failed run.
    ///
    /// A missing volume is a precondition failure the operator must fix
    /// (exit 1); everything else is a mid-run failure (exit 2). None of
    /// these are retryable: any I/O anomaly invalidates the measurement.
    pub fn exit_code(error: &SpeedTestError) -> i32 {
        match error {
            SpeedTestError::VolumeNotMounted { .. } => 1,
            _ => 2,
        }
    }
}

// Common types and constants
pub const APP_NAME: &str = "drivespeed";
pub const CONFIG_FILE: &str = "drivespeed.toml";
pub const TEST_FILE_NAME: &str = "drivespeed_test.bin";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_code_distinguishes_missing_volume() {
        let err = SpeedTestError::VolumeNotMounted {
            requested: "z".to_string(),
            mounted: vec!["c".to_string()],
        };
        assert_eq!(error::exit_code(&err), 1);

        let err = SpeedTestError::Storage(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        assert_eq!(error::exit_code(&err), 2);

        let err = SpeedTestError::Config("bad size".to_string());
        assert_eq!(error::exit_code(&err), 2);
    }

    #[test]
    fn volume_not_mounted_display_lists_mounts() {
        let err = SpeedTestError::VolumeNotMounted {
            requested: "z".to_string(),
            mounted: vec!["c".to_string(), "d".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("`z`"));
        assert!(msg.contains("\"c\""));
        assert!(msg.contains("\"d\""));
    }
}
