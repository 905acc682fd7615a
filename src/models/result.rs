//! Benchmark result data models
//!
//! Contains structures for per-iteration measurements and the aggregated
//! run summary, with JSON serialization support.

use crate::util::units::calculate_throughput_mbps;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Measurements from one write/read/delete cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IterationResult {
    /// 1-based iteration number, matching the printed report
    pub index: u32,
    /// Write throughput in MB/s (binary-divided, see `calculate_throughput_mbps`)
    pub write_mbps: f64,
    /// Read throughput in MB/s
    pub read_mbps: f64,
    /// Wall-clock span of the whole cycle, open through delete
    #[serde(with = "duration_serde")]
    pub elapsed: Duration,
}

impl IterationResult {
    /// Build a result from the raw timing windows of one iteration.
    pub fn from_timings(
        index: u32,
        target_bytes: u64,
        write_elapsed: Duration,
        read_elapsed: Duration,
        elapsed: Duration,
    ) -> Self {
        Self {
            index,
            write_mbps: calculate_throughput_mbps(target_bytes, write_elapsed),
            read_mbps: calculate_throughput_mbps(target_bytes, read_elapsed),
            elapsed,
        }
    }
}

/// Aggregated outcome of a complete benchmark run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Timestamp when the run completed
    pub timestamp: DateTime<Utc>,
    /// Normalized identifier of the tested volume
    pub volume: String,
    /// Target payload size in bytes
    pub file_size: u64,
    /// Per-iteration measurements in execution order
    pub iterations: Vec<IterationResult>,
    /// Arithmetic mean of the per-iteration write speeds
    pub average_write_mbps: f64,
    /// Arithmetic mean of the per-iteration read speeds
    pub average_read_mbps: f64,
    /// Wall-clock time for the whole run
    #[serde(with = "duration_serde")]
    pub total_elapsed: Duration,
}

impl RunSummary {
    /// Aggregate completed iterations into a summary.
    ///
    /// Averages are the exact arithmetic means of the individual
    /// measurements. Callers never pass an empty iteration list; the
    /// request normalization guarantees at least one iteration.
    pub fn new(
        volume: String,
        file_size: u64,
        iterations: Vec<IterationResult>,
        total_elapsed: Duration,
    ) -> Self {
        let count = iterations.len().max(1) as f64;
        let average_write_mbps = iterations.iter().map(|r| r.write_mbps).sum::<f64>() / count;
        let average_read_mbps = iterations.iter().map(|r| r.read_mbps).sum::<f64>() / count;

        Self {
            timestamp: Utc::now(),
            volume,
            file_size,
            iterations,
            average_write_mbps,
            average_read_mbps,
            total_elapsed,
        }
    }
}

// Duration serialized as integer nanoseconds
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_nanos().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let nanos = u128::deserialize(deserializer)?;
        Ok(Duration::from_nanos(nanos as u64))
    }
}
