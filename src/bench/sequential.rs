//! Sequential speed test execution
//!
//! Implements the timed write/read/delete cycle against a resolved
//! target directory, streaming one result per iteration and aggregating
//! them into a run summary.

use crate::config::RunConfig;
use crate::models::{IterationResult, RunSummary};
use crate::{Result, SpeedTestError, TEST_FILE_NAME};
use rand::{rngs::SmallRng, RngCore, SeedableRng};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::PathBuf;
use std::time::Instant;
use tokio::sync::mpsc;

/// Sequential write/read speed tester
///
/// Owns the random payload for the whole run; the buffer is generated
/// once and reused read-only by every iteration.
pub struct SpeedTester {
    config: RunConfig,
    target_dir: PathBuf,
    payload: Vec<u8>,
}

impl SpeedTester {
    /// Create a speed tester for a resolved target directory.
    ///
    /// Validates the configuration and generates the payload; no file is
    /// touched until [`run`](Self::run).
    pub fn new(config: RunConfig, target_dir: PathBuf) -> Result<Self> {
        config.validate()?;

        if !target_dir.is_dir() {
            return Err(SpeedTestError::Config(format!(
                "test directory does not exist: {}",
                target_dir.display()
            )));
        }

        let mut rng = SmallRng::from_entropy();
        let mut payload = vec![0u8; config.file_size as usize];
        rng.fill_bytes(&mut payload);

        Ok(Self {
            config,
            target_dir,
            payload,
        })
    }

    /// The configuration this tester was built with
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Execute the full benchmark run.
    ///
    /// Iterations are strictly serialized; each completed iteration is
    /// sent over `progress_tx` before the next one starts. A dropped
    /// receiver aborts the run. Any I/O failure aborts the remaining
    /// iterations, so a partial run never produces a summary.
    pub async fn run(&self, progress_tx: mpsc::Sender<IterationResult>) -> Result<RunSummary> {
        let overall_start = Instant::now();
        let mut results = Vec::with_capacity(self.config.iterations as usize);

        for index in 1..=self.config.iterations {
            let result = self.run_iteration(index)?;
            if progress_tx.send(result.clone()).await.is_err() {
                return Err(SpeedTestError::Benchmark(
                    "progress receiver dropped, run cancelled".to_string(),
                ));
            }
            results.push(result);
        }

        let total_elapsed = overall_start.elapsed();
        Ok(RunSummary::new(
            self.config.target_volume.clone(),
            self.config.file_size,
            results,
            total_elapsed,
        ))
    }

    /// One write/read/delete measurement cycle.
    fn run_iteration(&self, index: u32) -> Result<IterationResult> {
        let path = self.target_dir.join(TEST_FILE_NAME);
        let iteration_start = Instant::now();

        let mut file = File::create(&path)?;
        let write_start = Instant::now();
        // Whole-payload chunks; the final chunk may overshoot the target
        let mut offset = 0u64;
        while offset < self.config.file_size {
            file.write_all(&self.payload)?;
            offset += self.payload.len() as u64;
        }
        let write_elapsed = write_start.elapsed();
        // Close before reopening so the read starts from a fresh handle
        drop(file);

        let mut file = File::open(&path)?;
        let read_start = Instant::now();
        let mut contents = Vec::with_capacity(self.payload.len());
        file.read_to_end(&mut contents)?;
        let read_elapsed = read_start.elapsed();
        drop(file);

        // A stale test file would corrupt every later measurement
        fs::remove_file(&path)?;

        Ok(IterationResult::from_timings(
            index,
            self.config.file_size,
            write_elapsed,
            read_elapsed,
            iteration_start.elapsed(),
        ))
    }
}
