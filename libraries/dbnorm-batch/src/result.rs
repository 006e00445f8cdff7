//! Batch outcome types

use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// What happened to one input file
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    /// Normalized copy written
    Normalized {
        /// Output file
        output: PathBuf,
        /// Gain applied in dB
        gain_db: f64,
    },

    /// Skipped because a pipeline stage failed
    Skipped {
        /// Human-readable failure
        reason: String,
        /// The failure was a missing codec engine, not a bad file
        codec_unavailable: bool,
    },

    /// Not attempted because the batch was cancelled
    Cancelled,
}

/// Per-file entry of a [`BatchResult`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileOutcome {
    /// Input path as resolved by the orchestrator
    pub input: PathBuf,
    /// Result for this file
    pub status: FileStatus,
}

/// Aggregate result of one run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchResult {
    /// Number of input paths
    pub total: usize,
    /// Files normalized successfully
    pub processed: usize,
    /// Files skipped after a failure
    pub skipped: usize,
    /// Files not attempted because of cancellation
    pub cancelled: usize,
    /// Wall-clock duration of the run
    pub elapsed: Duration,
    /// Per-file outcomes in input order
    pub outcomes: Vec<FileOutcome>,
}

impl BatchResult {
    /// True when every input was normalized
    pub fn is_complete_success(&self) -> bool {
        self.processed == self.total
    }

    /// Outcomes for skipped files
    pub fn skipped_files(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, FileStatus::Skipped { .. }))
    }
}
