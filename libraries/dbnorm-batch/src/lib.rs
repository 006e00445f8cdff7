//! dbnorm batch processing
//!
//! Normalizes a list of audio files to a target level and writes the results
//! into an output directory under their original filenames, carrying tags
//! over from each source.
//!
//! # Pipeline
//!
//! ```text
//! paths ──▶ validate ──▶ read tags ──▶ decode ──▶ gain ──▶ encode ──▶ write tags
//!              │             │            │                   │            │
//!              └─────────────┴────────────┴──── skip file ────┴────────────┘
//! ```
//!
//! Failures in any stage skip that file and the batch continues. A missing
//! FFmpeg is reported once per run.
//!
//! # Example
//!
//! ```rust,no_run
//! use dbnorm_batch::{BatchNormalizer, NormalizerConfig};
//!
//! let config = NormalizerConfig {
//!     target_dbfs: -16.0,
//!     ..Default::default()
//! };
//! let result = BatchNormalizer::from_config(config)
//!     .run(&["a.wav", "b.mp3"])
//!     .expect("output directory");
//! println!("{} normalized, {} skipped", result.processed, result.skipped);
//! ```

#![forbid(unsafe_code)]

pub mod config;
pub mod filter;
pub mod orchestrator;
pub mod progress;
pub mod result;

pub use config::{ConfigError, NormalizerConfig};
pub use filter::{collect_supported, is_supported, validate, ValidatedPath};
pub use orchestrator::BatchNormalizer;
pub use progress::{BatchProgress, CancellationToken};
pub use result::{BatchResult, FileOutcome, FileStatus};

use dbnorm_core::FatalError;
use std::path::Path;

/// Normalize `paths` to `target_dbfs` into `output_dir` with the default
/// codec and tag store
///
/// Runs sequentially in input order. Per-file failures are recorded in the
/// returned [`BatchResult`].
///
/// # Errors
/// [`FatalError::OutputDirUnavailable`] if `output_dir` cannot be created.
pub fn process_files<P, D>(
    paths: &[P],
    target_dbfs: f64,
    output_dir: D,
) -> Result<BatchResult, FatalError>
where
    P: AsRef<Path>,
    D: AsRef<Path>,
{
    let config = NormalizerConfig {
        target_dbfs,
        output_dir: output_dir.as_ref().to_path_buf(),
        ..Default::default()
    };
    BatchNormalizer::from_config(config).run(paths)
}
