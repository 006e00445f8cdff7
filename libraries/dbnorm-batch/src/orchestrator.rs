//! Batch orchestrator
//!
//! Runs every input through `validate → read tags → decode → gain → encode →
//! write tags`, isolating per-file failures so one bad file never stops the
//! batch. Only an unusable output directory aborts a run.

use crate::config::NormalizerConfig;
use crate::filter::{self, absolute, ValidatedPath};
use crate::progress::{BatchProgress, CancellationToken};
use crate::result::{BatchResult, FileOutcome, FileStatus};
use dbnorm_codec::DefaultCodec;
use dbnorm_core::{CodecAdapter, FatalError, FileError, TagStore, ValidationError};
use dbnorm_loudness::compute_gain;
use dbnorm_metadata::LoftyTagStore;
use rayon::prelude::*;
use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::Sender;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// One input after validation; the path is kept for reporting either way
type Entry = (PathBuf, Result<ValidatedPath, ValidationError>);

/// Normalizes a list of files into one output directory
pub struct BatchNormalizer<C: CodecAdapter, T: TagStore> {
    codec: C,
    tags: T,
    config: NormalizerConfig,
    progress_tx: Option<Sender<BatchProgress>>,
    cancel: CancellationToken,
}

/// State of one run, shared by all workers
struct RunState {
    total: usize,
    output_dir: PathBuf,
    target_dbfs: f64,
    processed: AtomicUsize,
    skipped: AtomicUsize,
    cancelled: AtomicUsize,
    codec_warned: AtomicBool,
}

impl BatchNormalizer<DefaultCodec, LoftyTagStore> {
    /// Create a normalizer using hound/ffmpeg and lofty
    pub fn from_config(config: NormalizerConfig) -> Self {
        let codec = DefaultCodec::new(config.ffmpeg_path.clone(), config.ffprobe_path.clone());
        Self::new(codec, LoftyTagStore::new(), config)
    }
}

impl<C: CodecAdapter, T: TagStore> BatchNormalizer<C, T> {
    /// Create a normalizer with an explicit codec and tag store
    pub fn new(codec: C, tags: T, config: NormalizerConfig) -> Self {
        Self {
            codec,
            tags,
            config,
            progress_tx: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Send progress updates to `tx`
    #[must_use]
    pub fn with_progress(mut self, tx: Sender<BatchProgress>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    /// Use an existing cancellation token
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Token that cancels this normalizer's runs
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Active configuration
    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Normalize `paths` into the configured output directory
    ///
    /// Per-file failures are logged and recorded as skipped.
    ///
    /// # Errors
    /// [`FatalError::OutputDirUnavailable`] if the output directory cannot be
    /// created; no file is touched in that case.
    pub fn run<P: AsRef<Path>>(&self, paths: &[P]) -> Result<BatchResult, FatalError> {
        let start = Instant::now();
        let output_dir = absolute(&self.config.output_dir);

        if let Err(source) = std::fs::create_dir_all(&output_dir) {
            error!(
                "Could not create output directory \"{}\": {}",
                output_dir.display(),
                source
            );
            return Err(FatalError::OutputDirUnavailable {
                path: output_dir,
                source,
            });
        }

        let total = paths.len();
        self.send(BatchProgress::Started { total });

        let entries = validate_all(paths);
        let state = RunState {
            total,
            output_dir,
            target_dbfs: self.config.target_dbfs,
            processed: AtomicUsize::new(0),
            skipped: AtomicUsize::new(0),
            cancelled: AtomicUsize::new(0),
            codec_warned: AtomicBool::new(false),
        };

        let workers = self.config.effective_workers().min(total).max(1);
        let outcomes = if workers == 1 {
            self.process_sequential(&entries, &state)
        } else {
            match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
                Ok(pool) => {
                    debug!("Processing {} files on {} workers", total, workers);
                    pool.install(|| {
                        entries
                            .par_iter()
                            .enumerate()
                            .map(|(index, entry)| self.process_entry(index, entry, &state))
                            .collect::<Vec<_>>()
                    })
                }
                Err(e) => {
                    warn!("Could not start worker pool ({}), processing sequentially", e);
                    self.process_sequential(&entries, &state)
                }
            }
        };

        let result = BatchResult {
            total,
            processed: state.processed.into_inner(),
            skipped: state.skipped.into_inner(),
            cancelled: state.cancelled.into_inner(),
            elapsed: start.elapsed(),
            outcomes,
        };

        info!(
            "Normalized {} of {} files ({} skipped, {} cancelled)",
            result.processed, result.total, result.skipped, result.cancelled
        );
        info!("Execution time: {:.3} seconds", result.elapsed.as_secs_f64());

        self.send(BatchProgress::Completed {
            result: result.clone(),
        });

        Ok(result)
    }

    fn process_sequential(&self, entries: &[Entry], state: &RunState) -> Vec<FileOutcome> {
        entries
            .iter()
            .enumerate()
            .map(|(index, entry)| self.process_entry(index, entry, state))
            .collect()
    }

    /// Run one input through the pipeline unless the batch was cancelled
    fn process_entry(&self, index: usize, entry: &Entry, state: &RunState) -> FileOutcome {
        let (path, validated) = entry;
        let total = state.total;

        let status = if self.cancel.is_cancelled() {
            state.cancelled.fetch_add(1, Ordering::SeqCst);
            FileStatus::Cancelled
        } else {
            self.send(BatchProgress::FileStarted {
                index,
                total,
                path: path.clone(),
            });
            info!(
                "({} of {}) Processing file: \"{}\"",
                index + 1,
                total,
                path.display()
            );

            match validated {
                Ok(validated) => self.process_one(validated, state),
                Err(e) => {
                    error!("{}. Skipping...", e);
                    state.skipped.fetch_add(1, Ordering::SeqCst);
                    FileStatus::Skipped {
                        reason: e.to_string(),
                        codec_unavailable: false,
                    }
                }
            }
        };

        self.send(BatchProgress::FileFinished {
            index,
            path: path.clone(),
            status: status.clone(),
        });

        FileOutcome {
            input: path.clone(),
            status,
        }
    }

    fn process_one(&self, validated: &ValidatedPath, state: &RunState) -> FileStatus {
        match self.normalize_file(validated, state) {
            Ok((output, gain_db)) => {
                state.processed.fetch_add(1, Ordering::SeqCst);
                FileStatus::Normalized { output, gain_db }
            }
            Err(e) => {
                let codec_unavailable = e.is_unsupported_codec();
                if codec_unavailable {
                    if state.codec_warned.swap(true, Ordering::SeqCst) {
                        debug!("Skipping \"{}\": {}", validated.path().display(), e);
                    } else {
                        warn!("Could not locate FFmpeg, skipping non-wav files");
                        debug!("{}", e);
                    }
                } else {
                    error!(
                        "Failed to normalize \"{}\": {}. Skipping...",
                        validated.path().display(),
                        e
                    );
                }

                state.skipped.fetch_add(1, Ordering::SeqCst);
                FileStatus::Skipped {
                    reason: e.to_string(),
                    codec_unavailable,
                }
            }
        }
    }

    fn normalize_file(
        &self,
        validated: &ValidatedPath,
        state: &RunState,
    ) -> Result<(PathBuf, f64), FileError> {
        let source = validated.path();
        let format = validated.format();

        let tags = self.tags.read_tags(source)?;
        let signal = self.codec.decode(source, format)?;

        let gain_db = compute_gain(signal.measured_dbfs, state.target_dbfs);
        debug!(
            "\"{}\": {} frames ({:.2} s), measured {:.2} dBFS, gain {:+.2} dB",
            source.display(),
            signal.frames(),
            signal.duration_secs(),
            signal.measured_dbfs,
            gain_db
        );

        let dest = state.output_dir.join(validated.file_name());
        self.codec.encode(signal, gain_db, format, &dest)?;

        if let Err(e) = self.tags.write_tags(&dest, tags) {
            // Only fully processed files stay in the output directory
            let _ = std::fs::remove_file(&dest);
            return Err(e.into());
        }

        Ok((dest, gain_db))
    }

    fn send(&self, event: BatchProgress) {
        if let Some(ref tx) = self.progress_tx {
            let _ = tx.send(event);
        }
    }
}

/// Validate every input in caller order, rejecting repeated output names
fn validate_all<P: AsRef<Path>>(paths: &[P]) -> Vec<Entry> {
    let mut claimed: HashSet<OsString> = HashSet::new();

    paths
        .iter()
        .map(|p| {
            let path = absolute(p.as_ref());
            let entry = filter::validate(&path).and_then(|validated| {
                let name = validated.file_name().to_os_string();
                if claimed.insert(name.clone()) {
                    Ok(validated)
                } else {
                    Err(ValidationError::DuplicateOutput {
                        path: path.clone(),
                        file_name: name.to_string_lossy().into_owned(),
                    })
                }
            });
            (path, entry)
        })
        .collect()
}
