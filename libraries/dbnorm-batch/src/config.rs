//! Batch configuration

use dbnorm_core::{DEFAULT_OUTPUT_DIR, DEFAULT_TARGET_DBFS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Sources could not be read or deserialized
    #[error("Failed to load configuration: {0}")]
    Load(String),

    /// Values are out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Settings for one normalization run
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NormalizerConfig {
    /// Target level in dBFS
    #[serde(default = "default_target_dbfs")]
    pub target_dbfs: f64,

    /// Directory receiving normalized copies; relative paths resolve against
    /// the working directory
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Files processed concurrently; 0 means one per CPU
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// External encoder/decoder for non-WAV formats
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: PathBuf,

    /// Reports stream parameters before non-WAV formats are decoded
    #[serde(default = "default_ffprobe_path")]
    pub ffprobe_path: PathBuf,
}

impl NormalizerConfig {
    /// Config file picked up by [`NormalizerConfig::load`]
    pub const FILE_NAME: &'static str = "dbnorm.toml";

    /// Load configuration from `dbnorm.toml` (if present) and the environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new(Self::FILE_NAME))
    }

    /// Load configuration from a TOML file (if present) and the environment
    ///
    /// Environment variables are prefixed with `DBNORM_`, e.g.
    /// `DBNORM_TARGET_DBFS=-16`.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let mut settings = config::Config::builder();

        if path.exists() {
            settings = settings.add_source(config::File::from(path.to_path_buf()));
        }

        settings = settings.add_source(
            config::Environment::with_prefix("DBNORM")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| ConfigError::Load(e.to_string()))?;

        let loaded: Self = config
            .try_deserialize()
            .map_err(|e| ConfigError::Load(e.to_string()))?;

        loaded.validate()?;
        Ok(loaded)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.target_dbfs.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "target_dbfs must be finite, got {}",
                self.target_dbfs
            )));
        }

        if self.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("output_dir is empty".to_string()));
        }

        if self.ffmpeg_path.as_os_str().is_empty() || self.ffprobe_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "ffmpeg_path and ffprobe_path must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Worker count with `0` resolved to the number of CPUs
    pub fn effective_workers(&self) -> usize {
        if self.workers == 0 {
            num_cpus::get().max(1)
        } else {
            self.workers
        }
    }
}

// Default values
fn default_target_dbfs() -> f64 {
    DEFAULT_TARGET_DBFS
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

fn default_workers() -> usize {
    1
}

fn default_ffmpeg_path() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_ffprobe_path() -> PathBuf {
    PathBuf::from("ffprobe")
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            target_dbfs: default_target_dbfs(),
            output_dir: default_output_dir(),
            workers: default_workers(),
            ffmpeg_path: default_ffmpeg_path(),
            ffprobe_path: default_ffprobe_path(),
        }
    }
}
