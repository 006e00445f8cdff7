/// Error taxonomy for the normalization pipeline
///
/// Every per-file stage has its own error type. The orchestrator folds them
/// into [`FileError`] and keeps going; only [`FatalError`] ends a run.
use crate::types::AudioFormat;
use std::path::PathBuf;
use thiserror::Error;

/// File Filter errors
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Path does not refer to an existing regular file
    #[error("File cannot be found: {}", .0.display())]
    NotFound(PathBuf),

    /// Extension is not in the supported format set
    #[error("File format is not supported: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// Another input in the same run already claimed this output name
    #[error("Output name {file_name} already used in this batch: {}", .path.display())]
    DuplicateOutput {
        /// Rejected input path
        path: PathBuf,
        /// Base filename shared with an earlier input
        file_name: String,
    },
}

/// Tag read/write errors
#[derive(Error, Debug)]
pub enum MetadataError {
    /// Tags could not be parsed from the source file
    #[error("Tag reading error: {0}")]
    Read(String),

    /// Tags could not be written to the destination file
    #[error("Tag writing error: {0}")]
    Write(String),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Decoding errors
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The engine needed for this format is not available
    #[error("No decoder available for {format}: {reason}")]
    UnsupportedCodec {
        /// Format that could not be decoded
        format: AudioFormat,
        /// Why the engine is unavailable
        reason: String,
    },

    /// File content could not be decoded
    #[error("Decode error: {0}")]
    Corrupt(String),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DecodeError {
    /// Create a corrupt-data error
    pub fn corrupt(msg: impl Into<String>) -> Self {
        Self::Corrupt(msg.into())
    }
}

/// Encoding errors
#[derive(Error, Debug)]
pub enum EncodeError {
    /// Gain is NaN or infinite (e.g. the source was digital silence)
    #[error("Invalid gain: {0} dB")]
    InvalidGain(f64),

    /// The engine needed for this format is not available
    #[error("No encoder available for {format}: {reason}")]
    UnsupportedCodec {
        /// Format that could not be encoded
        format: AudioFormat,
        /// Why the engine is unavailable
        reason: String,
    },

    /// The encoder ran but reported a failure
    #[error("Encode error: {0}")]
    Failed(String),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl EncodeError {
    /// Create an encoder failure error
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::Failed(msg.into())
    }
}

/// Errors that abort the whole batch
#[derive(Error, Debug)]
pub enum FatalError {
    /// Output directory could not be created
    #[error("Output directory unavailable: {}: {source}", .path.display())]
    OutputDirUnavailable {
        /// Requested output directory
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },
}

/// Any per-file failure; the file is skipped and the batch continues
#[derive(Error, Debug)]
pub enum FileError {
    /// Validation failed
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Tag handling failed
    #[error(transparent)]
    Metadata(#[from] MetadataError),

    /// Decoding failed
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Encoding failed
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

impl FileError {
    /// True when the failure comes from a missing codec engine rather than a bad file
    pub fn is_unsupported_codec(&self) -> bool {
        matches!(
            self,
            Self::Decode(DecodeError::UnsupportedCodec { .. })
                | Self::Encode(EncodeError::UnsupportedCodec { .. })
        )
    }
}
