//! Error types for gain calculation

use thiserror::Error;

/// Result type for loudness operations
pub type Result<T> = std::result::Result<T, LoudnessError>;

/// Errors that can occur while applying gain
#[derive(Error, Debug, PartialEq)]
pub enum LoudnessError {
    /// Gain is NaN or infinite
    #[error("Invalid gain: {0} dB (must be finite)")]
    InvalidGain(f64),
}

impl From<LoudnessError> for dbnorm_core::EncodeError {
    fn from(err: LoudnessError) -> Self {
        match err {
            LoudnessError::InvalidGain(gain) => dbnorm_core::EncodeError::InvalidGain(gain),
        }
    }
}
