//! Level measurement and gain calculation for dbnorm
//!
//! This crate provides:
//! - dBFS measurement from average signal power (RMS)
//! - Gain calculation toward a target level
//! - Gain application with saturation at full scale
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────┐     ┌──────────────┐     ┌───────────────┐
//! │ DecodedSignal  │ ──► │ measure_dbfs │ ──► │ compute_gain  │
//! └────────────────┘     └──────────────┘     └───────────────┘
//!                                                    │
//!                                                    ▼
//!                                             ┌──────────────┐
//!                                             │  apply_gain  │
//!                                             └──────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use dbnorm_loudness::{apply_gain, compute_gain, measure_dbfs};
//!
//! let mut samples = vec![0.1_f32; 4410];
//! let measured = measure_dbfs(&samples);
//! let gain = compute_gain(measured, -13.5);
//! assert!((gain - 6.5).abs() < 1e-4);
//!
//! apply_gain(&mut samples, gain)?;
//! assert!((measure_dbfs(&samples) - -13.5).abs() < 1e-4);
//! # Ok::<(), dbnorm_loudness::LoudnessError>(())
//! ```

#![forbid(unsafe_code)]

mod error;
mod gain;

pub use error::{LoudnessError, Result};
pub use gain::{
    apply_gain, compute_gain, db_to_linear, linear_to_db, measure_dbfs, rms, GainReport,
};
