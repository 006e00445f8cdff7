//! Level measurement and gain application
//!
//! The level of a signal is its average power relative to full scale:
//! `20 * log10(rms)` over every interleaved sample. This is not
//! a perceptual measure (no K-weighting, no gating).

use crate::error::{LoudnessError, Result};
use tracing::debug;

/// Outcome of applying gain to a buffer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainReport {
    /// Gain applied in dB
    pub gain_db: f64,
    /// Linear multiplier applied to every sample
    pub linear: f64,
    /// Samples that hit full scale and were saturated
    pub clipped_samples: usize,
}

impl GainReport {
    /// Whether any sample was saturated
    pub fn clipped(&self) -> bool {
        self.clipped_samples > 0
    }
}

/// Convert decibels to a linear amplitude factor
pub fn db_to_linear(db: f64) -> f64 {
    10.0_f64.powf(db / 20.0)
}

/// Convert a linear amplitude factor to decibels (`-inf` for 0)
pub fn linear_to_db(linear: f64) -> f64 {
    if linear > 0.0 {
        20.0 * linear.log10()
    } else {
        f64::NEG_INFINITY
    }
}

/// Root mean square of the samples, accumulated in f64
pub fn rms(samples: &[f32]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = samples
        .iter()
        .map(|&s| {
            let s = f64::from(s);
            s * s
        })
        .sum();
    (sum_sq / samples.len() as f64).sqrt()
}

/// Level of the samples in dBFS
///
/// Empty input and digital silence both measure `-inf`.
pub fn measure_dbfs(samples: &[f32]) -> f64 {
    linear_to_db(rms(samples))
}

/// Gain needed to move `measured_dbfs` to `target_dbfs`
///
/// Total: silence (`-inf`) yields `+inf`, which [`apply_gain`] rejects.
pub fn compute_gain(measured_dbfs: f64, target_dbfs: f64) -> f64 {
    target_dbfs - measured_dbfs
}

/// Scale every sample by `gain_db`, saturating at full scale
///
/// # Errors
/// Returns [`LoudnessError::InvalidGain`] if the gain is not finite. The
/// buffer is left untouched in that case.
pub fn apply_gain(samples: &mut [f32], gain_db: f64) -> Result<GainReport> {
    if !gain_db.is_finite() {
        return Err(LoudnessError::InvalidGain(gain_db));
    }

    let linear = db_to_linear(gain_db);
    let mut clipped_samples = 0;

    for sample in samples.iter_mut() {
        let scaled = f64::from(*sample) * linear;
        if scaled > 1.0 {
            *sample = 1.0;
            clipped_samples += 1;
        } else if scaled < -1.0 {
            *sample = -1.0;
            clipped_samples += 1;
        } else {
            *sample = scaled as f32;
        }
    }

    debug!(
        "Applied {:+.2} dB (x{:.4}), {} samples clipped",
        gain_db, linear, clipped_samples
    );

    Ok(GainReport {
        gain_db,
        linear,
        clipped_samples,
    })
}
