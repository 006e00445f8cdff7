//! Property tests for level measurement and gain
//!
//! Tests include:
//! - Gain calculation is exact subtraction
//! - Applying the computed gain lands on the target when nothing clips
//! - Clipping never produces samples outside full scale

use dbnorm_loudness::{apply_gain, compute_gain, db_to_linear, linear_to_db, measure_dbfs};
use proptest::prelude::*;

// ========== Helper Functions ==========

/// Generate an interleaved sine wave at the given peak amplitude
fn generate_sine(
    sample_rate: u32,
    channels: u32,
    frequency: f32,
    amplitude: f32,
    duration_secs: f32,
) -> Vec<f32> {
    let num_samples = (sample_rate as f32 * duration_secs) as usize;
    let mut samples = Vec::with_capacity(num_samples * channels as usize);

    for i in 0..num_samples {
        let t = i as f32 / sample_rate as f32;
        let sample = amplitude * (2.0 * std::f32::consts::PI * frequency * t).sin();
        for _ in 0..channels {
            samples.push(sample);
        }
    }

    samples
}

// ========== Property-Based Tests ==========

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn gain_is_exact_difference(
        measured in -90.0_f64..0.0,
        target in -40.0_f64..0.0,
    ) {
        prop_assert_eq!(compute_gain(measured, target), target - measured);
    }

    #[test]
    fn db_linear_round_trip(db in -80.0_f64..20.0) {
        let back = linear_to_db(db_to_linear(db));
        prop_assert!((back - db).abs() < 1e-9);
    }

    /// Without clipping, the gained signal measures at the target
    #[test]
    fn applied_gain_reaches_target(
        amplitude in 0.01_f32..0.5,
        target in -30.0_f64..-12.0,
    ) {
        let mut samples = generate_sine(8000, 2, 440.0, amplitude, 0.25);
        let gain = compute_gain(measure_dbfs(&samples), target);
        let report = apply_gain(&mut samples, gain).unwrap();

        prop_assert!(!report.clipped());
        let remeasured = measure_dbfs(&samples);
        prop_assert!(
            (remeasured - target).abs() < 0.01,
            "target {:.3}, remeasured {:.3}", target, remeasured
        );
    }

    #[test]
    fn output_stays_within_full_scale(
        amplitude in 0.1_f32..1.0,
        gain_db in 0.0_f64..40.0,
    ) {
        let mut samples = generate_sine(8000, 1, 1000.0, amplitude, 0.1);
        apply_gain(&mut samples, gain_db).unwrap();
        prop_assert!(samples.iter().all(|s| (-1.0..=1.0).contains(s)));
    }
}

// ========== Edge Cases ==========

#[test]
fn sine_level_matches_rms_formula() {
    // RMS of a sine is peak / sqrt(2): a 0.5 peak sits at about -9.03 dBFS
    let samples = generate_sine(44100, 2, 1000.0, 0.5, 1.0);
    let level = measure_dbfs(&samples);
    assert!((level - (-9.0309)).abs() < 0.01, "got {level:.4}");
}

#[test]
fn silence_produces_unusable_gain() {
    let mut silence = vec![0.0_f32; 8000];
    let gain = compute_gain(measure_dbfs(&silence), -13.5);
    assert!(gain.is_infinite());
    assert!(apply_gain(&mut silence, gain).is_err());
}

#[test]
fn scenario_gains() {
    // A -20 dBFS file and a -8 dBFS file normalized to -13.5
    assert_eq!(compute_gain(-20.0, -13.5), 6.5);
    assert_eq!(compute_gain(-8.0, -13.5), -5.5);
}
