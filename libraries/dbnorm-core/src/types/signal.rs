use crate::types::AudioFormat;

/// How samples were stored in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleKind {
    /// Signed integer PCM
    Int,
    /// IEEE float PCM
    Float,
}

/// Stream layout of a decoded signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleSpec {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of interleaved channels
    pub channels: u16,
    /// Bits per sample in the source container
    pub bits_per_sample: u16,
    /// Integer or float storage
    pub kind: SampleKind,
}

/// Decoded audio held in memory for one file
///
/// Samples are interleaved `f32` in `[-1.0, 1.0]`. Integer sources are scaled
/// symmetrically by `2^(bits - 1)`.
#[derive(Debug, Clone)]
pub struct DecodedSignal {
    /// Interleaved samples
    pub samples: Vec<f32>,
    /// Stream layout
    pub spec: SampleSpec,
    /// Format the signal was decoded from
    pub format: AudioFormat,
    /// Average power of the samples in dBFS (`-inf` for silence)
    pub measured_dbfs: f64,
}

impl DecodedSignal {
    /// Number of frames (samples per channel)
    pub fn frames(&self) -> usize {
        if self.spec.channels == 0 {
            0
        } else {
            self.samples.len() / self.spec.channels as usize
        }
    }

    /// Duration in seconds
    pub fn duration_secs(&self) -> f64 {
        if self.spec.sample_rate == 0 {
            0.0
        } else {
            self.frames() as f64 / self.spec.sample_rate as f64
        }
    }

    /// True when the signal is digital silence
    pub fn is_silent(&self) -> bool {
        self.measured_dbfs == f64::NEG_INFINITY
    }
}
