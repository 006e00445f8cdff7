/// Native WAV codec using hound
use dbnorm_core::{
    AudioFormat, CodecAdapter, DecodeError, DecodedSignal, EncodeError, SampleKind, SampleSpec,
};
use dbnorm_loudness::{apply_gain, measure_dbfs};
use std::path::Path;
use tracing::{debug, warn};

/// WAV decoder/encoder that needs no external tool
///
/// Encoding keeps the source sample spec: a 24-bit integer file comes back
/// out as 24-bit integer.
#[derive(Debug, Clone, Copy, Default)]
pub struct HoundWavCodec;

impl HoundWavCodec {
    /// Create a new WAV codec
    pub fn new() -> Self {
        Self
    }

    /// Decode a WAV file into interleaved f32 samples
    pub fn decode_file(&self, path: &Path) -> Result<DecodedSignal, DecodeError> {
        let reader = hound::WavReader::open(path).map_err(decode_error)?;
        let spec = reader.spec();

        let samples: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .into_samples::<f32>()
                .map(|s| s.map(|v| v.clamp(-1.0, 1.0)))
                .collect::<Result<_, _>>()
                .map_err(decode_error)?,
            hound::SampleFormat::Int => {
                // Symmetric scaling: divide by 2^(bits-1)
                let max_val = int_full_scale(spec.bits_per_sample);
                reader
                    .into_samples::<i32>()
                    .map(|s| s.map(|v| (f64::from(v) / max_val) as f32))
                    .collect::<Result<_, _>>()
                    .map_err(decode_error)?
            }
        };

        let measured_dbfs = measure_dbfs(&samples);
        debug!(
            "Decoded {:?}: {} Hz, {} ch, {} bit, {:.2} dBFS",
            path, spec.sample_rate, spec.channels, spec.bits_per_sample, measured_dbfs
        );

        Ok(DecodedSignal {
            samples,
            spec: SampleSpec {
                sample_rate: spec.sample_rate,
                channels: spec.channels,
                bits_per_sample: spec.bits_per_sample,
                kind: match spec.sample_format {
                    hound::SampleFormat::Float => SampleKind::Float,
                    hound::SampleFormat::Int => SampleKind::Int,
                },
            },
            format: AudioFormat::Wav,
            measured_dbfs,
        })
    }

    /// Apply gain and write the signal as WAV
    pub fn encode_file(
        &self,
        mut signal: DecodedSignal,
        gain_db: f64,
        dest: &Path,
    ) -> Result<(), EncodeError> {
        let report = apply_gain(&mut signal.samples, gain_db)?;
        if report.clipped() {
            warn!(
                "{} samples clipped applying {:+.2} dB to {:?}",
                report.clipped_samples, gain_db, dest
            );
        }

        let result = write_wav(&signal, dest);
        if result.is_err() {
            // Never leave a truncated output behind
            let _ = std::fs::remove_file(dest);
        }
        result
    }
}

impl CodecAdapter for HoundWavCodec {
    fn decode(&self, path: &Path, format: AudioFormat) -> Result<DecodedSignal, DecodeError> {
        if format != AudioFormat::Wav {
            return Err(DecodeError::UnsupportedCodec {
                format,
                reason: "native codec only handles wav".to_string(),
            });
        }
        self.decode_file(path)
    }

    fn encode(
        &self,
        signal: DecodedSignal,
        gain_db: f64,
        format: AudioFormat,
        dest: &Path,
    ) -> Result<(), EncodeError> {
        if format != AudioFormat::Wav {
            return Err(EncodeError::UnsupportedCodec {
                format,
                reason: "native codec only handles wav".to_string(),
            });
        }
        self.encode_file(signal, gain_db, dest)
    }
}

fn write_wav(signal: &DecodedSignal, dest: &Path) -> Result<(), EncodeError> {
    let spec = hound::WavSpec {
        channels: signal.spec.channels,
        sample_rate: signal.spec.sample_rate,
        bits_per_sample: signal.spec.bits_per_sample,
        sample_format: match signal.spec.kind {
            SampleKind::Float => hound::SampleFormat::Float,
            SampleKind::Int => hound::SampleFormat::Int,
        },
    };

    let mut writer = hound::WavWriter::create(dest, spec).map_err(encode_error)?;

    match signal.spec.kind {
        SampleKind::Float => {
            for &sample in &signal.samples {
                writer.write_sample(sample).map_err(encode_error)?;
            }
        }
        SampleKind::Int => {
            let max_val = int_full_scale(signal.spec.bits_per_sample);
            for &sample in &signal.samples {
                let value = (f64::from(sample) * max_val)
                    .round()
                    .clamp(-max_val, max_val - 1.0);
                writer.write_sample(value as i32).map_err(encode_error)?;
            }
        }
    }

    writer.finalize().map_err(encode_error)?;
    debug!(
        "Wrote {} frames ({:.2} s) to {:?}",
        signal.frames(),
        signal.duration_secs(),
        dest
    );
    Ok(())
}

fn int_full_scale(bits_per_sample: u16) -> f64 {
    (1_i64 << (bits_per_sample.clamp(1, 32) - 1)) as f64
}

fn decode_error(err: hound::Error) -> DecodeError {
    match err {
        hound::Error::IoError(e) => DecodeError::Io(e),
        other => DecodeError::corrupt(other.to_string()),
    }
}

fn encode_error(err: hound::Error) -> EncodeError {
    match err {
        hound::Error::IoError(e) => EncodeError::Io(e),
        other => EncodeError::failed(other.to_string()),
    }
}
