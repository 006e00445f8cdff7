/// Format dispatch between the native and external codecs
use crate::{FfmpegCodec, HoundWavCodec};
use dbnorm_core::{AudioFormat, CodecAdapter, DecodeError, DecodedSignal, EncodeError};
use std::path::{Path, PathBuf};

/// Codec used by default batches
///
/// Formats whose capabilities mark them native go through hound; all others
/// go through ffmpeg.
#[derive(Debug, Clone, Default)]
pub struct DefaultCodec {
    wav: HoundWavCodec,
    ffmpeg: FfmpegCodec,
}

impl DefaultCodec {
    /// Create a codec with explicit ffmpeg/ffprobe paths
    pub fn new(ffmpeg_path: impl Into<PathBuf>, ffprobe_path: impl Into<PathBuf>) -> Self {
        Self {
            wav: HoundWavCodec::new(),
            ffmpeg: FfmpegCodec::new(ffmpeg_path, ffprobe_path),
        }
    }

    /// The external codec backing non-native formats
    pub fn ffmpeg(&self) -> &FfmpegCodec {
        &self.ffmpeg
    }

    fn backend(&self, format: AudioFormat) -> &dyn CodecAdapter {
        if format.capabilities().native_codec {
            &self.wav
        } else {
            &self.ffmpeg
        }
    }
}

impl CodecAdapter for DefaultCodec {
    fn decode(&self, path: &Path, format: AudioFormat) -> Result<DecodedSignal, DecodeError> {
        self.backend(format).decode(path, format)
    }

    fn encode(
        &self,
        signal: DecodedSignal,
        gain_db: f64,
        format: AudioFormat,
        dest: &Path,
    ) -> Result<(), EncodeError> {
        self.backend(format).encode(signal, gain_db, format, dest)
    }
}
