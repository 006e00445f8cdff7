use crate::MP3_BITRATE_KBPS;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Audio container formats accepted by the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    /// Uncompressed RIFF/WAVE
    Wav,
    /// Free Lossless Audio Codec
    Flac,
    /// MPEG-1 Layer III
    Mp3,
    /// Ogg container (Vorbis)
    Ogg,
    /// WebM container (Opus)
    Webm,
    /// MPEG-4 container (AAC)
    Mp4,
}

impl AudioFormat {
    /// Every supported format, in extension-table order
    pub const ALL: [AudioFormat; 6] = [
        AudioFormat::Wav,
        AudioFormat::Flac,
        AudioFormat::Mp3,
        AudioFormat::Ogg,
        AudioFormat::Webm,
        AudioFormat::Mp4,
    ];

    /// File extension without the leading dot
    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Wav => "wav",
            AudioFormat::Flac => "flac",
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Ogg => "ogg",
            AudioFormat::Webm => "webm",
            AudioFormat::Mp4 => "mp4",
        }
    }

    /// Parse an extension. Matching is case-sensitive: `"WAV"` is not a format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.extension() == ext)
    }

    /// Capability lookup used for decode/encode dispatch
    pub fn capabilities(&self) -> FormatCapabilities {
        match self {
            AudioFormat::Wav => FormatCapabilities {
                native_codec: true,
                encode: EncodeParams::default(),
            },
            AudioFormat::Mp3 => FormatCapabilities {
                native_codec: false,
                encode: EncodeParams {
                    bitrate_kbps: Some(MP3_BITRATE_KBPS),
                },
            },
            AudioFormat::Flac | AudioFormat::Ogg | AudioFormat::Webm | AudioFormat::Mp4 => {
                FormatCapabilities {
                    native_codec: false,
                    encode: EncodeParams::default(),
                }
            }
        }
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// What the pipeline can do with a format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatCapabilities {
    /// Decodable and encodable in-process, without an external tool
    pub native_codec: bool,
    /// Encoder parameters to request
    pub encode: EncodeParams,
}

/// Format-specific encoder parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EncodeParams {
    /// Fixed bitrate in kb/s; `None` leaves the encoder default in place
    pub bitrate_kbps: Option<u32>,
}

/// The fixed set of extensions eligible for processing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportedFormatSet {
    formats: Vec<AudioFormat>,
}

impl SupportedFormatSet {
    /// Check whether an extension belongs to the set
    pub fn contains_extension(&self, ext: &str) -> bool {
        self.formats.iter().any(|f| f.extension() == ext)
    }

    /// Detect the format of a path from its extension
    pub fn format_of(&self, path: &Path) -> Option<AudioFormat> {
        let ext = path.extension()?.to_str()?;
        AudioFormat::from_extension(ext).filter(|f| self.formats.contains(f))
    }

    /// Formats in the set
    pub fn formats(&self) -> &[AudioFormat] {
        &self.formats
    }
}

impl Default for SupportedFormatSet {
    fn default() -> Self {
        Self {
            formats: AudioFormat::ALL.to_vec(),
        }
    }
}
