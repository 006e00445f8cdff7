/// Core traits for dbnorm
use crate::error::{DecodeError, EncodeError, MetadataError};
use crate::types::{AudioFormat, DecodedSignal};
use std::path::Path;

/// Codec adapter
///
/// Implementers decode files into a [`DecodedSignal`] and write a gained
/// signal back out. Adapters are shared by every worker of a batch, so they
/// must be `Sync` and keep no per-file state.
pub trait CodecAdapter: Send + Sync {
    /// Decode an entire file into memory
    ///
    /// # Errors
    /// Returns [`DecodeError::UnsupportedCodec`] when the decoding engine for
    /// `format` cannot be located, so callers can tell an environment gap from
    /// a bad file.
    fn decode(&self, path: &Path, format: AudioFormat) -> Result<DecodedSignal, DecodeError>;

    /// Apply `gain_db` to the samples and write them to `dest` as `format`
    ///
    /// # Errors
    /// Returns [`EncodeError::InvalidGain`] for a non-finite gain before
    /// anything is written.
    fn encode(
        &self,
        signal: DecodedSignal,
        gain_db: f64,
        format: AudioFormat,
        dest: &Path,
    ) -> Result<(), EncodeError>;
}

/// Tag store
///
/// Reads a file's tag set before processing and reapplies it to the output.
/// The tag set is opaque to the pipeline and only passed through.
pub trait TagStore: Send + Sync {
    /// Tag set carried from source to output
    type Tags: Send;

    /// Read tags from `path`; `Ok(None)` when the file carries no tag data
    fn read_tags(&self, path: &Path) -> Result<Option<Self::Tags>, MetadataError>;

    /// Write `tags` onto `dest` after it has been fully encoded; `None` is a no-op
    fn write_tags(&self, dest: &Path, tags: Option<Self::Tags>) -> Result<(), MetadataError>;
}
