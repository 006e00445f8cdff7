//! dbnorm Core
//!
//! Shared types, traits, and error handling for the dbnorm workspace.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `AudioFormat`, `SupportedFormatSet`, `DecodedSignal`, `SampleSpec`
//! - **Core Traits**: `CodecAdapter` (decode/encode) and `TagStore` (tag read/write)
//! - **Error Handling**: one error enum per pipeline stage plus `FatalError`
//!
//! # Example
//!
//! ```rust
//! use dbnorm_core::{AudioFormat, SupportedFormatSet};
//! use std::path::Path;
//!
//! let formats = SupportedFormatSet::default();
//! assert_eq!(formats.format_of(Path::new("song.mp3")), Some(AudioFormat::Mp3));
//! assert_eq!(formats.format_of(Path::new("song.MP3")), None);
//!
//! // MP3 is always encoded at a fixed 320 kb/s
//! assert_eq!(AudioFormat::Mp3.capabilities().encode.bitrate_kbps, Some(320));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

pub use error::{
    DecodeError, EncodeError, FatalError, FileError, MetadataError, ValidationError,
};
pub use traits::{CodecAdapter, TagStore};
pub use types::{
    AudioFormat, DecodedSignal, EncodeParams, FormatCapabilities, SampleKind, SampleSpec,
    SupportedFormatSet,
};

/// Default target level in dBFS
pub const DEFAULT_TARGET_DBFS: f64 = -13.5;

/// Default output directory name, resolved against the working directory
pub const DEFAULT_OUTPUT_DIR: &str = "NORMALIZED";

/// Bitrate forced for MP3 output, in kb/s
pub const MP3_BITRATE_KBPS: u32 = 320;
