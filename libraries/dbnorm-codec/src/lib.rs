//! dbnorm Codec
//!
//! Decoding and encoding behind the `dbnorm_core::CodecAdapter` trait.
//!
//! This crate provides:
//! - [`HoundWavCodec`]: in-process WAV decode/encode, preserving bit depth
//! - [`FfmpegCodec`]: FLAC, MP3, OGG, WebM and MP4 through external `ffmpeg`/`ffprobe`
//! - [`DefaultCodec`]: dispatch by format capability
//!
//! Gain is applied to the samples inside `encode`, so a non-finite gain is
//! rejected before any output is written.
//!
//! # Example
//!
//! ```rust,no_run
//! use dbnorm_codec::DefaultCodec;
//! use dbnorm_core::{AudioFormat, CodecAdapter};
//! use dbnorm_loudness::compute_gain;
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let codec = DefaultCodec::default();
//! let signal = codec.decode(Path::new("/music/song.mp3"), AudioFormat::Mp3)?;
//! let gain = compute_gain(signal.measured_dbfs, -13.5);
//! codec.encode(signal, gain, AudioFormat::Mp3, Path::new("NORMALIZED/song.mp3"))?;
//! # Ok(())
//! # }
//! ```

mod adapter;
mod ffmpeg;
mod wav;

pub use adapter::DefaultCodec;
pub use ffmpeg::{FfmpegCodec, StreamInfo};
pub use wav::HoundWavCodec;
