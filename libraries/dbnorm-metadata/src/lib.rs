//! dbnorm Metadata
//!
//! Carries tags from a source audio file to its normalized output.
//!
//! This crate provides:
//! - Tag reading from audio files (MP3, FLAC, OGG, WAV, MP4)
//! - Tag writing onto freshly encoded files, replacing encoder-written tags
//! - A [`LoftyTagStore`] implementing `dbnorm_core::TagStore`
//!
//! # Example
//!
//! ```rust,no_run
//! use dbnorm_metadata::{read_tags, write_tags};
//!
//! # fn example() -> Result<(), dbnorm_core::MetadataError> {
//! let tags = read_tags("/music/song.mp3")?;
//! // ... encode /out/song.mp3 ...
//! write_tags("/out/song.mp3", tags)?;
//! # Ok(())
//! # }
//! ```

mod tags;

pub use tags::{read_tags, write_tags, LoftyTagStore, TagSet};
