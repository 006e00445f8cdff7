//! Tag reading and writing
//!
//! Tags are read from the source once and written onto the normalized
//! output after the encoder has finished with it:
//! - The source tag type is kept when the output container supports it
//! - Otherwise items are remapped to the output's primary tag type
//! - Containers lofty cannot parse (e.g. WebM) carry no tags

use dbnorm_core::{MetadataError, TagStore};
use lofty::error::{ErrorKind, LoftyError};
use lofty::{Accessor, ItemKey, Probe, Tag, TagExt, TagType, TaggedFileExt};
use std::borrow::Cow;
use std::fmt;
use std::path::Path;
use tracing::debug;

/// Opaque tag set carried from a source file to its output
///
/// Holds every item and picture of one lofty tag. The pipeline never looks
/// inside; accessors exist for logging and verification.
#[derive(Clone)]
pub struct TagSet {
    tag: Tag,
}

impl fmt::Debug for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagSet")
            .field("tag_type", &self.tag_type())
            .field("items", &self.len())
            .finish()
    }
}

impl TagSet {
    /// Tag format the items were read from
    pub fn tag_type(&self) -> TagType {
        self.tag.tag_type()
    }

    /// Number of items (pictures excluded)
    pub fn len(&self) -> usize {
        self.tag.len()
    }

    /// Check if the set has no items and no pictures
    pub fn is_empty(&self) -> bool {
        self.tag.is_empty()
    }

    /// Text value for a key, if present
    pub fn get_text(&self, key: &ItemKey) -> Option<&str> {
        self.tag.get_string(key)
    }

    /// Track title
    pub fn title(&self) -> Option<Cow<'_, str>> {
        self.tag.title()
    }

    /// Track artist
    pub fn artist(&self) -> Option<Cow<'_, str>> {
        self.tag.artist()
    }

    /// Album title
    pub fn album(&self) -> Option<Cow<'_, str>> {
        self.tag.album()
    }

    /// Borrow the underlying lofty tag
    pub fn as_tag(&self) -> &Tag {
        &self.tag
    }
}

impl From<Tag> for TagSet {
    fn from(tag: Tag) -> Self {
        Self { tag }
    }
}

fn read_error(err: &LoftyError) -> MetadataError {
    MetadataError::Read(err.to_string())
}

fn write_error(err: &LoftyError) -> MetadataError {
    MetadataError::Write(err.to_string())
}

/// Read the tag set of an audio file
///
/// # Returns
/// - `Ok(None)` if the file has no tag data, only empty tags, or is a
///   container the tag library does not recognize
/// - `Err` if the file exists but its tags cannot be parsed
pub fn read_tags<P: AsRef<Path>>(path: P) -> Result<Option<TagSet>, MetadataError> {
    let path = path.as_ref();

    if !path.is_file() {
        return Err(MetadataError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("File not found: {}", path.display()),
        )));
    }

    // File type comes from the content, not the extension
    let read = Probe::open(path)
        .and_then(|opened| opened.guess_file_type().map_err(LoftyError::from))
        .and_then(Probe::read);
    let tagged_file = match read {
        Ok(file) => file,
        Err(e) if matches!(e.kind(), ErrorKind::UnknownFormat) => {
            debug!("No tag support for {:?}, carrying no tags", path);
            return Ok(None);
        }
        Err(e) => return Err(read_error(&e)),
    };

    // Primary tag first, then any other non-empty tag
    let tag = tagged_file
        .primary_tag()
        .filter(|t| !t.is_empty())
        .or_else(|| tagged_file.tags().iter().find(|t| !t.is_empty()));

    match tag {
        Some(tag) => {
            debug!(
                "Read {:?} tag with {} items from {:?}",
                tag.tag_type(),
                tag.len(),
                path
            );
            Ok(Some(TagSet { tag: tag.clone() }))
        }
        None => Ok(None),
    }
}

/// Write a tag set onto a fully encoded file
///
/// `None` is a successful no-op. An existing tag of the same type on `dest`
/// (e.g. one written by the encoder) is replaced.
pub fn write_tags<P: AsRef<Path>>(dest: P, tags: Option<TagSet>) -> Result<(), MetadataError> {
    let dest = dest.as_ref();

    let Some(TagSet { mut tag }) = tags else {
        return Ok(());
    };

    if !dest.is_file() {
        return Err(MetadataError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("File not found: {}", dest.display()),
        )));
    }

    let detected = Probe::open(dest)
        .map_err(|e| write_error(&e))?
        .guess_file_type()?;
    let file_type = detected
        .file_type()
        .ok_or_else(|| MetadataError::Write(format!("Unknown file type: {}", dest.display())))?;

    if !file_type.supports_tag_type(tag.tag_type()) {
        let target = file_type.primary_tag_type();
        debug!("Remapping {:?} tag to {:?} for {:?}", tag.tag_type(), target, dest);
        tag.re_map(target);
    }

    tag.save_to_path(dest).map_err(|e| write_error(&e))?;

    debug!("Wrote {:?} tag to {:?}", tag.tag_type(), dest);

    Ok(())
}

/// [`TagStore`] backed by lofty
#[derive(Debug, Clone, Copy, Default)]
pub struct LoftyTagStore;

impl LoftyTagStore {
    /// Create a new tag store
    pub fn new() -> Self {
        Self
    }
}

impl TagStore for LoftyTagStore {
    type Tags = TagSet;

    fn read_tags(&self, path: &Path) -> Result<Option<TagSet>, MetadataError> {
        read_tags(path)
    }

    fn write_tags(&self, dest: &Path, tags: Option<TagSet>) -> Result<(), MetadataError> {
        write_tags(dest, tags)
    }
}
