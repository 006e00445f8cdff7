//! File eligibility checks

use dbnorm_core::{AudioFormat, SupportedFormatSet, ValidationError};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

/// A path that passed [`validate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPath {
    path: PathBuf,
    format: AudioFormat,
}

impl ValidatedPath {
    /// Absolute path of the file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Format detected from the extension
    pub fn format(&self) -> AudioFormat {
        self.format
    }

    /// Base filename used for the output
    pub fn file_name(&self) -> &OsStr {
        // validate() only accepts regular files, which always have a name
        self.path.file_name().unwrap_or_else(|| self.path.as_os_str())
    }
}

/// True iff the extension case-sensitively matches a supported format
pub fn is_supported(path: &Path) -> bool {
    SupportedFormatSet::default().format_of(path).is_some()
}

/// Check that `path` is an existing regular file with a supported extension
///
/// Relative paths resolve against the working directory. Existence is checked
/// first, so a missing `notes.txt` is `NotFound`.
pub fn validate(path: &Path) -> Result<ValidatedPath, ValidationError> {
    let path = absolute(path);

    if !path.is_file() {
        return Err(ValidationError::NotFound(path));
    }

    let Some(format) = SupportedFormatSet::default().format_of(&path) else {
        return Err(ValidationError::UnsupportedFormat(path));
    };

    Ok(ValidatedPath { path, format })
}

/// Resolve `path` against the working directory
pub(crate) fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_path_buf(),
    }
}

/// List the supported audio files directly inside `dir`, sorted by name
///
/// Does not recurse. This is what a front end does after the user picks a
/// directory.
pub fn collect_supported(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_supported(&path) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn supported_extensions() {
        for name in ["a.wav", "a.flac", "a.mp3", "a.ogg", "a.webm", "a.mp4"] {
            assert!(is_supported(Path::new(name)), "{name}");
        }
        for name in ["a.WAV", "a.m4a", "a.txt", "wav", "a.mp3.bak"] {
            assert!(!is_supported(Path::new(name)), "{name}");
        }
    }

    #[test]
    fn validate_missing_file() {
        let result = validate(Path::new("/definitely/not/here.wav"));
        assert!(matches!(result, Err(ValidationError::NotFound(_))));
    }

    #[test]
    fn validate_directory_is_not_found() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("folder.wav");
        fs::create_dir(&sub).unwrap();
        assert!(matches!(validate(&sub), Err(ValidationError::NotFound(_))));
    }

    #[test]
    fn validate_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "hello").unwrap();
        assert!(matches!(validate(&path), Err(ValidationError::UnsupportedFormat(_))));

        let upper = dir.path().join("LOUD.WAV");
        fs::write(&upper, "RIFF").unwrap();
        assert!(matches!(validate(&upper), Err(ValidationError::UnsupportedFormat(_))));
    }

    #[test]
    fn relative_paths_become_absolute() {
        let result = validate(Path::new("surely-missing-dbnorm-input.wav"));
        match result {
            Err(ValidationError::NotFound(path)) => assert!(path.is_absolute()),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn validate_keeps_absolute_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("song.mp3");
        fs::write(&path, "ID3").unwrap();

        let validated = validate(&path).unwrap();
        assert_eq!(validated.path(), path.as_path());
        assert_eq!(validated.format(), AudioFormat::Mp3);
        assert_eq!(validated.file_name(), OsStr::new("song.mp3"));
    }

    #[test]
    fn collect_supported_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        for name in ["b.mp3", "a.wav", "c.txt", "d.WAV", "e.flac"] {
            fs::write(dir.path().join(name), "x").unwrap();
        }
        fs::create_dir(dir.path().join("nested.wav")).unwrap();

        let files = collect_supported(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.wav", "b.mp3", "e.flac"]);
    }
}
