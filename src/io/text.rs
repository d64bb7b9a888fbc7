//! io::text
//!
//! Plain-text strategy.
//!
//! Reads return the whole file, or a byte-limited prefix when a
//! [`ReadFilter::Bytes`] is given. Writes accept a single string or a list
//! of strings; a list is written back to back with no separator, so reading
//! it again yields the concatenation rather than the list.

use std::borrow::Cow;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use super::traits::{
    open_existing, prepare_destination, unsupported_content, unsupported_filter, Content,
    FileIoError, IoStrategy, ReadFilter,
};
use crate::core::types::Extension;

/// Reads and writes UTF-8 text files (`.txt`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextStrategy;

impl TextStrategy {
    pub const fn new() -> Self {
        Self
    }
}

impl IoStrategy for TextStrategy {
    fn name(&self) -> &'static str {
        "text"
    }

    fn extension(&self) -> Extension {
        Extension::from_static(".txt")
    }

    fn read(&self, path: &Path, filter: Option<&ReadFilter>) -> Result<Content, FileIoError> {
        let limit = match filter {
            None => None,
            Some(ReadFilter::Bytes(n)) => Some(*n),
            Some(other) => return Err(unsupported_filter(self.name(), other)),
        };

        let file = open_existing(path)?;
        let mut bytes = Vec::new();
        match limit {
            Some(n) => file.take(n as u64).read_to_end(&mut bytes),
            None => (&file).read_to_end(&mut bytes),
        }
        .map_err(|e| FileIoError::io(path, e))?;

        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            // A byte limit may cut a multi-byte character in half
            Err(e) if limit.is_some() && e.utf8_error().error_len().is_none() => {
                let valid = e.utf8_error().valid_up_to();
                let mut bytes = e.into_bytes();
                bytes.truncate(valid);
                String::from_utf8(bytes).map_err(|e| FileIoError::malformed(path, e))?
            }
            Err(e) => return Err(FileIoError::malformed(path, e)),
        };

        tracing::debug!(path = %path.display(), bytes = text.len(), "read text");
        Ok(Content::Text(text))
    }

    fn write(&self, path: &Path, content: &Content) -> Result<PathBuf, FileIoError> {
        let text: Cow<'_, str> = match content {
            Content::Text(s) => Cow::Borrowed(s),
            Content::Lines(lines) => Cow::Owned(lines.concat()),
            other => {
                return Err(unsupported_content(
                    self.name(),
                    "a string or a list of strings",
                    other,
                ))
            }
        };

        let path = prepare_destination(path, &self.extension())?;
        fs::write(&path, text.as_bytes()).map_err(|e| FileIoError::io(&path, e))?;

        tracing::debug!(path = %path.display(), bytes = text.len(), "wrote text");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn roundtrip_string() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("notes.txt");
        let txt = TextStrategy::new();

        txt.write(&path, &Content::Text("hello\nworld\n".into()))
            .unwrap();
        assert_eq!(
            txt.read(&path, None).unwrap(),
            Content::Text("hello\nworld\n".into())
        );
    }

    #[test]
    fn lines_are_concatenated() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("notes.txt");
        let txt = TextStrategy::new();

        let lines = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        txt.write(&path, &Content::Lines(lines)).unwrap();
        assert_eq!(txt.read(&path, None).unwrap(), Content::Text("abc".into()));
    }

    #[test]
    fn byte_prefix() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("notes.txt");
        fs::write(&path, "hello world").unwrap();

        let content = TextStrategy::new()
            .read(&path, Some(&ReadFilter::Bytes(5)))
            .unwrap();
        assert_eq!(content, Content::Text("hello".into()));
    }

    #[test]
    fn byte_prefix_longer_than_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("notes.txt");
        fs::write(&path, "hi").unwrap();

        let content = TextStrategy::new()
            .read(&path, Some(&ReadFilter::Bytes(100)))
            .unwrap();
        assert_eq!(content, Content::Text("hi".into()));
    }

    #[test]
    fn byte_prefix_stops_at_char_boundary() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("notes.txt");
        // 'é' is two bytes; a 2-byte limit cuts it in half
        fs::write(&path, "aé").unwrap();

        let content = TextStrategy::new()
            .read(&path, Some(&ReadFilter::Bytes(2)))
            .unwrap();
        assert_eq!(content, Content::Text("a".into()));
    }

    #[test]
    fn invalid_utf8_is_malformed() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bin.txt");
        fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

        let err = TextStrategy::new().read(&path, None).unwrap_err();
        assert!(matches!(err, FileIoError::MalformedContent { .. }));
    }

    #[test]
    fn column_filter_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("notes.txt");
        fs::write(&path, "x").unwrap();

        let err = TextStrategy::new()
            .read(&path, Some(&ReadFilter::columns(["a"])))
            .unwrap_err();
        assert!(matches!(err, FileIoError::TypeMismatch { .. }));
    }

    #[test]
    fn table_content_rejected() {
        let temp = TempDir::new().unwrap();
        let table = crate::core::table::Table::new(["a"]).unwrap();
        let err = TextStrategy::new()
            .write(&temp.path().join("t.txt"), &Content::Table(table))
            .unwrap_err();
        assert!(matches!(err, FileIoError::TypeMismatch { .. }));
    }
}
