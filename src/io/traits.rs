//! io::traits
//!
//! The `IoStrategy` trait and the types shared by every strategy.
//!
//! # Design
//!
//! A strategy owns exactly one canonical extension and holds no state
//! between calls, so one instance can serve every file of its format.
//! All methods return `Result`; whether a failure is fatal is decided by
//! the dispatcher, not by the strategy.
//!
//! # Example
//!
//! ```no_run
//! use datastudio::io::{CsvStrategy, IoStrategy, ReadFilter};
//! use std::path::Path;
//!
//! let csv = CsvStrategy::plain();
//! let filter = ReadFilter::columns(["id", "price"]);
//! let content = csv.read(Path::new("./sf.csv"), Some(&filter))?;
//! # Ok::<(), datastudio::io::FileIoError>(())
//! ```

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use ndarray::ArrayD;
use thiserror::Error;

use crate::core::table::{Table, TableError};
use crate::core::types::Extension;

/// Errors from file I/O.
#[derive(Debug, Error)]
pub enum FileIoError {
    /// No strategy is registered for the extension.
    #[error(
        "{extension} files are not supported (supported: {})",
        super::registry::supported_extensions()
    )]
    UnsupportedFormat {
        /// The offending extension, or an empty string if the path had none
        extension: String,
    },

    /// The file to read does not exist.
    #[error("the file '{}' does not exist", path.display())]
    FileMissing { path: PathBuf },

    /// The file exists but its content could not be decoded.
    #[error("malformed content in '{}': {message}", path.display())]
    MalformedContent { path: PathBuf, message: String },

    /// Content or filter does not fit the target format.
    #[error("type mismatch: {format} expects {expected}, got {found}")]
    TypeMismatch {
        format: &'static str,
        expected: &'static str,
        found: String,
    },

    /// Any other I/O failure.
    #[error("i/o error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl FileIoError {
    /// Whether the error must propagate rather than become a sentinel.
    pub fn is_fatal(&self) -> bool {
        matches!(self, FileIoError::UnsupportedFormat { .. })
    }

    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            FileIoError::FileMissing {
                path: path.to_path_buf(),
            }
        } else {
            FileIoError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    pub(crate) fn malformed(path: &Path, message: impl ToString) -> Self {
        FileIoError::MalformedContent {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }

    pub(crate) fn from_table(path: &Path, err: TableError) -> Self {
        Self::malformed(path, err)
    }
}

/// Typed payload of a read or write.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    /// Tabular data (CSV, gzip CSV).
    Table(Table),
    /// A single string (text).
    Text(String),
    /// Strings written back to back (text, write only).
    Lines(Vec<String>),
    /// An n-dimensional float array (npy).
    Array(ArrayD<f64>),
}

impl Content {
    /// Short name of the variant, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Content::Table(_) => "table",
            Content::Text(_) => "text",
            Content::Lines(_) => "lines",
            Content::Array(_) => "array",
        }
    }

    /// Borrow the table, if this is one.
    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Content::Table(t) => Some(t),
            _ => None,
        }
    }

    /// Take the table, if this is one.
    pub fn into_table(self) -> Option<Table> {
        match self {
            Content::Table(t) => Some(t),
            _ => None,
        }
    }

    /// Borrow the text, if this is one.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Content::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the array, if this is one.
    pub fn as_array(&self) -> Option<&ArrayD<f64>> {
        match self {
            Content::Array(a) => Some(a),
            _ => None,
        }
    }
}

/// Optional restriction applied while reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadFilter {
    /// Keep only these columns (tabular formats).
    Columns(Vec<String>),
    /// Read at most this many bytes (text).
    Bytes(usize),
}

impl ReadFilter {
    /// Build a column filter.
    pub fn columns<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ReadFilter::Columns(names.into_iter().map(Into::into).collect())
    }

    fn kind(&self) -> &'static str {
        match self {
            ReadFilter::Columns(_) => "column filter",
            ReadFilter::Bytes(_) => "byte filter",
        }
    }
}

/// A reader/writer for one file format.
///
/// Implementations must be stateless: the registry shares one instance
/// across all files of its extension.
pub trait IoStrategy: Send + Sync + std::fmt::Debug {
    /// Human-readable format name (e.g., "csv").
    fn name(&self) -> &'static str;

    /// Canonical extension written by this strategy.
    fn extension(&self) -> Extension;

    /// Read the file at `path`.
    fn read(&self, path: &Path, filter: Option<&ReadFilter>) -> Result<Content, FileIoError>;

    /// Write `content` to `path`, returning the final path.
    ///
    /// The final path differs from `path` when the extension had to be
    /// corrected.
    fn write(&self, path: &Path, content: &Content) -> Result<PathBuf, FileIoError>;
}

/// Open a file for reading, mapping `NotFound` to `FileMissing`.
pub(crate) fn open_existing(path: &Path) -> Result<File, FileIoError> {
    File::open(path).map_err(|e| FileIoError::io(path, e))
}

/// Reject a filter that the format cannot apply.
pub(crate) fn unsupported_filter(format: &'static str, filter: &ReadFilter) -> FileIoError {
    FileIoError::TypeMismatch {
        format,
        expected: "no filter of this kind",
        found: filter.kind().to_string(),
    }
}

/// Reject content that the format cannot write.
pub(crate) fn unsupported_content(
    format: &'static str,
    expected: &'static str,
    content: &Content,
) -> FileIoError {
    FileIoError::TypeMismatch {
        format,
        expected,
        found: content.kind().to_string(),
    }
}

/// Prepare a destination path for writing.
///
/// Creates the parent directory when it is missing and appends the
/// canonical extension when the path's own extension differs.
pub(crate) fn prepare_destination(path: &Path, ext: &Extension) -> Result<PathBuf, FileIoError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| FileIoError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
            tracing::info!(directory = %parent.display(), "created missing directory");
        }
    }

    if Extension::from_path(path).as_ref() == Some(ext) {
        return Ok(path.to_path_buf());
    }

    let mut corrected = path.as_os_str().to_os_string();
    corrected.push(ext.as_str());
    let corrected = PathBuf::from(corrected);
    tracing::warn!(
        from = %path.display(),
        to = %corrected.display(),
        "file extension incompatible with file type; saving under corrected name"
    );
    Ok(corrected)
}

/// Remove a partly written file when encoding it failed.
///
/// The original error is returned either way.
pub(crate) fn discard_on_error<T>(
    path: &Path,
    result: Result<T, FileIoError>,
) -> Result<T, FileIoError> {
    if result.is_err() {
        match fs::remove_file(path) {
            Ok(()) => tracing::warn!(path = %path.display(), "removed partly written file"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot remove partly written file")
            }
        }
    }
    result
}
