//! io::dispatch
//!
//! Extension-driven read/write dispatch.
//!
//! # Failure policy
//!
//! [`FileIo::read`] and [`FileIo::write`] treat an unsupported extension
//! as a hard error and every other failure as a soft one: the failure is
//! logged as a warning and `Ok(None)` is returned. [`FileIo::try_read`] and
//! [`FileIo::try_write`] propagate every failure instead.
//!
//! # Example
//!
//! ```no_run
//! use datastudio::io::{FileIo, ReadFilter};
//!
//! let io = FileIo::new();
//! let filter = ReadFilter::columns(["id", "bathrooms"]);
//! match io.read("./data/sf_listings.csv", Some(&filter))? {
//!     Some(content) => println!("{:?}", content.as_table().map(|t| t.n_rows())),
//!     None => println!("nothing read"),
//! }
//! # Ok::<(), datastudio::io::FileIoError>(())
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::registry::StrategyRegistry;
use super::traits::{Content, FileIoError, IoStrategy, ReadFilter};
use crate::core::types::Extension;

/// Routes reads and writes to the strategy registered for the file's
/// extension.
#[derive(Debug, Clone, Copy)]
pub struct FileIo {
    registry: &'static StrategyRegistry,
}

impl Default for FileIo {
    fn default() -> Self {
        Self::new()
    }
}

impl FileIo {
    /// A dispatcher over the process-wide registry.
    pub fn new() -> Self {
        Self {
            registry: StrategyRegistry::global(),
        }
    }

    /// Resolve the strategy for a path.
    ///
    /// # Errors
    ///
    /// Returns [`FileIoError::UnsupportedFormat`] if the path has no
    /// extension or no strategy is registered for it.
    pub fn resolve(&self, path: &Path) -> Result<Arc<dyn IoStrategy>, FileIoError> {
        let ext = Extension::from_path(path).ok_or_else(|| FileIoError::UnsupportedFormat {
            extension: path
                .extension()
                .map(|e| format!(".{}", e.to_string_lossy()))
                .unwrap_or_default(),
        })?;
        self.registry.get(&ext)
    }

    /// Read a file, returning `Ok(None)` on any non-fatal failure.
    ///
    /// # Errors
    ///
    /// Only [`FileIoError::UnsupportedFormat`] is returned as an error.
    pub fn read(
        &self,
        path: impl AsRef<Path>,
        filter: Option<&ReadFilter>,
    ) -> Result<Option<Content>, FileIoError> {
        let path = path.as_ref();
        soften(self.try_read(path, filter))
    }

    /// Read a file, propagating every failure.
    pub fn try_read(
        &self,
        path: impl AsRef<Path>,
        filter: Option<&ReadFilter>,
    ) -> Result<Content, FileIoError> {
        let path = path.as_ref();
        let strategy = self.resolve(path)?;
        tracing::debug!(path = %path.display(), format = strategy.name(), "reading");
        strategy.read(path, filter)
    }

    /// Write content, returning `Ok(None)` on any non-fatal failure.
    ///
    /// On success the returned path is where the data actually landed,
    /// which differs from `path` if the extension had to be corrected.
    ///
    /// # Errors
    ///
    /// Only [`FileIoError::UnsupportedFormat`] is returned as an error.
    pub fn write(
        &self,
        path: impl AsRef<Path>,
        content: &Content,
    ) -> Result<Option<PathBuf>, FileIoError> {
        soften(self.try_write(path, content))
    }

    /// Write content, propagating every failure.
    pub fn try_write(
        &self,
        path: impl AsRef<Path>,
        content: &Content,
    ) -> Result<PathBuf, FileIoError> {
        let path = path.as_ref();
        let strategy = self.resolve(path)?;
        tracing::debug!(path = %path.display(), format = strategy.name(), "writing");
        strategy.write(path, content)
    }
}

/// Turn non-fatal errors into a warning plus `None`.
fn soften<T>(result: Result<T, FileIoError>) -> Result<Option<T>, FileIoError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_fatal() => Err(e),
        Err(FileIoError::FileMissing { path }) => {
            tracing::warn!(
                "The file, {}, does not exist. None returned.",
                path.display()
            );
            Ok(None)
        }
        Err(e) => {
            tracing::warn!(error = %e, "file i/o failed; None returned");
            Ok(None)
        }
    }
}
