//! entity::store
//!
//! File-backed entities.
//!
//! A [`DataStoreFile`] reads and writes its file; a [`DataSourceFile`]
//! only reads. Both record what they last saw on disk in their technical
//! metadata: path, size and SHA-256 fingerprint.

use std::path::{Path, PathBuf};

use super::{Entity, EntityError};
use crate::core::metadata::{Category, MetadataComposite, Owner};
use crate::core::types::Fingerprint;
use crate::io::{Content, FileError, FileHandle, ReadFilter};

/// Handle plus metadata, shared by both file entities.
#[derive(Debug, Clone, PartialEq)]
struct FileBacked {
    metadata: MetadataComposite,
    handle: FileHandle,
}

impl FileBacked {
    fn new(path: PathBuf, class: &str, owner: Option<Owner>) -> Self {
        let handle = FileHandle::new(path);
        let owner = owner.unwrap_or_else(|| Owner::new(handle.name(), class));
        Self {
            metadata: MetadataComposite::built(owner),
            handle,
        }
    }

    fn load(&mut self, filter: Option<&ReadFilter>) -> Result<Option<Content>, EntityError> {
        let content = self.handle.read(filter)?;
        if content.is_some() {
            self.record_file("loaded")?;
        }
        Ok(content)
    }

    /// Record path, size and fingerprint of the file as it is now.
    fn record_file(&mut self, event: &str) -> Result<(), EntityError> {
        self.handle.refresh();
        let path = self.handle.path().to_path_buf();
        let fingerprint = Fingerprint::of_file(&path).map_err(|e| FileError::Io {
            action: "fingerprint",
            path: path.clone(),
            source: e,
        })?;
        let size = self.handle.size()?;

        if let Some(tech) = self.metadata.record_mut(Category::Technical) {
            tech.upsert("path", path.display().to_string())?;
            tech.upsert("size_bytes", size)?;
            tech.upsert("sha256", fingerprint.as_str())?;
        }
        self.metadata.touch(&format!("{} {}", event, path.display()));
        tracing::debug!(path = %path.display(), size, sha256 = %fingerprint, "{}", event);
        Ok(())
    }
}

/// A file the application reads and writes.
///
/// # Example
///
/// ```no_run
/// use datastudio::entity::{DataStoreFile, Entity};
/// use datastudio::io::Content;
///
/// let mut store = DataStoreFile::new("./data/interim/sf_listings.csv");
/// if let Some(content) = store.load()? {
///     store.save(&content)?;
/// }
/// println!("{}", store.metadata().get("tech")?);
/// # Ok::<(), datastudio::entity::EntityError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DataStoreFile {
    inner: FileBacked,
}

impl DataStoreFile {
    /// A store for `path`, named after the file stem.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            inner: FileBacked::new(path.into(), "DataStoreFile", None),
        }
    }

    /// A store for `path` with an explicit owner.
    pub fn with_owner(path: impl Into<PathBuf>, owner: Owner) -> Self {
        Self {
            inner: FileBacked::new(path.into(), "DataStoreFile", Some(owner)),
        }
    }

    pub fn path(&self) -> &Path {
        self.inner.handle.path()
    }

    pub fn handle(&self) -> &FileHandle {
        &self.inner.handle
    }

    pub fn handle_mut(&mut self) -> &mut FileHandle {
        &mut self.inner.handle
    }

    /// Read the whole file.
    ///
    /// Returns `Ok(None)` if the file is missing or unreadable.
    pub fn load(&mut self) -> Result<Option<Content>, EntityError> {
        self.inner.load(None)
    }

    /// Read the file through a filter.
    pub fn load_filtered(&mut self, filter: &ReadFilter) -> Result<Option<Content>, EntityError> {
        self.inner.load(Some(filter))
    }

    /// Write content, returning the path written.
    ///
    /// Returns `Ok(None)` if the write failed softly.
    ///
    /// # Errors
    ///
    /// Fails if the store is locked or the extension is unsupported.
    pub fn save(&mut self, content: &Content) -> Result<Option<PathBuf>, EntityError> {
        let written = self
            .inner
            .handle
            .write(content)?
            .map(Path::to_path_buf);
        if written.is_some() {
            self.inner.record_file("saved")?;
        }
        Ok(written)
    }

    pub fn lock(&mut self) {
        self.inner.handle.lock();
    }

    pub fn unlock(&mut self) {
        self.inner.handle.unlock();
    }

    pub fn is_locked(&self) -> bool {
        self.inner.handle.is_locked()
    }
}

impl Entity for DataStoreFile {
    fn metadata(&self) -> &MetadataComposite {
        &self.inner.metadata
    }

    fn metadata_mut(&mut self) -> &mut MetadataComposite {
        &mut self.inner.metadata
    }
}

/// A file the application only reads.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSourceFile {
    inner: FileBacked,
}

impl DataSourceFile {
    /// A source for `path`, named after the file stem.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            inner: FileBacked::new(path.into(), "DataSourceFile", None),
        }
    }

    /// A source for `path` with an explicit owner.
    pub fn with_owner(path: impl Into<PathBuf>, owner: Owner) -> Self {
        Self {
            inner: FileBacked::new(path.into(), "DataSourceFile", Some(owner)),
        }
    }

    pub fn path(&self) -> &Path {
        self.inner.handle.path()
    }

    pub fn handle(&self) -> &FileHandle {
        &self.inner.handle
    }

    /// Read the whole file.
    pub fn load(&mut self) -> Result<Option<Content>, EntityError> {
        self.inner.load(None)
    }

    /// Read the file through a filter.
    pub fn load_filtered(&mut self, filter: &ReadFilter) -> Result<Option<Content>, EntityError> {
        self.inner.load(Some(filter))
    }
}

impl Entity for DataSourceFile {
    fn metadata(&self) -> &MetadataComposite {
        &self.inner.metadata
    }

    fn metadata_mut(&mut self) -> &mut MetadataComposite {
        &mut self.inner.metadata
    }
}
