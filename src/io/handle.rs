//! io::handle
//!
//! A handle to one file on disk.
//!
//! # Design
//!
//! [`FileHandle`] tracks a path together with the parts derived from it
//! (directory, filename, stem, extension). The derived parts are recomputed
//! whenever the path changes, so they can never disagree with it.
//!
//! A handle can be locked. A locked handle refuses every operation that
//! would change the file or move it: [`FileHandle::move_to`],
//! [`FileHandle::rename`] and [`FileHandle::write`]. Reading and copying
//! stay available.
//!
//! # Example
//!
//! ```no_run
//! use datastudio::io::FileHandle;
//!
//! let mut handle = FileHandle::new("./data/raw/sf_listings.csv");
//! assert_eq!(handle.name(), "sf_listings");
//!
//! handle.rename("listings")?;
//! assert_eq!(handle.filename(), "listings.csv");
//!
//! handle.lock();
//! assert!(handle.move_to("./data/archive").is_err());
//! # Ok::<(), datastudio::io::FileError>(())
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::dispatch::FileIo;
use super::traits::{Content, FileIoError, ReadFilter};
use crate::core::types::Extension;

/// Errors from file handle operations.
#[derive(Debug, Error)]
pub enum FileError {
    /// The handle is locked.
    #[error("unable to {action} '{}' because it is locked; call unlock() first", path.display())]
    Locked { action: &'static str, path: PathBuf },

    /// A rename target was empty or contained a path separator.
    #[error("invalid file name: '{0}'")]
    InvalidName(String),

    /// The file system operation failed.
    #[error("cannot {action} '{}': {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        source: io::Error,
    },

    /// Format dispatch failed.
    #[error(transparent)]
    FileIo(#[from] FileIoError),
}

/// A file on disk and the parts of its path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    path: PathBuf,
    directory: PathBuf,
    filename: String,
    name: String,
    extension: Option<Extension>,
    exists: bool,
    locked: bool,
}

impl FileHandle {
    /// Create a handle for `path`. The file need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let mut handle = Self {
            path: PathBuf::new(),
            directory: PathBuf::new(),
            filename: String::new(),
            name: String::new(),
            extension: None,
            exists: false,
            locked: false,
        };
        handle.set_path(path.into());
        handle
    }

    /// Create a handle from a directory, a stem and an extension.
    pub fn with_name(directory: impl AsRef<Path>, name: &str, ext: &Extension) -> Self {
        Self::new(directory.as_ref().join(format!("{}{}", name, ext)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parent directory (`.` for a bare filename).
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Final path component, extension included.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Filename without its final extension.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn extension(&self) -> Option<&Extension> {
        self.extension.as_ref()
    }

    /// Whether the file existed when last checked.
    pub fn exists(&self) -> bool {
        self.exists
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Prevent moves, renames and writes.
    pub fn lock(&mut self) {
        self.locked = true;
    }

    pub fn unlock(&mut self) {
        self.locked = false;
    }

    /// Re-check whether the file exists.
    pub fn refresh(&mut self) -> bool {
        self.exists = self.path.is_file();
        self.exists
    }

    /// Size of the file in bytes.
    pub fn size(&self) -> Result<u64, FileError> {
        fs::metadata(&self.path)
            .map(|m| m.len())
            .map_err(|e| self.io_error("stat", e))
    }

    /// Copy the file to `dest`, returning a handle to the copy.
    ///
    /// If `dest` is an existing directory the copy keeps its filename.
    pub fn copy_to(&self, dest: impl AsRef<Path>) -> Result<FileHandle, FileError> {
        let target = self.destination(dest.as_ref());
        ensure_parent(&target)?;
        fs::copy(&self.path, &target).map_err(|e| self.io_error("copy", e))?;
        tracing::debug!(from = %self.path.display(), to = %target.display(), "copied file");
        Ok(FileHandle::new(target))
    }

    /// Move the file to `dest` and point the handle at its new location.
    ///
    /// If `dest` is an existing directory the file keeps its filename.
    /// Moves across filesystems fall back to copy and delete. On failure
    /// the handle keeps its old path and no copy is left behind.
    pub fn move_to(&mut self, dest: impl AsRef<Path>) -> Result<&Path, FileError> {
        self.ensure_unlocked("move")?;
        let target = self.destination(dest.as_ref());
        ensure_parent(&target)?;

        match fs::rename(&self.path, &target) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::CrossesDevices => self.copy_across(&target)?,
            Err(e) => return Err(self.io_error("move", e)),
        }

        tracing::debug!(from = %self.path.display(), to = %target.display(), "moved file");
        self.set_path(target);
        Ok(&self.path)
    }

    fn copy_across(&self, target: &Path) -> Result<(), FileError> {
        fs::copy(&self.path, target).map_err(|e| self.io_error("move", e))?;
        if let Err(e) = fs::remove_file(&self.path) {
            // Source is still in place, drop the copy
            let _ = fs::remove_file(target);
            return Err(self.io_error("move", e));
        }
        Ok(())
    }

    /// Rename the file in place, keeping its extension.
    ///
    /// Any extension on `name` is dropped: renaming `a.csv` to `b.txt`
    /// yields `b.csv`.
    pub fn rename(&mut self, name: &str) -> Result<&Path, FileError> {
        self.ensure_unlocked("rename")?;

        let stem = Path::new(name).with_extension("");
        let stem = stem.to_string_lossy();
        if stem.is_empty() || stem.contains('/') || stem.contains('\\') {
            return Err(FileError::InvalidName(name.to_string()));
        }

        let ext = self.extension.as_ref().map(Extension::as_str).unwrap_or("");
        let target = self.directory.join(format!("{}{}", stem, ext));
        fs::rename(&self.path, &target).map_err(|e| self.io_error("rename", e))?;

        tracing::debug!(from = %self.path.display(), to = %target.display(), "renamed file");
        self.set_path(target);
        Ok(&self.path)
    }

    /// Read the file through the format dispatcher.
    ///
    /// Returns `Ok(None)` when the file is missing or cannot be decoded.
    pub fn read(&self, filter: Option<&ReadFilter>) -> Result<Option<Content>, FileError> {
        Ok(FileIo::new().read(&self.path, filter)?)
    }

    /// Write content through the format dispatcher.
    ///
    /// If the format requires a different extension the handle follows the
    /// file to its corrected path. Returns `Ok(None)` when the write failed
    /// softly.
    pub fn write(&mut self, content: &Content) -> Result<Option<&Path>, FileError> {
        self.ensure_unlocked("write")?;
        match FileIo::new().write(&self.path, content)? {
            Some(written) => {
                self.set_path(written);
                Ok(Some(&self.path))
            }
            None => Ok(None),
        }
    }

    fn ensure_unlocked(&self, action: &'static str) -> Result<(), FileError> {
        if self.locked {
            tracing::warn!(path = %self.path.display(), action, "file is locked");
            return Err(FileError::Locked {
                action,
                path: self.path.clone(),
            });
        }
        Ok(())
    }

    fn destination(&self, dest: &Path) -> PathBuf {
        if dest.is_dir() {
            dest.join(&self.filename)
        } else {
            dest.to_path_buf()
        }
    }

    fn io_error(&self, action: &'static str, source: io::Error) -> FileError {
        FileError::Io {
            action,
            path: self.path.clone(),
            source,
        }
    }

    fn set_path(&mut self, path: PathBuf) {
        self.directory = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        self.filename = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.extension = Extension::from_path(&path);
        self.exists = path.is_file();
        self.path = path;
    }
}

fn ensure_parent(target: &Path) -> Result<(), FileError> {
    match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            fs::create_dir_all(parent).map_err(|e| FileError::Io {
                action: "create directory",
                path: parent.to_path_buf(),
                source: e,
            })?;
            tracing::info!(directory = %parent.display(), "created missing directory");
            Ok(())
        }
        _ => Ok(()),
    }
}
