//! entity
//!
//! Metadata-carrying objects: datasets, file-backed stores and sources,
//! and collections of datasets.
//!
//! # Architecture
//!
//! Every entity owns exactly one [`MetadataComposite`], built in full when
//! the entity is constructed. File-backed entities also own one
//! [`FileHandle`](crate::io::FileHandle) and read or write through the
//! format dispatcher.
//!
//! The [`Entity`] trait exposes the metadata-governed properties (name,
//! description, version). Changing one edits the descriptive record and
//! records the change on the administrative and process records.
//!
//! # Example
//!
//! ```
//! use datastudio::entity::{DataSet, Entity};
//!
//! let mut ds = DataSet::new("sf_listings");
//! ds.set_description("Airbnb listings, San Francisco").unwrap();
//!
//! assert_eq!(ds.name(), "sf_listings");
//! assert_eq!(ds.metadata().get("admin").unwrap().updates(), 1);
//! ```

mod collection;
mod dataset;
mod store;

pub use collection::DataCollection;
pub use dataset::DataSet;
pub use store::{DataSourceFile, DataStoreFile};

use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;

use crate::core::metadata::{Category, MetadataComposite, MetadataError};
use crate::core::table::TableError;
use crate::io::{FileError, FileIoError};

/// Errors from entity operations.
#[derive(Debug, Error)]
pub enum EntityError {
    #[error(transparent)]
    Metadata(#[from] MetadataError),

    #[error(transparent)]
    File(#[from] FileError),

    #[error(transparent)]
    FileIo(#[from] FileIoError),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error("{0} has no source file")]
    NoSource(String),

    #[error("{0} has no store file")]
    NoStore(String),

    #[error("{0} holds no table")]
    NoTable(String),

    #[error("nothing could be read from '{}'", .0.display())]
    NoContent(PathBuf),

    #[error("nothing could be saved to '{}'", .0.display())]
    NotSaved(PathBuf),

    #[error("expected a table from '{}', got {found}", path.display())]
    NotATable { path: PathBuf, found: &'static str },

    #[error("{0} is locked; call unlock() first")]
    Locked(String),

    #[error("collection already has a member '{0}'")]
    DuplicateMember(String),

    #[error("collection has no member '{0}'")]
    MissingMember(String),

    #[error("collection {0} is empty")]
    EmptyCollection(String),
}

/// Common behavior of everything that carries metadata.
pub trait Entity {
    fn metadata(&self) -> &MetadataComposite;

    fn metadata_mut(&mut self) -> &mut MetadataComposite;

    /// The entity's class name, as recorded in its descriptive metadata.
    fn class(&self) -> &str {
        self.metadata().owner().class()
    }

    fn name(&self) -> &str {
        descriptive_str(self.metadata(), "name")
    }

    fn set_name(&mut self, name: &str) -> Result<(), EntityError> {
        Ok(self.metadata_mut().describe("name", name)?)
    }

    fn description(&self) -> &str {
        descriptive_str(self.metadata(), "description")
    }

    fn set_description(&mut self, description: &str) -> Result<(), EntityError> {
        Ok(self.metadata_mut().describe("description", description)?)
    }

    fn version(&self) -> &str {
        descriptive_str(self.metadata(), "version")
    }

    fn set_version(&mut self, version: &str) -> Result<(), EntityError> {
        Ok(self.metadata_mut().describe("version", version)?)
    }
}

fn descriptive_str<'a>(metadata: &'a MetadataComposite, key: &str) -> &'a str {
    metadata
        .record(Category::Descriptive)
        .and_then(|r| r.get(key))
        .and_then(Value::as_str)
        .unwrap_or_default()
}
