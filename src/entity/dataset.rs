//! entity::dataset
//!
//! A named table with an optional source and store.

use std::path::{Path, PathBuf};

use super::{DataSourceFile, DataStoreFile, Entity, EntityError};
use crate::core::metadata::{MetadataComposite, Owner};
use crate::core::table::Table;
use crate::io::Content;

/// A named table.
///
/// A dataset loads its table from its source file if it has one, else
/// from its store file, and saves to its store file. While locked it
/// refuses to replace its table or save it.
///
/// # Example
///
/// ```no_run
/// use datastudio::entity::{DataSet, DataSourceFile, DataStoreFile, Entity};
///
/// let mut ds = DataSet::new("sf_listings")
///     .with_source(DataSourceFile::new("./data/raw/sf_listings.csv.gz"))
///     .with_store(DataStoreFile::new("./data/interim/sf_listings.csv"));
///
/// let rows = ds.load()?.n_rows();
/// ds.save()?;
/// println!("{} rows, version {}", rows, ds.version());
/// # Ok::<(), datastudio::entity::EntityError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DataSet {
    metadata: MetadataComposite,
    table: Option<Table>,
    source: Option<DataSourceFile>,
    store: Option<DataStoreFile>,
    locked: bool,
}

impl DataSet {
    pub fn new(name: &str) -> Self {
        Self::with_owner(Owner::new(name, "DataSet"))
    }

    pub fn with_owner(owner: Owner) -> Self {
        Self {
            metadata: MetadataComposite::built(owner),
            table: None,
            source: None,
            store: None,
            locked: false,
        }
    }

    pub fn with_source(mut self, source: DataSourceFile) -> Self {
        self.set_source(source);
        self
    }

    pub fn with_store(mut self, store: DataStoreFile) -> Self {
        self.set_store(store);
        self
    }

    /// Attach the file the table is loaded from.
    pub fn set_source(&mut self, source: DataSourceFile) {
        self.metadata
            .touch(&format!("source set to {}", source.path().display()));
        self.source = Some(source);
    }

    /// Attach the file the table is saved to.
    pub fn set_store(&mut self, store: DataStoreFile) {
        self.metadata
            .touch(&format!("store set to {}", store.path().display()));
        self.store = Some(store);
    }

    pub fn source(&self) -> Option<&DataSourceFile> {
        self.source.as_ref()
    }

    pub fn store(&self) -> Option<&DataStoreFile> {
        self.store.as_ref()
    }

    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    /// Replace the table.
    pub fn set_table(&mut self, table: Table) -> Result<(), EntityError> {
        self.ensure_unlocked()?;
        self.metadata.touch(&format!(
            "table set ({} rows x {} columns)",
            table.n_rows(),
            table.n_cols()
        ));
        self.table = Some(table);
        Ok(())
    }

    /// Load the table from the source file, or the store file if there is
    /// no source.
    ///
    /// # Errors
    ///
    /// - [`EntityError::Locked`] while locked
    /// - [`EntityError::NoSource`] if neither file is attached
    /// - [`EntityError::NoContent`] if nothing could be read
    /// - [`EntityError::NotATable`] if the file does not hold a table
    pub fn load(&mut self) -> Result<&Table, EntityError> {
        self.ensure_unlocked()?;
        let (content, path) = if let Some(source) = self.source.as_mut() {
            (source.load()?, source.path().to_path_buf())
        } else if let Some(store) = self.store.as_mut() {
            (store.load()?, store.path().to_path_buf())
        } else {
            return Err(EntityError::NoSource(self.name().to_string()));
        };

        let table = into_table(content, &path)?;
        self.metadata.touch(&format!(
            "loaded {} rows from {}",
            table.n_rows(),
            path.display()
        ));
        Ok(self.table.insert(table))
    }

    /// Save the table to the store file, returning the path written.
    ///
    /// # Errors
    ///
    /// - [`EntityError::Locked`] while locked
    /// - [`EntityError::NoStore`] / [`EntityError::NoTable`] if either is
    ///   missing
    /// - [`EntityError::NotSaved`] if the write failed
    pub fn save(&mut self) -> Result<PathBuf, EntityError> {
        self.ensure_unlocked()?;
        let name = self.name().to_string();
        let table = self.table.as_ref().ok_or(EntityError::NoTable(name.clone()))?;
        let store = self.store.as_mut().ok_or(EntityError::NoStore(name))?;

        let written = store
            .save(&Content::Table(table.clone()))?
            .ok_or_else(|| EntityError::NotSaved(store.path().to_path_buf()))?;
        self.metadata
            .touch(&format!("saved to {}", written.display()));
        Ok(written)
    }

    /// Refuse table changes and saves; also locks the store file.
    pub fn lock(&mut self) {
        self.locked = true;
        if let Some(store) = self.store.as_mut() {
            store.lock();
        }
    }

    pub fn unlock(&mut self) {
        self.locked = false;
        if let Some(store) = self.store.as_mut() {
            store.unlock();
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    fn ensure_unlocked(&self) -> Result<(), EntityError> {
        if self.locked {
            return Err(EntityError::Locked(self.name().to_string()));
        }
        Ok(())
    }
}

impl Entity for DataSet {
    fn metadata(&self) -> &MetadataComposite {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut MetadataComposite {
        &mut self.metadata
    }
}

fn into_table(content: Option<Content>, path: &Path) -> Result<Table, EntityError> {
    match content {
        Some(Content::Table(table)) => Ok(table),
        Some(other) => Err(EntityError::NotATable {
            path: path.to_path_buf(),
            found: other.kind(),
        }),
        None => Err(EntityError::NoContent(path.to_path_buf())),
    }
}
