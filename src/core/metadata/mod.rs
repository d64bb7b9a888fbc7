//! core::metadata
//!
//! Entity metadata: typed records bundled in a composite.
//!
//! # Modules
//!
//! - [`record`] - `MetadataRecord` and `Category`
//! - [`builder`] - `Owner` and `RecordBuilder` for seeding records
//! - [`composite`] - `MetadataComposite`, the per-entity bundle
//!
//! # Model
//!
//! Each entity owns one [`MetadataComposite`] holding up to four records:
//! administrative, descriptive, technical and process. Records are ordered
//! maps of JSON values. Every record counts its own mutations in an
//! `updates` field.
//!
//! # Example
//!
//! ```
//! use datastudio::core::metadata::{MetadataComposite, Owner};
//!
//! let mut meta = MetadataComposite::new(Owner::new("sf_listings", "DataSet"));
//! meta.build_admin();
//! meta.build_desc();
//! meta.build_tech();
//! meta.build_process();
//!
//! assert_eq!(meta.len(), 4);
//! assert_eq!(meta.get("desc").unwrap().name(), "sf_listings");
//! assert_eq!(meta.get("admin").unwrap().updates(), 0);
//!
//! // "i" matches several categories
//! assert!(meta.get("i").is_err());
//! ```

pub mod builder;
pub mod composite;
pub mod record;

pub use builder::{Owner, RecordBuilder, DEFAULT_VERSION};
pub use composite::MetadataComposite;
pub use record::{Category, MetadataRecord, NAME_KEY, UPDATES_KEY};

use thiserror::Error;

/// Errors from metadata operations.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("key '{key}' already exists in {category} metadata")]
    DuplicateKey { category: Category, key: String },

    #[error("key '{key}' does not exist in {category} metadata")]
    MissingKey { category: Category, key: String },

    #[error("key '{key}' is reserved in {category} metadata")]
    ReservedKey { category: Category, key: String },

    #[error("key '{key}' is required in {category} metadata and cannot be removed")]
    RequiredKey { category: Category, key: String },

    #[error("{category} metadata name must be a non-empty string, got {found}")]
    InvalidName { category: Category, found: String },

    #[error("no metadata category matches '{0}'")]
    CategoryNotFound(String),

    #[error("metadata category '{query}' is ambiguous: matches {}", matches.join(", "))]
    AmbiguousCategory { query: String, matches: Vec<String> },

    #[error("failed to serialize metadata: {0}")]
    Serialize(#[from] serde_json::Error),
}
