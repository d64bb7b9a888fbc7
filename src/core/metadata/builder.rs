//! core::metadata::builder
//!
//! Seeding of new metadata records.
//!
//! # Design
//!
//! An [`Owner`] describes the entity a composite belongs to. A
//! [`RecordBuilder`] turns an owner into a fresh record of one category,
//! optionally with extra fields, without counting any of it as an update.
//!
//! # Seeded fields
//!
//! | Category | Fields |
//! |----------|--------|
//! | administrative | `id`, `creator`, `created`, `modifier`, `modified` |
//! | descriptive | `description`, `class`, `version`, `keywords` |
//! | technical | `os`, `family`, `arch`, `logical_cores`, `library_version`, `captured` |
//! | process | `log` |
//!
//! Every record additionally starts with `name` and `updates = 0`.
//!
//! # Example
//!
//! ```
//! use datastudio::core::metadata::{Category, Owner, RecordBuilder};
//!
//! let owner = Owner::new("sf_listings", "DataSet").with_creator("analyst");
//! let desc = RecordBuilder::new(Category::Descriptive, &owner)
//!     .field("source", "airbnb")
//!     .build();
//!
//! assert_eq!(desc.get_str("class"), Some("DataSet"));
//! assert_eq!(desc.get_str("source"), Some("airbnb"));
//! assert!(desc.is_fresh());
//! ```

use serde_json::{Map, Value};

use super::record::{Category, MetadataRecord};
use crate::core::types::{EntityId, UtcTimestamp};

/// Version given to new entities unless configured otherwise.
pub const DEFAULT_VERSION: &str = "0.1.0";

/// The entity a metadata composite describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    name: String,
    class: String,
    version: String,
    creator: String,
}

impl Owner {
    /// An owner created by the current OS user at the default version.
    pub fn new(name: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            class: class.into(),
            version: DEFAULT_VERSION.to_string(),
            creator: current_user(),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = creator.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn creator(&self) -> &str {
        &self.creator
    }

    pub(crate) fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }
}

/// Builds one fresh record from an owner.
#[derive(Debug)]
pub struct RecordBuilder<'a> {
    category: Category,
    owner: &'a Owner,
    extra: Map<String, Value>,
}

impl<'a> RecordBuilder<'a> {
    pub fn new(category: Category, owner: &'a Owner) -> Self {
        Self {
            category,
            owner,
            extra: Map::new(),
        }
    }

    /// Add a field beyond the category's seeded set.
    ///
    /// Extra fields are written after the seeded ones and may not
    /// overwrite `name` or `updates`.
    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Build the record.
    pub fn build(self) -> MetadataRecord {
        let owner = self.owner;
        let mut record = MetadataRecord::new(self.category, owner.name());

        match self.category {
            Category::Administrative => {
                let now = UtcTimestamp::now().to_string();
                record.seed("id", Value::from(EntityId::generate().to_string()));
                record.seed("creator", Value::from(owner.creator()));
                record.seed("created", Value::from(now.clone()));
                record.seed("modifier", Value::from(owner.creator()));
                record.seed("modified", Value::from(now));
            }
            Category::Descriptive => {
                record.seed("description", Value::from(""));
                record.seed("class", Value::from(owner.class()));
                record.seed("version", Value::from(owner.version()));
                record.seed(
                    "keywords",
                    Value::from(vec![owner.name().to_string(), owner.class().to_string()]),
                );
            }
            Category::Technical => {
                for (key, value) in environment() {
                    record.seed(&key, value);
                }
            }
            Category::Process => {
                let line = format!("{} created {}", UtcTimestamp::now(), owner.class());
                record.seed("log", Value::from(vec![line]));
            }
        }

        for (key, value) in self.extra {
            if key != "name" && key != super::record::UPDATES_KEY {
                record.seed(&key, value);
            }
        }
        record
    }
}

/// Name of the user running the process.
pub fn current_user() -> String {
    ["USER", "USERNAME", "LOGNAME"]
        .iter()
        .find_map(|var| std::env::var(var).ok().filter(|v| !v.is_empty()))
        .unwrap_or_else(|| "unknown".to_string())
}

/// Snapshot of the runtime environment for technical records.
pub fn environment() -> Map<String, Value> {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);

    let mut env = Map::new();
    env.insert("os".into(), Value::from(std::env::consts::OS));
    env.insert("family".into(), Value::from(std::env::consts::FAMILY));
    env.insert("arch".into(), Value::from(std::env::consts::ARCH));
    env.insert("logical_cores".into(), Value::from(cores));
    env.insert(
        "library_version".into(),
        Value::from(env!("CARGO_PKG_VERSION")),
    );
    env.insert(
        "captured".into(),
        Value::from(UtcTimestamp::now().to_string()),
    );
    env
}
