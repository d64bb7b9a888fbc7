//! core::metadata::composite
//!
//! The per-entity bundle of metadata records.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Value};

use super::builder::{Owner, RecordBuilder};
use super::record::{Category, MetadataRecord, NAME_KEY};
use super::MetadataError;
use crate::ui::output::{self, Verbosity};

/// Metadata records of one entity, keyed by category.
///
/// Records are looked up with a case-insensitive substring of their
/// category key, so `"admin"`, `"DESC"` and `"tech"` all work. A query
/// must match exactly one category.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataComposite {
    owner: Owner,
    records: BTreeMap<Category, MetadataRecord>,
}

impl MetadataComposite {
    /// An empty composite for `owner`. Call the `build_*` methods to seed
    /// records.
    pub fn new(owner: Owner) -> Self {
        Self {
            owner,
            records: BTreeMap::new(),
        }
    }

    /// A composite with all four categories built.
    pub fn built(owner: Owner) -> Self {
        let mut composite = Self::new(owner);
        composite.build_all();
        composite
    }

    pub fn owner(&self) -> &Owner {
        &self.owner
    }

    /// Build (or rebuild) the administrative record.
    pub fn build_admin(&mut self) -> &mut MetadataRecord {
        self.build(Category::Administrative)
    }

    /// Build (or rebuild) the descriptive record.
    pub fn build_desc(&mut self) -> &mut MetadataRecord {
        self.build(Category::Descriptive)
    }

    /// Build (or rebuild) the technical record.
    pub fn build_tech(&mut self) -> &mut MetadataRecord {
        self.build(Category::Technical)
    }

    /// Build (or rebuild) the process record.
    pub fn build_process(&mut self) -> &mut MetadataRecord {
        self.build(Category::Process)
    }

    /// Build every category in order.
    pub fn build_all(&mut self) {
        for category in Category::ALL {
            self.build(category);
        }
    }

    /// Build a record of `category`, replacing any previous one.
    pub fn build(&mut self, category: Category) -> &mut MetadataRecord {
        let record = RecordBuilder::new(category, &self.owner).build();
        match self.records.entry(category) {
            Entry::Occupied(mut slot) => {
                tracing::debug!(%category, owner = self.owner.name(), "replacing metadata record");
                slot.insert(record);
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(record),
        }
    }

    /// Look up a record by category query.
    ///
    /// # Errors
    ///
    /// - [`MetadataError::CategoryNotFound`] if nothing matches
    /// - [`MetadataError::AmbiguousCategory`] if more than one matches
    pub fn get(&self, query: &str) -> Result<&MetadataRecord, MetadataError> {
        let category = self.resolve(query)?;
        self.records
            .get(&category)
            .ok_or_else(|| MetadataError::CategoryNotFound(query.to_string()))
    }

    /// Mutable lookup by category query.
    pub fn get_mut(&mut self, query: &str) -> Result<&mut MetadataRecord, MetadataError> {
        let category = self.resolve(query)?;
        self.records
            .get_mut(&category)
            .ok_or_else(|| MetadataError::CategoryNotFound(query.to_string()))
    }

    /// Direct lookup by category.
    pub fn record(&self, category: Category) -> Option<&MetadataRecord> {
        self.records.get(&category)
    }

    pub fn record_mut(&mut self, category: Category) -> Option<&mut MetadataRecord> {
        self.records.get_mut(&category)
    }

    /// Categories that have been built, in order.
    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.records.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record the same event on every record.
    pub fn update_all(&mut self, event: Option<&str>) {
        for record in self.records.values_mut() {
            record.update(event);
        }
    }

    /// Note an event on the administrative and process records.
    pub fn touch(&mut self, event: &str) {
        for category in [Category::Administrative, Category::Process] {
            if let Some(record) = self.records.get_mut(&category) {
                record.update(Some(event));
            }
        }
    }

    /// Change a descriptive field and note the change.
    ///
    /// Changing `name` also renames the owner, so rebuilt records keep the
    /// new name. This is the only path that keeps the two in step; a bare
    /// [`MetadataRecord::change`] of `name` leaves the owner alone.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::CategoryNotFound`] if the descriptive record
    /// was never built, or any error of [`MetadataRecord::change`].
    pub fn describe(&mut self, key: &str, value: impl Into<Value>) -> Result<(), MetadataError> {
        let value = value.into();
        let record = self
            .records
            .get_mut(&Category::Descriptive)
            .ok_or_else(|| MetadataError::CategoryNotFound(Category::Descriptive.to_string()))?;
        record.change(key, value.clone())?;

        // `change` only accepts a non-empty string for the name
        if let (NAME_KEY, Some(name)) = (key, value.as_str()) {
            self.owner.set_name(name);
        }
        self.touch(&format!("{} changed", key));
        Ok(())
    }

    /// All records as one JSON object keyed by category.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        for (category, record) in &self.records {
            map.insert(category.key().to_string(), Value::Object(record.snapshot()));
        }
        Value::Object(map)
    }

    /// Pretty-printed JSON of every record.
    pub fn to_json(&self) -> Result<String, MetadataError> {
        Ok(serde_json::to_string_pretty(&self.to_value())?)
    }

    /// Print each category and its field names.
    pub fn print_types(&self, verbosity: Verbosity) {
        for (category, record) in &self.records {
            let keys: Vec<&str> = record.keys().collect();
            output::print(format!("{}: {}", category, keys.join(", ")), verbosity);
        }
    }

    /// Print every record.
    pub fn print(&self, verbosity: Verbosity) {
        output::print(self, verbosity);
    }

    fn resolve(&self, query: &str) -> Result<Category, MetadataError> {
        let needle = query.to_lowercase();
        let matches: Vec<Category> = self
            .records
            .keys()
            .copied()
            .filter(|c| c.key().contains(&needle))
            .collect();

        match matches.as_slice() {
            [] => Err(MetadataError::CategoryNotFound(query.to_string())),
            [one] => Ok(*one),
            many => Err(MetadataError::AmbiguousCategory {
                query: query.to_string(),
                matches: many.iter().map(|c| c.key().to_string()).collect(),
            }),
        }
    }
}

impl fmt::Display for MetadataComposite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({})", self.owner.name(), self.owner.class())?;
        for record in self.records.values() {
            write!(f, "{}", record)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn composite() -> MetadataComposite {
        MetadataComposite::built(Owner::new("sf_listings", "DataSet"))
    }

    mod get {
        use super::*;

        #[test]
        fn substring_case_insensitive() {
            let c = composite();
            assert_eq!(c.get("admin").unwrap().category(), Category::Administrative);
            assert_eq!(c.get("DESC").unwrap().category(), Category::Descriptive);
            assert_eq!(c.get("Tech").unwrap().category(), Category::Technical);
            assert_eq!(c.get("process").unwrap().category(), Category::Process);
        }

        #[test]
        fn no_match() {
            assert!(matches!(
                composite().get("financial"),
                Err(MetadataError::CategoryNotFound(_))
            ));
        }

        #[test]
        fn ambiguous_lists_matches() {
            // "ive" is in administrative and descriptive
            match composite().get("ive") {
                Err(MetadataError::AmbiguousCategory { matches, .. }) => {
                    assert_eq!(matches, vec!["administrative", "descriptive"]);
                }
                other => panic!("expected ambiguity, got {:?}", other),
            }
        }

        #[test]
        fn unbuilt_category_not_found() {
            let mut c = MetadataComposite::new(Owner::new("x", "DataSet"));
            c.build_desc();
            assert!(c.get("admin").is_err());
            assert_eq!(c.len(), 1);
        }
    }

    mod build {
        use super::*;

        #[test]
        fn all_four() {
            let c = composite();
            assert_eq!(c.len(), 4);
            let cats: Vec<_> = c.categories().collect();
            assert_eq!(cats, Category::ALL.to_vec());
        }

        #[test]
        fn rebuild_replaces_record() {
            let mut c = composite();
            c.get_mut("desc").unwrap().add("source", "airbnb").unwrap();
            c.build_desc();
            assert!(!c.get("desc").unwrap().contains("source"));
            assert_eq!(c.len(), 4);
        }

        #[test]
        fn rebuild_admin_assigns_new_id() {
            let mut c = composite();
            let first = c.get("admin").unwrap().get_str("id").unwrap().to_string();
            c.build_admin();
            assert_ne!(c.get("admin").unwrap().get_str("id").unwrap(), first);
        }
    }

    mod describe {
        use super::*;

        #[test]
        fn renames_owner_and_touches() {
            let mut c = composite();
            c.describe("name", "sf_2019").unwrap();

            assert_eq!(c.get("desc").unwrap().name(), "sf_2019");
            assert_eq!(c.owner().name(), "sf_2019");
            assert_eq!(c.get("admin").unwrap().updates(), 1);
            assert_eq!(c.get("process").unwrap().updates(), 1);
            assert_eq!(c.get("tech").unwrap().updates(), 0);
        }

        #[test]
        fn unknown_key_errors() {
            let mut c = composite();
            assert!(c.describe("colour", "red").is_err());
            assert!(c.get("admin").unwrap().is_fresh());
        }

        #[test]
        fn rejects_non_string_name() {
            let mut c = composite();
            let err = c.describe("name", 42).unwrap_err();

            assert!(matches!(err, MetadataError::InvalidName { .. }));
            assert_eq!(c.get("desc").unwrap().name(), "sf_listings");
            assert_eq!(c.owner().name(), "sf_listings");
            assert!(c.get("admin").unwrap().is_fresh());
            assert!(c.describe("name", "").is_err());
        }

        #[test]
        fn record_level_rename_leaves_owner() {
            let mut c = composite();
            c.get_mut("desc").unwrap().change("name", "draft").unwrap();
            assert_eq!(c.owner().name(), "sf_listings");
        }
    }

    #[test]
    fn update_all_counts_each_record() {
        let mut c = composite();
        c.update_all(Some("checkpoint"));
        for category in Category::ALL {
            assert_eq!(c.record(category).unwrap().updates(), 1);
        }
    }

    #[test]
    fn json_keyed_by_category() {
        let json: Value = serde_json::from_str(&composite().to_json().unwrap()).unwrap();
        assert_eq!(json["descriptive"]["name"], "sf_listings");
        assert_eq!(json["administrative"]["updates"], 0);
    }

    #[test]
    fn display_has_every_section() {
        let out = composite().to_string();
        for category in Category::ALL {
            assert!(out.contains(&format!("[{}]", category)));
        }
    }
}
