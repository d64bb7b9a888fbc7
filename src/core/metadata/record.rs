//! core::metadata::record
//!
//! A single metadata record and its category.
//!
//! # Invariants
//!
//! - Every record has a `name` and an `updates` counter. `name` is always
//!   a non-empty string: it can be changed but never removed
//! - `updates` starts at 0 and grows by exactly one per successful
//!   mutating call (`add`, `change`, `remove` of a present key, `update`)
//! - Reserved keys are never touched by callers: `updates` everywhere,
//!   plus `id` and `created` on administrative records

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::builder::{current_user, environment};
use super::MetadataError;
use crate::core::types::UtcTimestamp;

/// Key of the update counter present in every record.
pub const UPDATES_KEY: &str = "updates";

/// Key of the owner name present in every record.
pub const NAME_KEY: &str = "name";

/// The four kinds of metadata an entity carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Identity, authorship and modification history.
    Administrative,
    /// Name, description, version and keywords.
    Descriptive,
    /// Runtime environment and content facts.
    Technical,
    /// Timestamped event log.
    Process,
}

impl Category {
    /// All categories in build order.
    pub const ALL: [Category; 4] = [
        Category::Administrative,
        Category::Descriptive,
        Category::Technical,
        Category::Process,
    ];

    /// The key under which records of this category are stored.
    pub fn key(&self) -> &'static str {
        match self {
            Category::Administrative => "administrative",
            Category::Descriptive => "descriptive",
            Category::Technical => "technical",
            Category::Process => "process",
        }
    }

    fn reserved(&self) -> &'static [&'static str] {
        match self {
            Category::Administrative => &[UPDATES_KEY, "id", "created"],
            _ => &[UPDATES_KEY],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// An ordered key/value record of one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataRecord {
    #[serde(skip)]
    category: Category,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl MetadataRecord {
    /// Create a fresh record holding only `name` and `updates`.
    pub(crate) fn new(category: Category, name: &str) -> Self {
        let mut fields = Map::new();
        fields.insert(NAME_KEY.to_string(), Value::from(name));
        fields.insert(UPDATES_KEY.to_string(), Value::from(0u64));
        Self { category, fields }
    }

    /// Insert a field without bookkeeping. Used while seeding.
    pub(crate) fn seed(&mut self, key: &str, value: Value) {
        self.fields.insert(key.to_string(), value);
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn name(&self) -> &str {
        self.fields
            .get(NAME_KEY)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Number of successful mutations since construction.
    pub fn updates(&self) -> u64 {
        self.fields
            .get(UPDATES_KEY)
            .and_then(Value::as_u64)
            .unwrap_or_default()
    }

    /// Whether the record has never been mutated.
    pub fn is_fresh(&self) -> bool {
        self.updates() == 0
    }

    /// One value by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// One value by key, as a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// A copy of every field.
    pub fn snapshot(&self) -> Map<String, Value> {
        self.fields.clone()
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Insert a new key.
    ///
    /// # Errors
    ///
    /// - [`MetadataError::ReservedKey`] if `key` is reserved
    /// - [`MetadataError::DuplicateKey`] if `key` already exists; the
    ///   existing value is kept
    pub fn add(&mut self, key: &str, value: impl Into<Value>) -> Result<(), MetadataError> {
        self.check_reserved(key)?;
        if self.fields.contains_key(key) {
            return Err(MetadataError::DuplicateKey {
                category: self.category,
                key: key.to_string(),
            });
        }
        self.fields.insert(key.to_string(), value.into());
        self.bump();
        Ok(())
    }

    /// Replace the value of an existing key, returning the old value.
    ///
    /// Changing `name` here edits only this record. Use
    /// [`MetadataComposite::describe`](super::MetadataComposite::describe)
    /// to rename the owning entity.
    ///
    /// # Errors
    ///
    /// - [`MetadataError::ReservedKey`] if `key` is reserved
    /// - [`MetadataError::MissingKey`] if `key` does not exist
    /// - [`MetadataError::InvalidName`] if `key` is `name` and `value` is
    ///   not a non-empty string
    pub fn change(&mut self, key: &str, value: impl Into<Value>) -> Result<Value, MetadataError> {
        self.check_reserved(key)?;
        let value = value.into();
        if key == NAME_KEY {
            self.check_name(&value)?;
        }
        let slot = self
            .fields
            .get_mut(key)
            .ok_or_else(|| MetadataError::MissingKey {
                category: self.category,
                key: key.to_string(),
            })?;
        let old = std::mem::replace(slot, value);
        self.bump();
        Ok(old)
    }

    /// Add `key` if absent, change it otherwise.
    pub fn upsert(&mut self, key: &str, value: impl Into<Value>) -> Result<(), MetadataError> {
        if self.contains(key) {
            self.change(key, value).map(|_| ())
        } else {
            self.add(key, value)
        }
    }

    /// Remove a key, returning its value.
    ///
    /// An absent key is reported as a warning and yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// - [`MetadataError::ReservedKey`] if `key` is reserved
    /// - [`MetadataError::RequiredKey`] if `key` is `name`
    pub fn remove(&mut self, key: &str) -> Result<Option<Value>, MetadataError> {
        self.check_reserved(key)?;
        if key == NAME_KEY {
            return Err(MetadataError::RequiredKey {
                category: self.category,
                key: key.to_string(),
            });
        }
        match self.fields.shift_remove(key) {
            Some(value) => {
                self.bump();
                Ok(Some(value))
            }
            None => {
                tracing::warn!(
                    category = %self.category,
                    key,
                    "metadata key not found; nothing removed"
                );
                Ok(None)
            }
        }
    }

    /// Record an update.
    ///
    /// Increments `updates`. Administrative records also refresh
    /// `modifier` and `modified`; technical records refresh the environment
    /// snapshot; process records append a timestamped line to `log`.
    pub fn update(&mut self, event: Option<&str>) {
        let now = UtcTimestamp::now();
        match self.category {
            Category::Administrative => {
                self.seed("modifier", Value::from(current_user()));
                self.seed("modified", Value::from(now.to_string()));
            }
            Category::Technical => {
                for (key, value) in environment() {
                    self.fields.insert(key, value);
                }
            }
            Category::Process => {
                let line = format!("{} {}", now, event.unwrap_or("updated"));
                match self.fields.get_mut("log").and_then(Value::as_array_mut) {
                    Some(log) => log.push(Value::from(line)),
                    None => self.seed("log", Value::from(vec![line])),
                }
            }
            Category::Descriptive => {}
        }
        self.bump();
        tracing::debug!(
            category = %self.category,
            name = self.name(),
            updates = self.updates(),
            event = event.unwrap_or_default(),
            "metadata updated"
        );
    }

    fn bump(&mut self) {
        let next = self.updates() + 1;
        self.fields.insert(UPDATES_KEY.to_string(), Value::from(next));
    }

    fn check_name(&self, value: &Value) -> Result<(), MetadataError> {
        match value.as_str() {
            Some(name) if !name.trim().is_empty() => Ok(()),
            _ => Err(MetadataError::InvalidName {
                category: self.category,
                found: value.to_string(),
            }),
        }
    }

    fn check_reserved(&self, key: &str) -> Result<(), MetadataError> {
        if self.category.reserved().contains(&key) {
            return Err(MetadataError::ReservedKey {
                category: self.category,
                key: key.to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for MetadataRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{}]", self.category)?;
        for (key, value) in &self.fields {
            match value {
                Value::String(s) => writeln!(f, "  {}: {}", key, s)?,
                other => writeln!(f, "  {}: {}", key, other)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(category: Category) -> MetadataRecord {
        MetadataRecord::new(category, "sf_listings")
    }

    mod add {
        use super::*;

        #[test]
        fn inserts_and_counts() {
            let mut r = record(Category::Descriptive);
            r.add("source", "airbnb").unwrap();
            assert_eq!(r.get_str("source"), Some("airbnb"));
            assert_eq!(r.updates(), 1);
        }

        #[test]
        fn duplicate_keeps_original() {
            let mut r = record(Category::Descriptive);
            r.add("source", "airbnb").unwrap();

            let err = r.add("source", "zillow").unwrap_err();
            assert!(matches!(err, MetadataError::DuplicateKey { .. }));
            assert_eq!(r.get_str("source"), Some("airbnb"));
            assert_eq!(r.updates(), 1);
        }

        #[test]
        fn reserved_rejected() {
            let mut r = record(Category::Technical);
            assert!(matches!(
                r.add("updates", 5),
                Err(MetadataError::ReservedKey { .. })
            ));
        }
    }

    mod change {
        use super::*;

        #[test]
        fn returns_old_value() {
            let mut r = record(Category::Descriptive);
            let old = r.change("name", "sf_2019").unwrap();
            assert_eq!(old, Value::from("sf_listings"));
            assert_eq!(r.name(), "sf_2019");
            assert_eq!(r.updates(), 1);
        }

        #[test]
        fn name_must_be_a_string() {
            let mut r = record(Category::Descriptive);
            for bad in [Value::from(42), Value::Null, Value::from("  ")] {
                assert!(matches!(
                    r.change("name", bad),
                    Err(MetadataError::InvalidName { .. })
                ));
            }
            assert_eq!(r.name(), "sf_listings");
            assert!(r.is_fresh());
        }

        #[test]
        fn missing_key_errors() {
            let mut r = record(Category::Descriptive);
            let err = r.change("never_added", 1).unwrap_err();
            assert!(matches!(err, MetadataError::MissingKey { .. }));
            assert!(r.is_fresh());
        }

        #[test]
        fn admin_id_is_reserved() {
            let mut r = record(Category::Administrative);
            r.seed("id", Value::from("abc"));
            assert!(matches!(
                r.change("id", "def"),
                Err(MetadataError::ReservedKey { .. })
            ));
            assert_eq!(r.get_str("id"), Some("abc"));
        }

        #[test]
        fn id_not_reserved_elsewhere() {
            let mut r = record(Category::Descriptive);
            r.add("id", "x").unwrap();
            r.change("id", "y").unwrap();
        }
    }

    mod remove {
        use super::*;

        #[test]
        fn present_key() {
            let mut r = record(Category::Descriptive);
            r.add("tmp", true).unwrap();
            assert_eq!(r.remove("tmp").unwrap(), Some(Value::from(true)));
            assert_eq!(r.updates(), 2);
        }

        #[test]
        fn name_is_required() {
            for category in Category::ALL {
                let mut r = record(category);
                assert!(matches!(
                    r.remove("name"),
                    Err(MetadataError::RequiredKey { .. })
                ));
                assert_eq!(r.name(), "sf_listings");
                assert!(r.is_fresh());
            }
        }

        #[test]
        fn absent_key_is_not_an_error() {
            let mut r = record(Category::Descriptive);
            assert_eq!(r.remove("nope").unwrap(), None);
            assert!(r.is_fresh());
        }

        #[test]
        fn keeps_field_order() {
            let mut r = record(Category::Descriptive);
            r.add("a", 1).unwrap();
            r.add("b", 2).unwrap();
            r.add("c", 3).unwrap();
            r.remove("b").unwrap();
            let keys: Vec<_> = r.keys().collect();
            assert_eq!(keys, vec!["name", "updates", "a", "c"]);
        }
    }

    mod update {
        use super::*;

        #[test]
        fn increments_by_one() {
            let mut r = record(Category::Descriptive);
            r.update(None);
            r.update(None);
            assert_eq!(r.updates(), 2);
            assert!(!r.is_fresh());
        }

        #[test]
        fn admin_refreshes_modified() {
            let mut r = record(Category::Administrative);
            r.update(None);
            assert!(r.get_str("modified").is_some());
            assert!(r.get_str("modifier").is_some());
        }

        #[test]
        fn process_appends_log() {
            let mut r = record(Category::Process);
            r.update(Some("loaded"));
            r.update(None);
            let log = r.get("log").and_then(Value::as_array).unwrap();
            assert_eq!(log.len(), 2);
            assert!(log[0].as_str().unwrap().ends_with(" loaded"));
            assert!(log[1].as_str().unwrap().ends_with(" updated"));
        }

        #[test]
        fn technical_refreshes_environment() {
            let mut r = record(Category::Technical);
            r.update(None);
            assert_eq!(r.get_str("os"), Some(std::env::consts::OS));
        }
    }

    #[test]
    fn serializes_fields_only() {
        let r = record(Category::Descriptive);
        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(json, r#"{"name":"sf_listings","updates":0}"#);
    }

    #[test]
    fn display_lists_fields() {
        let out = record(Category::Process).to_string();
        assert!(out.starts_with("[process]\n"));
        assert!(out.contains("  name: sf_listings\n"));
    }
}
