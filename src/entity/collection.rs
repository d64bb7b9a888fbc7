//! entity::collection
//!
//! An ordered, keyed group of datasets.

use super::{DataSet, Entity, EntityError};
use crate::core::metadata::{MetadataComposite, Owner};
use crate::core::table::Table;

/// An ordered group of datasets.
///
/// Members are keyed `<class>_<name>` in lower case, so a dataset named
/// `sf_listings` is stored under `dataset_sf_listings`. Keys are fixed
/// when a member is added; renaming the dataset afterwards does not
/// re-key it.
#[derive(Debug, Clone, PartialEq)]
pub struct DataCollection {
    metadata: MetadataComposite,
    members: Vec<(String, DataSet)>,
}

impl DataCollection {
    pub fn new(name: &str) -> Self {
        Self::with_owner(Owner::new(name, "DataCollection"))
    }

    pub fn with_owner(owner: Owner) -> Self {
        Self {
            metadata: MetadataComposite::built(owner),
            members: Vec::new(),
        }
    }

    /// The key a dataset would be stored under.
    pub fn member_key(member: &DataSet) -> String {
        format!("{}_{}", member.class(), member.name()).to_lowercase()
    }

    /// Add a dataset, returning its key.
    ///
    /// # Errors
    ///
    /// Returns [`EntityError::DuplicateMember`] if the key is taken; the
    /// existing member is kept.
    pub fn add(&mut self, member: DataSet) -> Result<String, EntityError> {
        let key = Self::member_key(&member);
        if self.position(&key).is_some() {
            return Err(EntityError::DuplicateMember(key));
        }
        self.metadata.touch(&format!("added {}", key));
        self.members.push((key.clone(), member));
        Ok(key)
    }

    /// Replace the dataset stored under its key, returning the old one.
    ///
    /// # Errors
    ///
    /// Returns [`EntityError::MissingMember`] if no member has that key.
    pub fn change(&mut self, member: DataSet) -> Result<DataSet, EntityError> {
        let key = Self::member_key(&member);
        let index = self
            .position(&key)
            .ok_or_else(|| EntityError::MissingMember(key.clone()))?;
        self.metadata.touch(&format!("changed {}", key));
        Ok(std::mem::replace(&mut self.members[index].1, member))
    }

    /// Remove a member by key.
    ///
    /// Removing a missing key logs a warning and returns `None`.
    pub fn remove(&mut self, key: &str) -> Option<DataSet> {
        let Some(index) = self.position(key) else {
            tracing::warn!(collection = %self.name(), key, "no such member to remove");
            return None;
        };
        self.metadata.touch(&format!("removed {}", key));
        Some(self.members.remove(index).1)
    }

    pub fn get_member(&self, key: &str) -> Option<&DataSet> {
        self.position(key).map(|i| &self.members[i].1)
    }

    pub fn get_member_mut(&mut self, key: &str) -> Option<&mut DataSet> {
        let index = self.position(key)?;
        Some(&mut self.members[index].1)
    }

    /// Member keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|(key, _)| key.as_str())
    }

    pub fn members(&self) -> impl Iterator<Item = &DataSet> {
        self.members.iter().map(|(_, member)| member)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Stack every member's table, in insertion order.
    ///
    /// # Errors
    ///
    /// - [`EntityError::EmptyCollection`] if there are no members
    /// - [`EntityError::NoTable`] if a member has not loaded its table
    /// - [`EntityError::Table`] if the members' columns differ
    pub fn merge(&self) -> Result<Table, EntityError> {
        let mut members = self.members.iter();
        let Some((first_key, first)) = members.next() else {
            return Err(EntityError::EmptyCollection(self.name().to_string()));
        };

        let mut merged = first
            .table()
            .cloned()
            .ok_or_else(|| EntityError::NoTable(first_key.clone()))?;
        for (key, member) in members {
            let table = member
                .table()
                .ok_or_else(|| EntityError::NoTable(key.clone()))?;
            merged.extend(table)?;
        }
        tracing::debug!(
            collection = %self.name(),
            members = self.members.len(),
            rows = merged.n_rows(),
            "merged tables"
        );
        Ok(merged)
    }

    pub fn lock_all(&mut self) {
        for (_, member) in &mut self.members {
            member.lock();
        }
    }

    pub fn unlock_all(&mut self) {
        for (_, member) in &mut self.members {
            member.unlock();
        }
    }

    /// One row per member: key, name, version, rows and lock state.
    pub fn members_summary(&self) -> Table {
        let mut summary = Table::new(["key", "name", "version", "rows", "locked"])
            .unwrap_or_default();
        for (key, member) in &self.members {
            let rows = member
                .table()
                .map(|t| t.n_rows().to_string())
                .unwrap_or_default();
            let row = [
                key.clone(),
                member.name().to_string(),
                member.version().to_string(),
                rows,
                member.is_locked().to_string(),
            ];
            if let Err(e) = summary.push_row(row) {
                tracing::warn!(key = %key, error = %e, "skipping summary row");
            }
        }
        summary
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.members.iter().position(|(k, _)| k == key)
    }
}

impl Entity for DataCollection {
    fn metadata(&self) -> &MetadataComposite {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut MetadataComposite {
        &mut self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(name: &str, ids: &[&str]) -> DataSet {
        let mut table = Table::new(["id"]).unwrap();
        for id in ids {
            table.push_row([*id]).unwrap();
        }
        let mut ds = DataSet::new(name);
        ds.set_table(table).unwrap();
        ds
    }

    mod add {
        use super::*;

        #[test]
        fn keys_by_class_and_name() {
            let mut c = DataCollection::new("listings");
            let key = c.add(dataset("SF", &["1"])).unwrap();
            assert_eq!(key, "dataset_sf");
            assert_eq!(c.len(), 1);
            assert_eq!(c.metadata().get("admin").unwrap().updates(), 1);
        }

        #[test]
        fn duplicate_keeps_original() {
            let mut c = DataCollection::new("listings");
            c.add(dataset("sf", &["1"])).unwrap();
            let err = c.add(dataset("sf", &["2", "3"])).unwrap_err();

            assert!(matches!(err, EntityError::DuplicateMember(k) if k == "dataset_sf"));
            let kept = c.get_member("dataset_sf").unwrap();
            assert_eq!(kept.table().unwrap().n_rows(), 1);
        }
    }

    mod change {
        use super::*;

        #[test]
        fn replaces_member() {
            let mut c = DataCollection::new("listings");
            c.add(dataset("sf", &["1"])).unwrap();
            let old = c.change(dataset("sf", &["1", "2"])).unwrap();

            assert_eq!(old.table().unwrap().n_rows(), 1);
            assert_eq!(c.get_member("dataset_sf").unwrap().table().unwrap().n_rows(), 2);
        }

        #[test]
        fn missing_member() {
            let mut c = DataCollection::new("listings");
            assert!(matches!(
                c.change(dataset("sf", &[])),
                Err(EntityError::MissingMember(_))
            ));
        }
    }

    mod remove {
        use super::*;

        #[test]
        fn present_and_absent() {
            let mut c = DataCollection::new("listings");
            c.add(dataset("sf", &["1"])).unwrap();

            assert!(c.remove("dataset_nyc").is_none());
            assert!(c.remove("dataset_sf").is_some());
            assert!(c.is_empty());
            assert_eq!(c.metadata().get("admin").unwrap().updates(), 2);
        }
    }

    mod merge {
        use super::*;

        #[test]
        fn stacks_in_order() {
            let mut c = DataCollection::new("listings");
            c.add(dataset("sf", &["1", "2"])).unwrap();
            c.add(dataset("nyc", &["3"])).unwrap();

            let merged = c.merge().unwrap();
            assert_eq!(merged.column("id").unwrap(), vec!["1", "2", "3"]);
        }

        #[test]
        fn empty_collection() {
            let c = DataCollection::new("listings");
            assert!(matches!(c.merge(), Err(EntityError::EmptyCollection(_))));
        }

        #[test]
        fn member_without_table() {
            let mut c = DataCollection::new("listings");
            c.add(dataset("sf", &["1"])).unwrap();
            c.add(DataSet::new("nyc")).unwrap();
            assert!(matches!(c.merge(), Err(EntityError::NoTable(k)) if k == "dataset_nyc"));
        }

        #[test]
        fn mismatched_columns() {
            let mut c = DataCollection::new("listings");
            c.add(dataset("sf", &["1"])).unwrap();
            let mut other = DataSet::new("nyc");
            other.set_table(Table::new(["price"]).unwrap()).unwrap();
            c.add(other).unwrap();
            assert!(matches!(c.merge(), Err(EntityError::Table(_))));
        }
    }

    #[test]
    fn lock_all_locks_members() {
        let mut c = DataCollection::new("listings");
        c.add(dataset("sf", &["1"])).unwrap();
        c.add(dataset("nyc", &["2"])).unwrap();

        c.lock_all();
        assert!(c.members().all(DataSet::is_locked));
        c.unlock_all();
        assert!(!c.members().any(DataSet::is_locked));
    }

    #[test]
    fn summary_has_a_row_per_member() {
        let mut c = DataCollection::new("listings");
        c.add(dataset("sf", &["1", "2"])).unwrap();
        c.add(DataSet::new("nyc")).unwrap();

        let summary = c.members_summary();
        assert_eq!(summary.n_rows(), 2);
        assert_eq!(summary.column("rows").unwrap(), vec!["2", ""]);
        assert_eq!(summary.column("key").unwrap(), vec!["dataset_sf", "dataset_nyc"]);
    }
}
