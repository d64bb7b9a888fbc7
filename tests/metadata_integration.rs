//! Integration tests for metadata records and entities.
//!
//! These tests follow one dataset through its life: built, described,
//! loaded, saved and grouped into a collection.

use std::fs;

use serde_json::Value;
use tempfile::TempDir;

use datastudio::core::metadata::{Category, MetadataComposite, MetadataError, Owner};
use datastudio::entity::{DataCollection, DataSet, DataSourceFile, DataStoreFile, Entity};

fn sf_listings() -> MetadataComposite {
    MetadataComposite::built(Owner::new("sf_listings", "DataSet").with_creator("analyst"))
}

// =============================================================================
// Records
// =============================================================================

#[test]
fn built_composite_has_all_categories() {
    let meta = sf_listings();

    let categories: Vec<Category> = meta.categories().collect();
    assert_eq!(categories, Category::ALL.to_vec());

    let admin = meta.get("admin").unwrap();
    assert_eq!(admin.get_str("creator"), Some("analyst"));
    assert!(admin.get_str("id").is_some());

    let desc = meta.get("Desc").unwrap();
    assert_eq!(desc.name(), "sf_listings");
    assert_eq!(desc.get_str("class"), Some("DataSet"));
    assert_eq!(
        desc.get("keywords"),
        Some(&serde_json::json!(["sf_listings", "DataSet"]))
    );

    for record in Category::ALL.iter().map(|c| meta.record(*c).unwrap()) {
        assert!(record.is_fresh());
    }
}

#[test]
fn update_counts_but_keeps_identity() {
    let mut meta = sf_listings();
    let id = meta.get("admin").unwrap().get_str("id").unwrap().to_string();
    let created = meta.get("admin").unwrap().get_str("created").unwrap().to_string();

    let admin = meta.get_mut("admin").unwrap();
    admin.update(None);
    admin.update(Some("reviewed"));

    let admin = meta.get("admin").unwrap();
    assert_eq!(admin.updates(), 2);
    assert_eq!(admin.get_str("id"), Some(id.as_str()));
    assert_eq!(admin.get_str("created"), Some(created.as_str()));
}

#[test]
fn add_change_remove() {
    let mut meta = sf_listings();
    let desc = meta.get_mut("desc").unwrap();

    desc.add("source", "insideairbnb.com").unwrap();
    let err = desc.add("source", "elsewhere").unwrap_err();
    assert!(matches!(err, MetadataError::DuplicateKey { .. }));
    assert_eq!(desc.get_str("source"), Some("insideairbnb.com"));

    let old = desc.change("source", "insideairbnb.com/sf").unwrap();
    assert_eq!(old, Value::from("insideairbnb.com"));
    assert!(matches!(
        desc.change("license", "CC0"),
        Err(MetadataError::MissingKey { .. })
    ));

    assert_eq!(desc.remove("license").unwrap(), None);
    assert!(desc.remove("source").unwrap().is_some());

    // add, change, remove; failures do not count
    assert_eq!(desc.updates(), 3);
}

#[test]
fn reserved_keys_are_protected() {
    let mut meta = sf_listings();
    let admin = meta.get_mut("admin").unwrap();
    assert!(matches!(
        admin.change("id", "other"),
        Err(MetadataError::ReservedKey { .. })
    ));
    assert!(matches!(
        admin.add("updates", 7),
        Err(MetadataError::ReservedKey { .. })
    ));
}

#[test]
fn lookup_by_fragment() {
    let meta = sf_listings();
    assert_eq!(meta.get("TECH").unwrap().category(), Category::Technical);
    assert!(matches!(
        meta.get("x"),
        Err(MetadataError::CategoryNotFound(_))
    ));
    assert!(matches!(
        meta.get("e"),
        Err(MetadataError::AmbiguousCategory { .. })
    ));
}

#[test]
fn json_export_is_keyed_by_category() {
    let meta = sf_listings();
    let value: Value = serde_json::from_str(&meta.to_json().unwrap()).unwrap();

    let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["administrative", "descriptive", "technical", "process"]);
    assert_eq!(value["descriptive"]["name"], "sf_listings");
}

// =============================================================================
// Entities
// =============================================================================

#[test]
fn dataset_lifecycle() {
    let temp = TempDir::new().unwrap();
    let raw = temp.path().join("raw/sf_listings.csv");
    fs::create_dir_all(raw.parent().unwrap()).unwrap();
    fs::write(&raw, "id,price\n1,120\n2,95\n").unwrap();
    let interim = temp.path().join("interim/sf_listings.csv.gz");

    let mut ds = DataSet::new("sf_listings")
        .with_source(DataSourceFile::new(&raw))
        .with_store(DataStoreFile::new(&interim));
    ds.set_description("Airbnb listings, San Francisco").unwrap();

    assert_eq!(ds.load().unwrap().n_rows(), 2);
    assert_eq!(ds.save().unwrap(), interim);

    let store = ds.store().unwrap();
    let sha = store.metadata().get("tech").unwrap().get_str("sha256").unwrap();
    assert_eq!(sha.len(), 64);

    // with_source, with_store, set_description, load, save
    assert_eq!(ds.metadata().get("admin").unwrap().updates(), 5);
    let log = ds.metadata().get("process").unwrap().get("log").unwrap();
    assert_eq!(log.as_array().unwrap().len(), 6);
    assert_eq!(ds.description(), "Airbnb listings, San Francisco");
}

#[test]
fn collection_merges_members() {
    let temp = TempDir::new().unwrap();
    let mut collection = DataCollection::new("listings");

    for (city, rows) in [("sf", "1,120\n2,95\n"), ("nyc", "3,200\n")] {
        let path = temp.path().join(format!("{}.csv", city));
        fs::write(&path, format!("id,price\n{}", rows)).unwrap();
        let mut ds = DataSet::new(city).with_source(DataSourceFile::new(path));
        ds.load().unwrap();
        collection.add(ds).unwrap();
    }

    let keys: Vec<&str> = collection.keys().collect();
    assert_eq!(keys, vec!["dataset_sf", "dataset_nyc"]);

    let merged = collection.merge().unwrap();
    assert_eq!(merged.column("id").unwrap(), vec!["1", "2", "3"]);

    collection.lock_all();
    assert!(collection.get_member("dataset_sf").unwrap().is_locked());
}
