//! Persistence tests for the shared config store

use authprobe::store::ConfigStore;
use tempfile::TempDir;

#[test]
fn absent_key_returns_none() {
    let dir = TempDir::new().expect("tempdir");
    let store = ConfigStore::open(dir.path().join("secrets.json")).expect("open");
    assert!(store.get("access_token").is_none());
    assert!(store.is_empty());
}

#[test]
fn set_then_get_round_trips() {
    let dir = TempDir::new().expect("tempdir");
    let mut store = ConfigStore::open(dir.path().join("secrets.json")).expect("open");

    store.set("access_token", "abc").expect("set");
    assert_eq!(store.get("access_token"), Some("abc"));
}

#[test]
fn values_survive_reopen() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("secrets.json");

    let mut store = ConfigStore::open(&path).expect("open");
    store.set("refresh_token", "ref-1").expect("set");
    drop(store);

    let store = ConfigStore::open(&path).expect("reopen");
    assert_eq!(store.get("refresh_token"), Some("ref-1"));
}

#[test]
fn set_preserves_other_keys() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("secrets.json");

    let mut store = ConfigStore::open(&path).expect("open");
    store.set("access_token", "abc").expect("set");
    store.set("my_user_id", "7").expect("set");

    let mut store = ConfigStore::open(&path).expect("reopen");
    store.set("access_token", "fresh").expect("overwrite");

    let store = ConfigStore::open(&path).expect("reopen again");
    assert_eq!(store.get("access_token"), Some("fresh"));
    assert_eq!(store.get("my_user_id"), Some("7"));
}

#[test]
fn set_merges_keys_written_by_another_instance() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("secrets.json");

    let mut first = ConfigStore::open(&path).expect("open first");
    let mut second = ConfigStore::open(&path).expect("open second");

    second.set("target_user_id", "42").expect("set via second");
    first.set("access_token", "abc").expect("set via first");

    let store = ConfigStore::open(&path).expect("reopen");
    assert_eq!(store.get("access_token"), Some("abc"));
    assert_eq!(store.get("target_user_id"), Some("42"));
}

#[test]
fn file_is_a_flat_string_map() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("secrets.json");

    let mut store = ConfigStore::open(&path).expect("open");
    store.set("access_token", "abc").expect("set");

    let content = std::fs::read_to_string(&path).expect("read");
    let parsed: std::collections::BTreeMap<String, String> =
        serde_json::from_str(&content).expect("flat string map");
    assert_eq!(parsed.get("access_token").map(String::as_str), Some("abc"));
}

#[test]
fn in_memory_store_never_touches_disk() {
    let mut store = ConfigStore::in_memory();
    store.set("access_token", "abc").expect("set");
    assert_eq!(store.get("access_token"), Some("abc"));
    assert!(store.path().is_none());
}
