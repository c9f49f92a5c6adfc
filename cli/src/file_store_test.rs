use super::*;

#[test]
fn missing_file_reads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::open(dir.path().join("prefs.json"));
    assert_eq!(store.get("theme").unwrap(), None);
}

#[test]
fn set_creates_file_and_parent_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("prefs.json");
    let mut store = FileStore::open(&path);

    store.set("theme", "dark").unwrap();

    let on_disk: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(on_disk, serde_json::json!({ "theme": "dark" }));
}

#[test]
fn set_keeps_other_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.json");
    fs::write(&path, r#"{"cart":"[]","unrelated":"x"}"#).unwrap();
    let mut store = FileStore::open(&path);

    store.set("theme", "light").unwrap();

    assert_eq!(store.get("cart").unwrap().as_deref(), Some("[]"));
    assert_eq!(store.get("unrelated").unwrap().as_deref(), Some("x"));
    assert_eq!(store.get("theme").unwrap().as_deref(), Some("light"));
}

#[test]
fn empty_file_reads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.json");
    fs::write(&path, "  \n").unwrap();
    assert_eq!(FileStore::open(&path).get("theme").unwrap(), None);
}

#[test]
fn corrupt_file_is_a_json_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.json");
    fs::write(&path, "{not json").unwrap();
    let err = FileStore::open(&path).get("theme").unwrap_err();
    assert!(matches!(err, StorageError::Json(_)));
}
