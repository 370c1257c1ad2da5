use record_store::{default_records, Record, RecordStore};
use std::path::Path;

fn sorted(mut records: Vec<Record>) -> Vec<Record> {
    records.sort_by_key(|r| r.id);
    records
}

fn assert_default_seeded(path: &Path) {
    let store = RecordStore::open(path).unwrap();
    assert_eq!(sorted(store.list()), default_records());
    assert_eq!(store.last_issued_id(), 5);

    // The seed set is written straight back out.
    let on_disk: Vec<Record> = serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap();
    assert_eq!(sorted(on_disk), default_records());
}

// ---- fallback ---------------------------------------------------------------

#[test]
fn missing_file_seeds_defaults() {
    let dir = tempfile::tempdir().unwrap();
    assert_default_seeded(&dir.path().join("articles.json"));
}

#[test]
fn missing_directory_is_created() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Data").join("articles.json");
    assert_default_seeded(&path);
    assert!(path.exists());
}

#[test]
fn empty_and_blank_files_seed_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("articles.json");
    std::fs::write(&path, "").unwrap();
    assert_default_seeded(&path);

    std::fs::write(&path, "  \r\n").unwrap();
    assert_default_seeded(&path);
}

#[test]
fn invalid_json_seeds_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("articles.json");
    for garbage in [
        "{not json",
        r#"[{"id": 1, "title": "half"#,
        r#"{"id": 1, "title": "a", "text": "b"}"#,
        r#"[{"id": -3, "title": "a", "text": "b"}]"#,
        r#"[{"id": 1, "title": "a", "text": "b"}, {"id": 1, "title": "c", "text": "d"}]"#,
    ] {
        std::fs::write(&path, garbage).unwrap();
        assert_default_seeded(&path);
    }
}

#[test]
fn empty_array_seeds_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("articles.json");
    std::fs::write(&path, "[]").unwrap();
    assert_default_seeded(&path);
}

#[test]
fn unreadable_path_still_opens() {
    // The backing path is a directory: reads and writes both fail.
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("articles.json");
    std::fs::create_dir(&path).unwrap();
    let store = RecordStore::open(&path).unwrap();
    assert_eq!(sorted(store.list()), default_records());
    assert_eq!(store.persist_failures(), 1);
}

// ---- reload -----------------------------------------------------------------

#[test]
fn restart_reproduces_last_state() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("articles.json");
    let expected = {
        let store = RecordStore::open(&path).unwrap();
        store.create("A", "B").unwrap();
        store.create("C", "D").unwrap();
        store.update(3, "new title", "new body").unwrap();
        store.delete(7).unwrap();
        store.delete(1).unwrap();
        sorted(store.list())
    };

    let reopened = RecordStore::open(&path).unwrap();
    assert_eq!(sorted(reopened.list()), expected);
    // Allocator resumes from the highest live id on disk.
    assert_eq!(reopened.last_issued_id(), 6);
}

#[test]
fn loaded_file_primes_allocator_from_max_id() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("articles.json");
    std::fs::write(
        &path,
        r#"[{"id": 40, "title": "a", "text": "b"}, {"id": 12, "title": "c", "text": "d"}]"#,
    )
    .unwrap();

    let store = RecordStore::open(&path).unwrap();
    assert_eq!(store.len(), 2);
    assert_eq!(store.create("e", "f").unwrap().id, 41);
}

// ---- normalization ----------------------------------------------------------

#[test]
fn pascal_case_file_is_rewritten_canonically() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("articles.json");
    std::fs::write(
        &path,
        r#"[{"Id": 2, "Title": "Zwei", "Text": "Grüße"}, {"id": 9, "TITLE": "Nine", "text": "n"}]"#,
    )
    .unwrap();

    let store = RecordStore::open(&path).unwrap();
    assert_eq!(
        sorted(store.list()),
        vec![Record::new(2, "Zwei", "Grüße"), Record::new(9, "Nine", "n")]
    );

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(!raw.contains("\"Id\""));
    assert!(!raw.contains("\"Title\""));
    assert!(raw.contains("\"id\": 2"));
    assert!(raw.contains("\"text\": \"Grüße\""));
}

#[test]
fn no_temp_file_left_behind() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("articles.json");
    let store = RecordStore::open(&path).unwrap();
    store.create("a", "b").unwrap();
    assert!(!dir.path().join("articles.json.tmp").exists());
}

#[test]
fn entry_missing_text_loads_without_losing_others() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("articles.json");
    std::fs::write(
        &path,
        r#"[{"Id": 40, "Title": "keep me", "Text": "x"}, {"Id": 41, "Title": "no text"}]"#,
    )
    .unwrap();

    let store = RecordStore::open(&path).unwrap();
    assert_eq!(
        sorted(store.list()),
        vec![Record::new(40, "keep me", "x"), Record::new(41, "no text", "")]
    );
    assert_eq!(store.last_issued_id(), 41);

    let on_disk: Vec<Record> = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(sorted(on_disk), sorted(store.list()));
}

#[test]
fn failed_persist_leaves_no_temp_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("articles.json");
    std::fs::create_dir(&path).unwrap();
    let store = RecordStore::open(&path).unwrap();
    store.create("a", "b").unwrap();
    assert_eq!(store.persist_failures(), 2);
    assert!(!dir.path().join("articles.json.tmp").exists());
}
