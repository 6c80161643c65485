use std::fs;
use std::path::Path;

use bookmark_duper_core::{
    BookmarkStore, ChromiumBookmarks, DedupeEngine, DeletionStatus, EngineState, ItemKind,
    ScanOutcome, SilentReporter,
};
use serde_json::{json, Value};
use tempfile::tempdir;

const WEBKIT_EPOCH_OFFSET_MILLIS: i64 = 11_644_473_600_000;

/// Unix millis to the profile file's microseconds-since-1601 string.
fn webkit(unix_millis: i64) -> String {
    ((unix_millis + WEBKIT_EPOCH_OFFSET_MILLIS) * 1000).to_string()
}

fn url(id: &str, name: &str, href: &str, added: i64) -> Value {
    json!({ "id": id, "name": name, "type": "url", "url": href, "date_added": webkit(added) })
}

fn folder(id: &str, name: &str, added: i64, children: Vec<Value>) -> Value {
    json!({ "id": id, "name": name, "type": "folder", "date_added": webkit(added), "children": children })
}

/// Layout:
///   Bookmarks bar/
///     Rust            https://rust-lang.org   (t=1000)
///     Projects/       (t=500)   ← older duplicate folder
///       Tokio         https://tokio.rs        (t=600)
///   Other bookmarks/
///     Rust again      https://rust-lang.org   (t=2000)  ← newest, kept
///     Projects/       (t=900)   ← newest folder, kept
///       Tokio         https://tokio.rs        (t=950)   ← newest, kept
///     Serde           https://serde.rs        (t=10)
fn write_profile(dir: &Path) -> std::path::PathBuf {
    let doc = json!({
        "checksum": "feedface",
        "version": 1,
        "roots": {
            "bookmark_bar": folder("1", "Bookmarks bar", 1, vec![
                url("10", "Rust", "https://rust-lang.org", 1000),
                folder("11", "Projects", 500, vec![
                    url("12", "Tokio", "https://tokio.rs", 600),
                ]),
            ]),
            "other": folder("2", "Other bookmarks", 1, vec![
                url("20", "Rust again", "https://rust-lang.org", 2000),
                folder("21", "Projects", 900, vec![
                    url("22", "Tokio", "https://tokio.rs", 950),
                ]),
                url("23", "Serde", "https://serde.rs", 10),
            ]),
            "synced": folder("3", "Mobile bookmarks", 1, vec![]),
        }
    });
    let path = dir.join("Bookmarks");
    fs::write(&path, serde_json::to_string_pretty(&doc).unwrap()).unwrap();
    path
}

#[test]
fn test_full_pipeline_preview() {
    let tmp = tempdir().unwrap();
    let path = write_profile(tmp.path());
    let store = ChromiumBookmarks::open(&path).unwrap();
    let mut engine = DedupeEngine::new();

    let report = match engine.scan(&store, &SilentReporter).unwrap() {
        ScanOutcome::Duplicates(report) => report,
        ScanOutcome::NoDuplicates => panic!("expected duplicates"),
    };

    assert_eq!(report.bookmarks_scanned, 5);
    assert_eq!(report.folders_scanned, 5);
    assert_eq!(report.duplicate_bookmarks, 2);
    assert_eq!(report.duplicate_folders, 1);
    assert_eq!(report.total_duplicates(), 3);

    let bookmark_keys: Vec<&str> = report
        .groups_of(ItemKind::Bookmark)
        .map(|g| g.key.as_str())
        .collect();
    assert_eq!(bookmark_keys, vec!["https://rust-lang.org", "https://tokio.rs"]);

    let projects = report.groups_of(ItemKind::Folder).next().unwrap();
    assert_eq!(projects.key, "Projects");
    assert_eq!(projects.keep.id.as_str(), "21");
    assert_eq!(projects.keep.child_count, 1);
    assert_eq!(projects.keep.date_added, Some(900));
    assert_eq!(projects.delete[0].id.as_str(), "11");

    // Previewing must not touch the file.
    let on_disk: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(on_disk["checksum"], "feedface");
}

#[test]
fn test_full_pipeline_with_deletion() {
    let tmp = tempdir().unwrap();
    let path = write_profile(tmp.path());
    let mut store = ChromiumBookmarks::open(&path).unwrap();
    let mut engine = DedupeEngine::new();

    engine.scan(&store, &SilentReporter).unwrap();
    let outcome = engine.confirm(&mut store, &SilentReporter);

    assert_eq!(outcome.deleted, 3);
    assert_eq!(outcome.failed, 0);
    assert_eq!(outcome.status(), DeletionStatus::Success);
    assert_eq!(engine.state(), EngineState::Idle);
    assert!(engine.pending().is_empty());

    store.save(true).unwrap();
    assert!(tmp.path().join("Bookmarks.bak").exists());

    let saved: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(saved["roots"]["bookmark_bar"]["children"], json!([]));
    let other: Vec<&str> = saved["roots"]["other"]["children"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_str().unwrap())
        .collect();
    assert_eq!(other, vec!["20", "21", "23"]);
}

#[test]
fn test_folder_removal_cascades_into_kept_items() {
    let tmp = tempdir().unwrap();
    let path = write_profile(tmp.path());

    // Make the bar's Tokio the newest copy while its folder stays the older
    // one: the folder removal takes the kept bookmark with it, and the other
    // Tokio is marked too.
    let mut doc: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    doc["roots"]["bookmark_bar"]["children"][1]["children"][0]["date_added"] = json!(webkit(5000));
    doc["roots"]["other"]["children"][1]["children"][0]["date_added"] = json!(webkit(100));
    doc["roots"]["bookmark_bar"]["children"][1]["children"]
        .as_array_mut()
        .unwrap()
        .push(url("13", "Serde", "https://serde.rs", 1));
    fs::write(&path, doc.to_string()).unwrap();

    let mut store = ChromiumBookmarks::open(&path).unwrap();
    let mut engine = DedupeEngine::new();
    engine.scan(&store, &SilentReporter).unwrap();

    // Marked: bookmark 10 (rust), bookmark 22 (tokio), bookmark 13 (serde,
    // inside folder 11), folder 11. Bookmark groups come first, so 13 is
    // removed before its folder.
    assert_eq!(engine.pending().len(), 4);
    let outcome = engine.confirm(&mut store, &SilentReporter);
    assert_eq!(outcome.deleted, 4);
    assert_eq!(outcome.failed, 0);

    // The kept Tokio (12) lived inside folder 11 and went with it.
    let tree = store.get_full_tree().unwrap();
    let flat = bookmark_duper_core::scanner::flatten_tree(&tree);
    assert!(flat.bookmarks.iter().all(|b| b.url.as_deref() != Some("https://tokio.rs")));
}

#[test]
fn test_already_removed_items_count_as_failures() {
    let tmp = tempdir().unwrap();
    let path = write_profile(tmp.path());
    let mut store = ChromiumBookmarks::open(&path).unwrap();
    let mut engine = DedupeEngine::new();

    engine.scan(&store, &SilentReporter).unwrap();

    // Something else removes the older Projects folder (and its Tokio) first.
    store
        .remove_subtree(&bookmark_duper_core::NodeId::new("11"))
        .unwrap();

    let outcome = engine.confirm(&mut store, &SilentReporter);
    assert_eq!(outcome.deleted, 1);
    assert_eq!(outcome.failed, 2);
    assert_eq!(outcome.status(), DeletionStatus::PartialFailure);
    assert!(engine.pending().is_empty());
}

#[test]
fn test_rescan_after_deletion() {
    let tmp = tempdir().unwrap();
    let path = write_profile(tmp.path());
    let mut store = ChromiumBookmarks::open(&path).unwrap();
    let mut engine = DedupeEngine::new();

    engine.scan(&store, &SilentReporter).unwrap();
    engine.confirm(&mut store, &SilentReporter);
    store.save(false).unwrap();

    let reopened = ChromiumBookmarks::open(&path).unwrap();
    let outcome = engine.scan(&reopened, &SilentReporter).unwrap();
    assert_eq!(outcome, ScanOutcome::NoDuplicates);
}

#[test]
fn test_idempotent_rescan() {
    let tmp = tempdir().unwrap();
    let path = write_profile(tmp.path());
    let store = ChromiumBookmarks::open(&path).unwrap();
    let mut engine = DedupeEngine::new();

    let first = engine.scan(&store, &SilentReporter).unwrap();
    let second = engine.scan(&store, &SilentReporter).unwrap();

    match (first, second) {
        (ScanOutcome::Duplicates(a), ScanOutcome::Duplicates(b)) => {
            assert_eq!(a.groups, b.groups);
        }
        _ => panic!("expected duplicates on both scans"),
    }
}
