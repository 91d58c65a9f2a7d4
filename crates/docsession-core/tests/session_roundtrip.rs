//! End-to-end snapshot/restore tests against a temporary state directory

use docsession_core::{
    DocumentDescriptor, DocumentIdentity, InMemoryHost, InstructionKind, Manifest, OpenDocument,
    ReconstructionAction, SessionConfig, SessionStore,
};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn create_test_store() -> (SessionStore, TempDir) {
    init_tracing();
    let temp_dir = TempDir::new().unwrap();
    let config = SessionConfig::in_dir(temp_dir.path().join("state"));
    (SessionStore::from_config(&config).unwrap(), temp_dir)
}

fn cache_files(store: &SessionStore) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = fs::read_dir(store.cache().dir())
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    files.sort();
    files
}

#[test]
fn test_unsaved_and_saved_documents_survive_restart() {
    let (store, temp) = create_test_store();
    let a_txt = temp.path().join("a.txt");
    fs::write(&a_txt, "contents of a").unwrap();

    let host = InMemoryHost::new(vec![
        OpenDocument::scratch("untitled:1", "Untitled Document 1", "draft text"),
        OpenDocument::saved("file:///a.txt", "a.txt", &a_txt, "contents of a"),
    ]);

    let report = store.snapshot(&host).unwrap();
    assert_eq!(report.entries, 2);
    assert!(report.write_failures.is_empty());

    let manifest = store.try_load().unwrap();
    assert_eq!(manifest.len(), 2);

    let draft = manifest.get(&"untitled:1".into()).unwrap();
    assert!(!draft.persisted);
    assert_eq!(draft.original_path, None);
    assert_eq!(fs::read_to_string(&draft.cache_location).unwrap(), "draft text");

    let saved = manifest.get(&"file:///a.txt".into()).unwrap();
    assert!(saved.persisted);
    assert_eq!(saved.original_path.as_deref(), Some(a_txt.as_path()));
    assert_eq!(
        fs::read_to_string(&saved.cache_location).unwrap(),
        fs::read_to_string(&a_txt).unwrap()
    );

    // Next startup
    let restarted = SessionStore::from_config(&SessionConfig::in_dir(temp.path().join("state"))).unwrap();
    let plan = restarted.restore();
    assert_eq!(plan.len(), 2);

    let by_id = |id: &str| {
        plan.iter()
            .find(|i| i.identity == DocumentIdentity::from(id))
            .unwrap()
    };
    assert_eq!(
        by_id("untitled:1").action,
        ReconstructionAction::FromCacheDetached {
            content: "draft text".to_string()
        }
    );
    assert_eq!(
        by_id("file:///a.txt").action,
        ReconstructionAction::FromDisk { path: a_txt }
    );
}

#[test]
fn test_repeated_snapshot_is_byte_identical() {
    let (store, temp) = create_test_store();
    let notes = temp.path().join("notes.md");
    fs::write(&notes, "# notes").unwrap();
    let host = InMemoryHost::new(vec![
        OpenDocument::scratch("untitled:1", "Untitled 1", "one"),
        OpenDocument::scratch("untitled:2", "Untitled 2", "two"),
        OpenDocument::saved("file:///notes.md", "notes.md", &notes, "# notes, edited").modified(),
    ]);

    let first = store.snapshot(&host).unwrap();
    let first_bytes = fs::read(store.session_file()).unwrap();
    let first_files = cache_files(&store);

    let second = store.snapshot(&host).unwrap();
    let second_bytes = fs::read(store.session_file()).unwrap();

    assert_eq!(first_bytes, second_bytes);
    assert_eq!(first_files, cache_files(&store));
    assert_eq!(first_files.len(), 3);
    assert_eq!(first.reclaimed, 0);
    assert_eq!(second.reclaimed, 0);
}

#[test]
fn test_vanished_entries_are_dropped_quietly() {
    let (store, temp) = create_test_store();
    store.cache().ensure_directory().unwrap();
    let present = temp.path().join("present.txt");
    fs::write(&present, "still here").unwrap();

    let mut manifest = Manifest::new();
    manifest.insert(
        "file:///deleted.txt".into(),
        DocumentDescriptor::unsaved(
            store.cache().location_for(&"file:///deleted.txt".into()),
            Some(temp.path().join("deleted.txt")),
            "deleted.txt",
        ),
    );
    manifest.insert(
        "file:///present.txt".into(),
        DocumentDescriptor::persisted(
            store.cache().location_for(&"file:///present.txt".into()),
            &present,
            "present.txt",
        ),
    );
    store.persist(&manifest).unwrap();

    let plan = store.restore();

    assert_eq!(plan.len(), 1);
    assert_eq!(plan[0].kind(), InstructionKind::FromDisk);
    assert_eq!(plan[0].path(), Some(present.as_path()));
}

#[test]
fn test_reclaim_never_touches_live_entries() {
    let (store, _temp) = create_test_store();
    let host = InMemoryHost::new(vec![OpenDocument::scratch("untitled:1", "Untitled 1", "keep me")]);
    store.snapshot(&host).unwrap();

    let orphan = store.cache().dir().join("leftover.tmp");
    fs::write(&orphan, "from an older session").unwrap();

    let report = store.snapshot(&host).unwrap();

    assert_eq!(report.reclaimed, 1);
    assert!(!orphan.exists());
    let live = store.cache().location_for(&"untitled:1".into());
    assert_eq!(fs::read_to_string(live).unwrap(), "keep me");
}

#[test]
fn test_manifest_file_round_trip() {
    let (store, _temp) = create_test_store();
    let manifest: Manifest = [
        (
            DocumentIdentity::from("untitled:3"),
            DocumentDescriptor::unsaved("/cache/1.tmp", None, "Untitled 3"),
        ),
        (
            DocumentIdentity::from("file:///srv/ünïcode name.txt"),
            DocumentDescriptor::persisted("/cache/2.tmp", "/srv/ünïcode name.txt", "ünïcode name.txt"),
        ),
    ]
    .into_iter()
    .collect();

    store.persist(&manifest).unwrap();
    assert_eq!(store.try_load().unwrap(), manifest);
}
