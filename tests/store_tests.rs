//! Store tests: dedup lookup, constraint mapping, placeholder cleanup, ledger rows.

use chunkvault::engine::hash_bytes;
use chunkvault::{ChunkKind, ChunkStore, StoreError};
use std::path::PathBuf;

#[test]
fn test_open_in_memory_empty() {
    let store = ChunkStore::open_in_memory().unwrap();
    assert_eq!(store.chunk_count().unwrap(), 0);
    assert!(store.report().unwrap().is_empty());
}

#[test]
fn test_insert_and_find_chunk_by_hash() {
    let store = ChunkStore::open_in_memory().unwrap();
    let hash = hash_bytes(b"hello");
    assert_eq!(store.find_chunk_by_hash(&hash).unwrap(), None);

    let id = store.insert_chunk(&hash, ChunkKind::Raw, b"hello").unwrap();
    assert_eq!(store.find_chunk_by_hash(&hash).unwrap(), Some(id));
    assert_eq!(
        store.chunk_by_id(id).unwrap(),
        Some((ChunkKind::Raw, b"hello".to_vec()))
    );
}

#[test]
fn test_insert_chunk_duplicate_hash_is_fatal() {
    let store = ChunkStore::open_in_memory().unwrap();
    let hash = hash_bytes(b"same");
    store.insert_chunk(&hash, ChunkKind::Raw, b"same").unwrap();

    let err = store
        .insert_chunk(&hash, ChunkKind::Raw, b"same")
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<StoreError>(),
        Some(StoreError::DuplicateHash { .. })
    ));
    assert_eq!(store.chunk_count().unwrap(), 1);
}

#[test]
fn test_insert_or_reuse_chunk_returns_existing_id() {
    let store = ChunkStore::open_in_memory().unwrap();
    let hash = hash_bytes(b"abc");
    let first = store
        .insert_or_reuse_chunk(&hash, ChunkKind::Raw, b"abc")
        .unwrap();
    let second = store
        .insert_or_reuse_chunk(&hash, ChunkKind::Raw, b"abc")
        .unwrap();
    assert_eq!(first, second);
    assert_eq!(store.chunk_count().unwrap(), 1);
}

#[test]
fn test_cleanup_removes_empty_tree_placeholders_only() {
    let store = ChunkStore::open_in_memory().unwrap();
    let orphan_hash = hash_bytes(b"orphan");
    store
        .insert_chunk(&orphan_hash, ChunkKind::Tree, b"")
        .unwrap();

    let backfilled_hash = hash_bytes(b"backfilled");
    let backfilled = store
        .insert_chunk(&backfilled_hash, ChunkKind::Tree, b"")
        .unwrap();
    store.update_chunk_payload(backfilled, b"1+2").unwrap();

    let raw_hash = hash_bytes(b"");
    store.insert_chunk(&raw_hash, ChunkKind::Raw, b"").unwrap();

    assert_eq!(store.cleanup_orphaned_tree_placeholders().unwrap(), 1);
    assert_eq!(store.find_chunk_by_hash(&orphan_hash).unwrap(), None);
    // Backfilled tree and the empty raw chunk survive.
    assert_eq!(
        store.find_chunk_by_hash(&backfilled_hash).unwrap(),
        Some(backfilled)
    );
    assert!(store.find_chunk_by_hash(&raw_hash).unwrap().is_some());
}

#[test]
fn test_open_runs_placeholder_cleanup() {
    let dir = tempfile::tempdir().unwrap();
    let db_path: PathBuf = dir.path().join(".chunkvault");

    let orphan_hash = hash_bytes(b"interrupted");
    {
        let store = ChunkStore::open(&db_path).unwrap();
        store
            .insert_chunk(&orphan_hash, ChunkKind::Tree, b"")
            .unwrap();
    }
    // Simulates the crash-recovery path: the placeholder was never backfilled.
    let store = ChunkStore::open(&db_path).unwrap();
    assert_eq!(store.find_chunk_by_hash(&orphan_hash).unwrap(), None);
}

#[test]
fn test_content_ledger_round_trip() {
    let store = ChunkStore::open_in_memory().unwrap();
    let root = store
        .insert_chunk(&hash_bytes(b"blob"), ChunkKind::Raw, b"blob")
        .unwrap();
    let content_id = store.insert_content(root, 4).unwrap();
    assert_eq!(store.content_by_id(content_id).unwrap(), Some((root, 4)));
    assert_eq!(store.content_by_id(content_id + 1).unwrap(), None);
}

#[test]
fn test_has_path_and_insert_path() {
    let store = ChunkStore::open_in_memory().unwrap();
    assert!(!store.has_path("a/b.txt").unwrap());

    let root = store
        .insert_chunk(&hash_bytes(b"x"), ChunkKind::Raw, b"x")
        .unwrap();
    let content_id = store.insert_content(root, 1).unwrap();
    store.insert_path("a/b.txt", content_id).unwrap();

    assert!(store.has_path("a/b.txt").unwrap());
    assert!(!store.has_path("a/b").unwrap());
    assert_eq!(
        store.content_id_for_path("a/b.txt").unwrap(),
        Some(content_id)
    );
    assert_eq!(store.content_id_for_path("other").unwrap(), None);
}

#[test]
fn test_report_groups_by_kind() {
    let store = ChunkStore::open_in_memory().unwrap();
    store
        .insert_chunk(&hash_bytes(b"aaaa"), ChunkKind::Raw, b"aaaa")
        .unwrap();
    store
        .insert_chunk(&hash_bytes(b"bb"), ChunkKind::Raw, b"bb")
        .unwrap();
    let tree = store
        .insert_chunk(&hash_bytes(b"tree"), ChunkKind::Tree, b"")
        .unwrap();
    store.update_chunk_payload(tree, b"1+2").unwrap();

    let report = store.report().unwrap();
    assert_eq!(report, vec![(ChunkKind::Raw, 6), (ChunkKind::Tree, 3)]);
}
