//! Integration tests for the gallery store against a real SQLite file.
//!
//! Each test gets its own temporary directory so databases never leak
//! between tests.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use assert_matches::assert_matches;
use photobooth_core::gallery::{GalleryRecord, NewGalleryRecord};
use photobooth_db::{Clock, GalleryError, GalleryStore};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_record(label: &str) -> NewGalleryRecord {
    NewGalleryRecord {
        original_image_data: format!("data:image/jpeg;base64,{label}-orig"),
        transformed_image_data: format!("data:image/png;base64,{label}-out"),
        theme_id: "disco".to_string(),
        theme_name: "Disco Fever".to_string(),
        theme_icon: "🪩".to_string(),
    }
}

/// A clock that ticks forward by one second per call, starting at `start`.
fn ticking_clock(start: i64) -> Clock {
    let now = Arc::new(AtomicI64::new(start));
    Arc::new(move || now.fetch_add(1_000, Ordering::SeqCst))
}

fn store_in(dir: &TempDir) -> GalleryStore {
    GalleryStore::open(dir.path().join("party-favor-gallery.db"))
}

fn ids(records: &[GalleryRecord]) -> Vec<&str> {
    records.iter().map(|r| r.id.as_str()).collect()
}

// ---------------------------------------------------------------------------
// Test: empty store lists nothing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fresh_store_lists_empty() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    assert!(store.list().await.is_empty());
    assert_eq!(store.count().await.unwrap(), 0);
}

// ---------------------------------------------------------------------------
// Test: save assigns id + timestamp and the record is listed
// ---------------------------------------------------------------------------

#[tokio::test]
async fn save_then_list_contains_exactly_one_match() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let new = new_record("a");

    let before = chrono::Utc::now().timestamp_millis();
    let saved = store.save(new.clone()).await.unwrap();

    assert!(!saved.id.is_empty());
    assert!(uuid::Uuid::parse_str(&saved.id).is_ok(), "id should be a UUID");
    assert!(saved.created_at >= before);
    assert!(saved.matches(&new));

    let listed = store.list().await;
    let matching: Vec<_> = listed.iter().filter(|r| r.matches(&new)).collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0], &saved);
}

#[tokio::test]
async fn saved_ids_are_unique() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    let mut seen = std::collections::HashSet::new();
    for i in 0..20 {
        let record = store.save(new_record(&i.to_string())).await.unwrap();
        assert!(seen.insert(record.id), "duplicate id assigned");
    }
}

// ---------------------------------------------------------------------------
// Test: list order, delete, clear scenario
// ---------------------------------------------------------------------------

#[tokio::test]
async fn save_delete_clear_scenario() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir).with_clock(ticking_clock(1_700_000_000_000));

    let a = store.save(new_record("A")).await.unwrap();
    let b = store.save(new_record("B")).await.unwrap();
    let c = store.save(new_record("C")).await.unwrap();

    let listed = store.list().await;
    assert_eq!(ids(&listed), vec![c.id.as_str(), b.id.as_str(), a.id.as_str()]);

    store.delete_by_id(&b.id).await.unwrap();
    let listed = store.list().await;
    assert_eq!(ids(&listed), vec![c.id.as_str(), a.id.as_str()]);

    let removed = store.clear_all().await.unwrap();
    assert_eq!(removed, 2);
    assert!(store.list().await.is_empty());
}

#[tokio::test]
async fn list_is_sorted_newest_first_regardless_of_insert_order() {
    let dir = TempDir::new().unwrap();
    let times = Arc::new(std::sync::Mutex::new(vec![300, 100, 500, 200, 400]));
    let clock: Clock = {
        let times = Arc::clone(&times);
        Arc::new(move || times.lock().unwrap().remove(0))
    };
    let store = store_in(&dir).with_clock(clock);

    for i in 0..5 {
        store.save(new_record(&i.to_string())).await.unwrap();
    }

    let listed = store.list().await;
    let stamps: Vec<i64> = listed.iter().map(|r| r.created_at).collect();
    assert_eq!(stamps, vec![500, 400, 300, 200, 100]);
    for pair in listed.windows(2) {
        assert!(pair[0].created_at >= pair[1].created_at);
    }
}

#[tokio::test]
async fn equal_timestamps_list_newest_insert_first() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir).with_clock(Arc::new(|| 42));

    let first = store.save(new_record("1")).await.unwrap();
    let second = store.save(new_record("2")).await.unwrap();

    let listed = store.list().await;
    assert_eq!(ids(&listed), vec![second.id.as_str(), first.id.as_str()]);
}

// ---------------------------------------------------------------------------
// Test: delete semantics
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_removes_only_the_target_and_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir).with_clock(ticking_clock(0));

    let a = store.save(new_record("A")).await.unwrap();
    let b = store.save(new_record("B")).await.unwrap();
    let c = store.save(new_record("C")).await.unwrap();

    store.delete_by_id(&b.id).await.unwrap();
    let after_first = store.list().await;
    assert_eq!(after_first, vec![c.clone(), a.clone()]);

    store.delete_by_id(&b.id).await.unwrap();
    assert_eq!(store.list().await, after_first);
}

#[tokio::test]
async fn delete_unknown_id_is_a_noop() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.save(new_record("A")).await.unwrap();

    store.delete_by_id("does-not-exist").await.unwrap();
    assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn clear_on_empty_store_succeeds() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    assert_eq!(store.clear_all().await.unwrap(), 0);
    assert!(store.list().await.is_empty());
}

// ---------------------------------------------------------------------------
// Test: get
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_finds_saved_record() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let saved = store.save(new_record("A")).await.unwrap();

    assert_eq!(store.get(&saved.id).await.unwrap(), Some(saved));
    assert_eq!(store.get("missing").await.unwrap(), None);
}

// ---------------------------------------------------------------------------
// Test: persistence across handles
// ---------------------------------------------------------------------------

#[tokio::test]
async fn records_survive_close_and_reopen() {
    let dir = TempDir::new().unwrap();

    let store = store_in(&dir);
    let saved = store.save(new_record("A")).await.unwrap();
    store.close().await;

    let reopened = store_in(&dir);
    assert_eq!(reopened.list().await, vec![saved]);
}

// ---------------------------------------------------------------------------
// Test: open failures
// ---------------------------------------------------------------------------

/// A path whose parent is a regular file can never be opened.
fn unopenable_store(dir: &TempDir) -> GalleryStore {
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"not a directory").unwrap();
    GalleryStore::open(blocker.join("gallery.db"))
}

#[tokio::test]
async fn list_on_unopenable_store_returns_empty() {
    let dir = TempDir::new().unwrap();
    let store = unopenable_store(&dir);

    assert!(store.list().await.is_empty());
    assert_matches!(store.try_list().await, Err(GalleryError::Unavailable { .. }));
}

#[tokio::test]
async fn save_on_unopenable_store_fails() {
    let dir = TempDir::new().unwrap();
    let store = unopenable_store(&dir);

    let result = store.save(new_record("A")).await;
    assert_matches!(result, Err(GalleryError::Unavailable { .. }));
}

#[tokio::test]
async fn nested_directories_are_created_on_first_use() {
    let dir = TempDir::new().unwrap();
    let store = GalleryStore::open(dir.path().join("a").join("b").join("gallery.db"));

    store.save(new_record("A")).await.unwrap();
    assert!(store.path().exists());
}
