//! Storage tests
//!
//! File-backed progress records and the saved-items list, run against
//! temporary directories.

use serenya::models::{MediaType, PlaybackRequest, ProgressRecord, SavedItem};
use serenya::storage::{Library, ProgressStore};

fn record(position: f64) -> ProgressRecord {
    ProgressRecord {
        current_time: position,
        duration: 7200.0,
        timestamp: 1_700_000_000_000,
        mirror: "vidsrc".into(),
    }
}

fn item(id: u64, title: &str) -> SavedItem {
    SavedItem {
        id,
        media_type: MediaType::Movie,
        title: title.into(),
        year: Some(1999),
        poster_path: None,
        vote_average: 8.4,
    }
}

// =============================================================================
// Progress Store Tests
// =============================================================================

#[test]
fn test_save_and_load_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let store = ProgressStore::new(dir.path());
    let request = PlaybackRequest::movie(550);

    assert!(store.load(&request).is_none());

    store.save(&request, &record(42.5)).unwrap();
    let loaded = store.load(&request).unwrap();
    assert_eq!(loaded, record(42.5));
}

#[test]
fn test_last_writer_wins() {
    let dir = tempfile::tempdir().unwrap();
    let store = ProgressStore::new(dir.path());
    let request = PlaybackRequest::movie(550);

    store.save(&request, &record(10.0)).unwrap();
    store.save(&request, &record(20.0)).unwrap();

    assert_eq!(store.load(&request).unwrap().current_time, 20.0);
}

#[test]
fn test_episodes_do_not_share_records() {
    let dir = tempfile::tempdir().unwrap();
    let store = ProgressStore::new(dir.path());

    let s2e5 = PlaybackRequest::series(1399, 2, 5);
    let s2e6 = PlaybackRequest::series(1399, 2, 6);

    store.save(&s2e5, &record(100.0)).unwrap();
    assert!(store.load(&s2e5).is_some());
    assert!(store.load(&s2e6).is_none());
}

#[test]
fn test_clear_removes_record() {
    let dir = tempfile::tempdir().unwrap();
    let store = ProgressStore::new(dir.path());
    let request = PlaybackRequest::movie(550);

    store.save(&request, &record(5.0)).unwrap();
    store.clear(&request).unwrap();
    assert!(store.load(&request).is_none());

    // Clearing an absent record is fine
    store.clear(&request).unwrap();
}

#[test]
fn test_corrupt_record_reads_as_absent() {
    let dir = tempfile::tempdir().unwrap();
    let store = ProgressStore::new(dir.path());
    let request = PlaybackRequest::movie(550);

    std::fs::write(
        dir.path().join("movie_progress_550.json"),
        "{not valid json",
    )
    .unwrap();

    assert!(store.load(&request).is_none());
}

#[test]
fn test_stored_json_uses_web_field_names() {
    let dir = tempfile::tempdir().unwrap();
    let store = ProgressStore::new(dir.path());
    let request = PlaybackRequest::movie(550);

    store.save(&request, &record(42.0)).unwrap();

    let raw = std::fs::read_to_string(dir.path().join("movie_progress_550.json")).unwrap();
    assert!(raw.contains("\"currentTime\""));
    assert!(raw.contains("\"duration\""));
    assert!(raw.contains("\"timestamp\""));
    assert!(raw.contains("\"mirror\""));
}

// =============================================================================
// Saved Items Tests
// =============================================================================

#[test]
fn test_missing_file_reads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let library = Library::new(dir.path().join("saved.json"));
    assert!(library.list().is_empty());
}

#[test]
fn test_add_and_list() {
    let dir = tempfile::tempdir().unwrap();
    let library = Library::new(dir.path().join("saved.json"));

    assert!(library.add(item(550, "Fight Club")).unwrap());
    assert!(library.add(item(1399, "Game of Thrones")).unwrap());

    let items = library.list();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].title, "Fight Club");
    assert!(library.contains(550));
}

#[test]
fn test_duplicate_add_is_a_noop() {
    let dir = tempfile::tempdir().unwrap();
    let library = Library::new(dir.path().join("saved.json"));

    assert!(library.add(item(550, "Fight Club")).unwrap());
    // Same id, different payload: list stays untouched
    assert!(!library.add(item(550, "Renamed")).unwrap());

    let items = library.list();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title, "Fight Club");
}

#[test]
fn test_remove() {
    let dir = tempfile::tempdir().unwrap();
    let library = Library::new(dir.path().join("saved.json"));

    library.add(item(550, "Fight Club")).unwrap();
    assert!(library.remove(550).unwrap());
    assert!(!library.remove(550).unwrap());
    assert!(library.list().is_empty());
}
