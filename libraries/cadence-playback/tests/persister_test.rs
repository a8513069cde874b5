//! Queue persistence tests
//!
//! Uses in-memory fakes for the storage and track-factory ports so save and
//! restore can be checked without a database or audio files.

use async_trait::async_trait;
use cadence_core::{CadenceError, PersistedQueueRow, QueueStore, Track, TrackFactory};
use cadence_playback::{Queue, QueuePersister, RandomShuffler, RestorePolicy};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

// ===== Test Doubles =====

#[derive(Default)]
struct MemoryStore {
    rows: Mutex<Vec<PersistedQueueRow>>,
    fail_reads: bool,
    fail_writes: bool,
}

impl MemoryStore {
    fn with_rows(rows: Vec<PersistedQueueRow>) -> Self {
        Self {
            rows: Mutex::new(rows),
            ..Default::default()
        }
    }

    fn rows(&self) -> Vec<PersistedQueueRow> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl QueueStore for MemoryStore {
    async fn saved_rows(&self) -> cadence_core::Result<Vec<PersistedQueueRow>> {
        if self.fail_reads {
            return Err(CadenceError::storage("database is locked"));
        }
        Ok(self.rows())
    }

    async fn save_rows(&self, rows: &[PersistedQueueRow]) -> cadence_core::Result<()> {
        if self.fail_writes {
            return Err(CadenceError::storage("disk full"));
        }
        *self.rows.lock().unwrap() = rows.to_vec();
        Ok(())
    }
}

/// Builds tracks named after the file stem; paths in `missing` fail
#[derive(Default)]
struct FakeFactory {
    missing: HashSet<PathBuf>,
}

impl FakeFactory {
    fn missing(paths: &[&str]) -> Self {
        Self {
            missing: paths.iter().map(PathBuf::from).collect(),
        }
    }
}

#[async_trait]
impl TrackFactory for FakeFactory {
    async fn create_from_file(&self, path: &Path) -> cadence_core::Result<Track> {
        if self.missing.contains(path) {
            return Err(CadenceError::not_found("File", path.display().to_string()));
        }
        let title = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default();
        Ok(Track::new(title, path.to_path_buf()))
    }
}

// ===== Helpers =====

fn album(names: &[&str]) -> Vec<Track> {
    names
        .iter()
        .map(|name| Track::new(*name, PathBuf::from(format!("/music/{}.flac", name))))
        .collect()
}

fn titles<'a>(tracks: impl Iterator<Item = &'a Arc<Track>>) -> Vec<String> {
    tracks.map(|t| t.title.clone()).collect()
}

fn persister(store: &Arc<MemoryStore>, factory: FakeFactory) -> QueuePersister {
    QueuePersister::new(Arc::clone(store) as Arc<dyn QueueStore>, Arc::new(factory))
}

fn row(name: &str, order_index: usize) -> PersistedQueueRow {
    PersistedQueueRow::queued(format!("/music/{}.flac", name), order_index)
}

// ===== Restore =====

#[tokio::test]
async fn test_restore_without_saved_rows_is_empty() {
    let store = Arc::new(MemoryStore::default());
    let info = persister(&store, FakeFactory::default()).restore().await;

    assert!(info.is_empty());
    assert!(info.playback_order.is_empty());
    assert!(info.playing_track.is_none());
    assert_eq!(info.progress_seconds, 0);
}

#[tokio::test]
async fn test_save_then_restore_round_trip() {
    let store = Arc::new(MemoryStore::default());
    let persister = persister(&store, FakeFactory::default());

    let mut queue = Queue::with_shuffler(RandomShuffler::seeded(11));
    queue.set_tracks(&album(&["a", "b", "c", "d", "e"]), true);
    let playing = Arc::clone(&queue.system_tracks()[3]);

    persister.save(&queue, Some(playing.as_ref()), 95).await;
    let info = persister.restore().await;

    let mut restored = Queue::new();
    restored
        .restore_tracks(info.tracks.clone(), info.playback_order.clone())
        .unwrap();

    assert_eq!(titles(restored.tracks()), titles(queue.tracks()));
    assert_eq!(
        titles(restored.tracks_in_playback_order()),
        titles(queue.tracks_in_playback_order())
    );
    for (before, after) in queue.tracks().zip(restored.tracks()) {
        assert_eq!(
            queue.playback_order_index(before),
            restored.playback_order_index(after)
        );
    }

    let restored_playing = info.playing_track.expect("playing track restored");
    assert_eq!(restored_playing.file_path, playing.file_path);
    assert!(info.tracks.iter().any(|t| Arc::ptr_eq(t, &restored_playing)));
    assert_eq!(info.progress_seconds, 95);
}

#[tokio::test]
async fn test_restore_places_tracks_by_order_index() {
    let store = Arc::new(MemoryStore::with_rows(vec![
        row("a", 2),
        PersistedQueueRow::playing("/music/b.flac", 0, 30),
        row("c", 1),
    ]));

    let info = persister(&store, FakeFactory::default()).restore().await;

    assert_eq!(titles(info.tracks.iter()), vec!["a", "b", "c"]);
    assert_eq!(info.playback_order, vec![1, 2, 0]);
    assert_eq!(info.playing_track.unwrap().title, "b");
    assert_eq!(info.progress_seconds, 30);
}

#[tokio::test]
async fn test_restored_queue_continues_playback() {
    let store = Arc::new(MemoryStore::default());
    let persister = persister(&store, FakeFactory::default());

    let mut queue = Queue::new();
    queue.set_tracks(&album(&["a", "b", "c"]), false);
    let a = queue.first_track().unwrap();
    let b = queue.next_track(Some(&a), false).unwrap();
    persister.save(&queue, Some(b.as_ref()), 12).await;

    let info = persister.restore().await;
    let mut restored = Queue::new();
    restored
        .restore_tracks(info.tracks, info.playback_order)
        .unwrap();

    let playing = info.playing_track.unwrap();
    assert_eq!(playing.title, "b");
    assert_eq!(restored.next_track(Some(&playing), false).unwrap().title, "c");
}

#[tokio::test]
async fn test_consumed_playing_track_is_saved_first() {
    let store = Arc::new(MemoryStore::default());
    let persister = persister(&store, FakeFactory::default());

    let mut queue = Queue::new();
    queue.set_tracks(&album(&["a", "b"]), false);
    let a = queue.first_track().unwrap();
    let b = queue.next_track(Some(&a), false).unwrap();
    let _ = queue.next_track(Some(&b), false);

    // `b` left the queue but is still playing
    persister.save(&queue, Some(b.as_ref()), 61).await;

    let info = persister.restore().await;
    assert_eq!(titles(info.tracks.iter()), vec!["b"]);
    assert_eq!(info.playing_track.unwrap().title, "b");
    assert_eq!(info.progress_seconds, 61);
}

#[tokio::test]
async fn test_priority_tracks_restore_at_front_of_order() {
    let store = Arc::new(MemoryStore::default());
    let persister = persister(&store, FakeFactory::default());

    let mut queue = Queue::with_shuffler(RandomShuffler::seeded(3));
    queue.set_tracks(&album(&["a", "b", "c"]), true);
    queue.add_tracks(&album(&["x", "y"]));
    let expected = titles(queue.tracks_in_playback_order());

    persister.save(&queue, None, 0).await;
    let info = persister.restore().await;

    let mut restored = Queue::new();
    restored
        .restore_tracks(info.tracks, info.playback_order)
        .unwrap();
    assert_eq!(titles(restored.tracks_in_playback_order()), expected);
    assert!(restored.priority_tracks().is_empty());
}

#[tokio::test]
async fn test_restore_read_failure_is_empty() {
    let store = Arc::new(MemoryStore {
        fail_reads: true,
        ..MemoryStore::with_rows(vec![row("a", 0)])
    });

    let info = persister(&store, FakeFactory::default()).restore().await;
    assert!(info.is_empty());
}

#[tokio::test]
async fn test_restore_rejects_corrupt_order_indices() {
    let store = Arc::new(MemoryStore::with_rows(vec![row("a", 0), row("b", 0)]));
    assert!(persister(&store, FakeFactory::default())
        .restore()
        .await
        .is_empty());

    let store = Arc::new(MemoryStore::with_rows(vec![row("a", 0), row("b", 5)]));
    assert!(persister(&store, FakeFactory::default())
        .restore()
        .await
        .is_empty());
}

// ===== Restore Policies =====

#[tokio::test]
async fn test_missing_file_aborts_restore_by_default() {
    let store = Arc::new(MemoryStore::with_rows(vec![
        row("a", 0),
        row("gone", 1),
        row("c", 2),
    ]));

    let persister = persister(&store, FakeFactory::missing(&["/music/gone.flac"]));
    assert_eq!(persister.policy(), RestorePolicy::AbortAll);
    assert!(persister.restore().await.is_empty());
}

#[tokio::test]
async fn test_skip_missing_compacts_order() {
    let store = Arc::new(MemoryStore::with_rows(vec![
        row("a", 3),
        row("gone", 0),
        PersistedQueueRow::playing("/music/c.flac", 1, 44),
        row("d", 2),
    ]));

    let info = persister(&store, FakeFactory::missing(&["/music/gone.flac"]))
        .with_policy(RestorePolicy::SkipMissing)
        .restore()
        .await;

    assert_eq!(titles(info.tracks.iter()), vec!["a", "c", "d"]);
    assert_eq!(info.playback_order, vec![1, 2, 0]);
    assert_eq!(info.playing_track.unwrap().title, "c");
    assert_eq!(info.progress_seconds, 44);
}

#[tokio::test]
async fn test_skip_missing_playing_track_resets_progress() {
    let store = Arc::new(MemoryStore::with_rows(vec![
        PersistedQueueRow::playing("/music/gone.flac", 0, 80),
        row("b", 1),
    ]));

    let info = persister(&store, FakeFactory::missing(&["/music/gone.flac"]))
        .with_policy(RestorePolicy::SkipMissing)
        .restore()
        .await;

    assert_eq!(titles(info.tracks.iter()), vec!["b"]);
    assert_eq!(info.playback_order, vec![0]);
    assert!(info.playing_track.is_none());
    assert_eq!(info.progress_seconds, 0);
}

// ===== Save =====

#[tokio::test]
async fn test_save_replaces_previous_rows() {
    let store = Arc::new(MemoryStore::with_rows(vec![row("stale", 0)]));
    let persister = persister(&store, FakeFactory::default());

    let mut queue = Queue::new();
    queue.set_tracks(&album(&["a", "b"]), false);
    persister.save(&queue, None, 0).await;

    assert_eq!(store.rows(), vec![row("a", 0), row("b", 1)]);
}

#[tokio::test]
async fn test_save_failure_is_swallowed() {
    let store = Arc::new(MemoryStore {
        fail_writes: true,
        ..MemoryStore::with_rows(vec![row("kept", 0)])
    });
    let persister = persister(&store, FakeFactory::default());

    let mut queue = Queue::new();
    queue.set_tracks(&album(&["a"]), false);
    persister.save(&queue, None, 0).await;

    assert_eq!(store.rows(), vec![row("kept", 0)]);
}

#[tokio::test]
async fn test_save_empty_queue_clears_rows() {
    let store = Arc::new(MemoryStore::with_rows(vec![row("a", 0)]));
    let persister = persister(&store, FakeFactory::default());

    persister.save(&Queue::new(), None, 0).await;

    assert!(store.rows().is_empty());
    assert!(persister.restore().await.is_empty());
}
