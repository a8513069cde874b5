
use cadence_core::{PersistedQueueRow, QueueStore, Track, TrackFactory};
use cadence_playback::{Queue, QueuePersister, RandomShuffler};
use cadence_storage::{queued_tracks, SqliteQueueStore};
use std::path::Path;
use std::sync::Arc;
use test_helpers::{queued_row, TestDb};

#[tokio::test]
async fn test_empty_database_has_no_rows() {
    let db = TestDb::new().await;

    let rows = queued_tracks::get_all(db.pool()).await.unwrap();
    assert!(rows.is_empty());
    assert_eq!(queued_tracks::count(db.pool()).await.unwrap(), 0);
}

#[tokio::test]
async fn test_replace_all_and_read_back() {
    let db = TestDb::new().await;

    let rows = vec![
        queued_row("a", 2),
        PersistedQueueRow::playing("/music/b.flac", 0, 125),
        queued_row("c", 1),
    ];
    queued_tracks::replace_all(db.pool(), &rows).await.unwrap();

    // Saved order is preserved, not re-sorted by order_index
    let loaded = queued_tracks::get_all(db.pool()).await.unwrap();
    assert_eq!(loaded, rows);
}

#[tokio::test]
async fn test_replace_all_discards_previous_rows() {
    let db = TestDb::new().await;

    queued_tracks::replace_all(db.pool(), &[queued_row("old1", 0), queued_row("old2", 1)])
        .await
        .unwrap();
    queued_tracks::replace_all(db.pool(), &[queued_row("new", 0)])
        .await
        .unwrap();

    let loaded = queued_tracks::get_all(db.pool()).await.unwrap();
    assert_eq!(loaded, vec![queued_row("new", 0)]);
}

#[tokio::test]
async fn test_replace_all_with_empty_set_clears_queue() {
    let db = TestDb::new().await;

    queued_tracks::replace_all(db.pool(), &[queued_row("a", 0)])
        .await
        .unwrap();
    queued_tracks::replace_all(db.pool(), &[]).await.unwrap();

    assert_eq!(queued_tracks::count(db.pool()).await.unwrap(), 0);
}

#[tokio::test]
async fn test_failed_replace_keeps_previous_queue() {
    let db = TestDb::new().await;

    queued_tracks::replace_all(db.pool(), &[queued_row("kept", 0)])
        .await
        .unwrap();

    // The second row cannot be stored, after the DELETE already ran
    let rows = vec![
        queued_row("new", 0),
        PersistedQueueRow::playing("/music/broken.flac", 1, u64::MAX),
    ];
    let err = queued_tracks::replace_all(db.pool(), &rows).await.unwrap_err();
    assert!(err.to_string().contains("progress_seconds"));

    let loaded = queued_tracks::get_all(db.pool()).await.unwrap();
    assert_eq!(loaded, vec![queued_row("kept", 0)]);
}

#[tokio::test]
async fn test_negative_order_index_is_rejected_on_read() {
    let db = TestDb::new().await;

    // Bypass the CHECK constraint by dropping and recreating without it
    sqlx::query("DROP TABLE queued_tracks")
        .execute(db.pool())
        .await
        .unwrap();
    sqlx::query(
        "CREATE TABLE queued_tracks (id INTEGER PRIMARY KEY AUTOINCREMENT, path TEXT NOT NULL,
         is_playing INTEGER NOT NULL, progress_seconds INTEGER NOT NULL, order_index INTEGER NOT NULL)",
    )
    .execute(db.pool())
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO queued_tracks (path, is_playing, progress_seconds, order_index)
         VALUES ('/music/a.flac', 0, 0, -1)",
    )
    .execute(db.pool())
    .await
    .unwrap();

    let err = queued_tracks::get_all(db.pool()).await.unwrap_err();
    assert!(err.to_string().contains("order_index"));
}

#[tokio::test]
async fn test_sqlite_queue_store_port() {
    let db = TestDb::new().await;
    let store = SqliteQueueStore::new(db.pool().clone());

    store.save_rows(&[queued_row("a", 0)]).await.unwrap();
    assert_eq!(store.saved_rows().await.unwrap(), vec![queued_row("a", 0)]);
}

/// Builds tracks straight from the path, no file access
struct PathTrackFactory;

#[async_trait::async_trait]
impl TrackFactory for PathTrackFactory {
    async fn create_from_file(&self, path: &Path) -> cadence_core::Result<Track> {
        let title = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default();
        Ok(Track::new(title, path.to_path_buf()))
    }
}

#[tokio::test]
async fn test_queue_survives_restart() {
    let db = TestDb::new().await;
    let persister = QueuePersister::new(
        Arc::new(SqliteQueueStore::new(db.pool().clone())),
        Arc::new(PathTrackFactory),
    );

    let tracks: Vec<Track> = ["a", "b", "c", "d"]
        .iter()
        .map(|name| Track::new(*name, format!("/music/{}.flac", name).into()))
        .collect();
    let mut queue = Queue::with_shuffler(RandomShuffler::seeded(21));
    queue.set_tracks(&tracks, true);
    let playing = queue.first_track().unwrap();
    persister.save(&queue, Some(playing.as_ref()), 33).await;

    // New session
    let info = persister.restore().await;
    let mut restored = Queue::new();
    restored
        .restore_tracks(info.tracks, info.playback_order)
        .unwrap();

    let before: Vec<_> = queue
        .tracks_in_playback_order()
        .map(|t| t.file_path.clone())
        .collect();
    let after: Vec<_> = restored
        .tracks_in_playback_order()
        .map(|t| t.file_path.clone())
        .collect();
    assert_eq!(before, after);
    assert_eq!(info.playing_track.unwrap().file_path, playing.file_path);
    assert_eq!(info.progress_seconds, 33);
}
