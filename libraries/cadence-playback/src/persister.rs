//! Queue persistence
//!
//! Saves the queue as one row per track through a `QueueStore` and rebuilds
//! it at startup through a `TrackFactory`. Persisting the queue is a
//! convenience, so neither direction ever fails towards the caller: errors
//! are logged and turned into a no-op (save) or an empty queue (restore).

use crate::error::Result;
use crate::queue::{validate_playback_order, Queue};
use crate::shuffle::Shuffler;
use crate::types::{QueueRestoreInfo, RestorePolicy};
use cadence_core::{PersistedQueueRow, QueueStore, Track, TrackFactory};
use std::sync::Arc;

/// Saves and restores the playback queue
pub struct QueuePersister {
    store: Arc<dyn QueueStore>,
    factory: Arc<dyn TrackFactory>,
    policy: RestorePolicy,
}

impl QueuePersister {
    /// Create a persister with the default `RestorePolicy::AbortAll`
    pub fn new(store: Arc<dyn QueueStore>, factory: Arc<dyn TrackFactory>) -> Self {
        Self {
            store,
            factory,
            policy: RestorePolicy::default(),
        }
    }

    /// Set how unreadable tracks are handled on restore
    #[must_use]
    pub fn with_policy(mut self, policy: RestorePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Current restore policy
    pub fn policy(&self) -> RestorePolicy {
        self.policy
    }

    /// Replace the saved queue with the current state of `queue`
    ///
    /// The snapshot is taken before any I/O. Failures are logged and
    /// swallowed.
    pub async fn save<S: Shuffler>(
        &self,
        queue: &Queue<S>,
        playing: Option<&Track>,
        progress_seconds: u64,
    ) {
        let rows = snapshot_rows(queue, playing, progress_seconds);

        match self.store.save_rows(&rows).await {
            Ok(()) => tracing::debug!("Saved queue with {} tracks", rows.len()),
            Err(e) => tracing::error!("Failed to save queue ({} tracks): {}", rows.len(), e),
        }
    }

    /// Rebuild the saved queue
    ///
    /// Returns an empty `QueueRestoreInfo` when nothing was saved or when
    /// restoring failed.
    pub async fn restore(&self) -> QueueRestoreInfo {
        match self.try_restore().await {
            Ok(info) => {
                if !info.is_empty() {
                    tracing::info!(
                        "Restored queue with {} tracks (playing: {})",
                        info.tracks.len(),
                        info.playing_track.is_some()
                    );
                }
                info
            }
            Err(e) => {
                tracing::error!("Failed to restore queue: {}", e);
                QueueRestoreInfo::default()
            }
        }
    }

    async fn try_restore(&self) -> Result<QueueRestoreInfo> {
        let rows = self.store.saved_rows().await?;
        if rows.is_empty() {
            return Ok(QueueRestoreInfo::default());
        }

        let order_indices: Vec<usize> = rows.iter().map(|row| row.order_index).collect();
        validate_playback_order(&order_indices, rows.len())?;

        let mut info = QueueRestoreInfo::default();
        let mut order_keys = Vec::with_capacity(rows.len());

        for row in &rows {
            let track = match self.factory.create_from_file(&row.path).await {
                Ok(track) => Arc::new(track),
                Err(e) if self.policy == RestorePolicy::SkipMissing => {
                    tracing::warn!("Skipping queued track {:?}: {}", row.path, e);
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            if row.is_playing {
                info.playing_track = Some(Arc::clone(&track));
                info.progress_seconds = row.progress_seconds;
            }

            order_keys.push(row.order_index);
            info.tracks.push(track);
        }

        // Rank surviving tracks by their saved position; with nothing
        // skipped this is playback_order[row.order_index] = track index.
        let mut playback_order: Vec<usize> = (0..info.tracks.len()).collect();
        playback_order.sort_by_key(|&index| order_keys[index]);
        info.playback_order = playback_order;

        Ok(info)
    }
}

/// Build the rows describing `queue`
///
/// One row per queued track, priority tier first. A row's `order_index` is
/// the track's position in `tracks_in_playback_order`. A playing track that
/// is no longer queued gets its own row in front of everything else.
pub fn snapshot_rows<S: Shuffler>(
    queue: &Queue<S>,
    playing: Option<&Track>,
    progress_seconds: u64,
) -> Vec<PersistedQueueRow> {
    let is_playing = |track: &Track| playing.is_some_and(|p| p.file_path == track.file_path);
    let playing_is_queued = queue.tracks().any(|track| is_playing(track.as_ref()));

    let mut rows = Vec::with_capacity(queue.number_of_tracks() + 1);
    let mut offset = 0;

    if let Some(track) = playing.filter(|_| !playing_is_queued) {
        rows.push(PersistedQueueRow::playing(
            track.file_path.clone(),
            0,
            progress_seconds,
        ));
        offset = 1;
    }

    let priority_len = queue.priority_tracks().len();
    let mut rank = vec![0; queue.playback_order().len()];
    for (position, &index) in queue.playback_order().iter().enumerate() {
        rank[index] = position;
    }

    let positions = (0..priority_len).chain(rank.iter().map(|&r| priority_len + r));
    let mut playing_marked = false;

    for (track, position) in queue.tracks().zip(positions) {
        let order_index = offset + position;
        if !playing_marked && is_playing(track.as_ref()) {
            playing_marked = true;
            rows.push(PersistedQueueRow::playing(
                track.file_path.clone(),
                order_index,
                progress_seconds,
            ));
        } else {
            rows.push(PersistedQueueRow::queued(track.file_path.clone(), order_index));
        }
    }

    rows
}
