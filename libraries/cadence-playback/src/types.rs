//! Core types for playback management

use cadence_core::Track;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// How `QueuePersister::restore` treats a saved track that cannot be rebuilt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestorePolicy {
    /// Any failing track discards the whole saved queue
    #[default]
    AbortAll,

    /// Failing tracks are dropped; the rest of the queue is restored
    SkipMissing,
}

/// Result of restoring a saved queue
///
/// `playback_order` indexes into `tracks`. `playing_track`, when present,
/// is one of the handles in `tracks`.
#[derive(Debug, Clone, Default)]
pub struct QueueRestoreInfo {
    /// Restored tracks in saved order
    pub tracks: Vec<Arc<Track>>,

    /// Restored playback order
    pub playback_order: Vec<usize>,

    /// Track that was playing when the queue was saved
    pub playing_track: Option<Arc<Track>>,

    /// Elapsed time of `playing_track` in seconds
    pub progress_seconds: u64,
}

impl QueueRestoreInfo {
    /// Check if nothing was restored
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

/// Configuration for queue traversal and persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Wrap to the start of the playback order after the last track (default: false)
    pub allow_wrap_around: bool,

    /// Shuffle new queues (default: false)
    pub shuffle: bool,

    /// Fixed shuffle seed for reproducible orders (default: None)
    pub shuffle_seed: Option<u64>,

    /// Handling of unreadable tracks on restore (default: AbortAll)
    pub restore_policy: RestorePolicy,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            allow_wrap_around: false,
            shuffle: false,
            shuffle_seed: None,
            restore_policy: RestorePolicy::AbortAll,
        }
    }
}
