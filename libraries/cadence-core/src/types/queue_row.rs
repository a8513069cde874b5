/// Persisted queue row
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One track of a saved playback queue
///
/// A saved queue is the complete set of rows; it is always written as a
/// whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedQueueRow {
    /// File path of the queued track
    pub path: PathBuf,

    /// Whether this row was playing when the queue was saved
    pub is_playing: bool,

    /// Elapsed playback time in seconds (0 unless `is_playing`)
    pub progress_seconds: u64,

    /// Position of the track in playback order
    pub order_index: usize,
}

impl PersistedQueueRow {
    /// Create a row for a track that was not playing
    pub fn queued(path: impl Into<PathBuf>, order_index: usize) -> Self {
        Self {
            path: path.into(),
            is_playing: false,
            progress_seconds: 0,
            order_index,
        }
    }

    /// Create a row for the track that was playing
    pub fn playing(path: impl Into<PathBuf>, order_index: usize, progress_seconds: u64) -> Self {
        Self {
            path: path.into(),
            is_playing: true,
            progress_seconds,
            order_index,
        }
    }
}
