//! Collaborator ports consumed by the playback crate
//!
//! Both ports are async so adapters can do real I/O (SQLite, tag reading)
//! without blocking the caller. They are object safe and meant to be held
//! as `Arc<dyn ...>`.

use crate::error::Result;
use crate::types::{PersistedQueueRow, Track};
use async_trait::async_trait;
use std::path::Path;

/// Durable storage for the playback queue snapshot
///
/// The whole queue is stored as one row per track and replaced as a unit on
/// every save. There are no incremental updates.
#[async_trait]
pub trait QueueStore: Send + Sync {
    /// Get all saved rows
    ///
    /// Returns an empty vector when nothing has been saved. Rows come back in
    /// the order they were saved; each row carries its own `order_index`.
    ///
    /// # Errors
    /// Returns an error if the underlying storage cannot be read
    async fn saved_rows(&self) -> Result<Vec<PersistedQueueRow>>;

    /// Replace every previously saved row with `rows`
    ///
    /// Implementations must apply the replacement atomically: readers see
    /// either the old set or the new set, never a mix.
    ///
    /// # Errors
    /// Returns an error if the replacement could not be committed
    async fn save_rows(&self, rows: &[PersistedQueueRow]) -> Result<()>;
}

/// Builds fully populated tracks from files on disk
#[async_trait]
pub trait TrackFactory: Send + Sync {
    /// Read the file at `path` and produce a `Track`
    ///
    /// # Errors
    /// Returns an error if the file is missing or its tags cannot be parsed
    async fn create_from_file(&self, path: &Path) -> Result<Track>;
}
