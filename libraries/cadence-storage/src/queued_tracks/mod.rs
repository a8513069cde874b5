//! Saved playback queue
//!
//! The queue is stored as one row per track and always replaced as a whole.
//!
//! # Example
//!
//! ```rust,no_run
//! use cadence_core::PersistedQueueRow;
//! use cadence_storage::queued_tracks;
//! # async fn example(pool: &sqlx::SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
//! // Save the queue
//! let rows = vec![PersistedQueueRow::playing("/music/song.flac", 0, 42)];
//! queued_tracks::replace_all(pool, &rows).await?;
//!
//! // Load it back
//! let saved = queued_tracks::get_all(pool).await?;
//! # Ok(())
//! # }
//! ```

use crate::error::{Result, StorageError};
use cadence_core::PersistedQueueRow;
use sqlx::{Row, SqlitePool};
use std::path::PathBuf;

/// Get all saved rows in the order they were saved
///
/// # Errors
///
/// Returns an error if the query fails or a stored value is out of range
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<PersistedQueueRow>> {
    let rows = sqlx::query(
        "SELECT path, is_playing, progress_seconds, order_index
         FROM queued_tracks ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| -> Result<PersistedQueueRow> {
            let path: String = row.try_get("path")?;
            let is_playing: i64 = row.try_get("is_playing")?;
            let progress_seconds: i64 = row.try_get("progress_seconds")?;
            let order_index: i64 = row.try_get("order_index")?;

            Ok(PersistedQueueRow {
                path: PathBuf::from(path),
                is_playing: is_playing != 0,
                progress_seconds: u64::try_from(progress_seconds)
                    .map_err(|_| StorageError::invalid_value("progress_seconds", progress_seconds))?,
                order_index: usize::try_from(order_index)
                    .map_err(|_| StorageError::invalid_value("order_index", order_index))?,
            })
        })
        .collect()
}

/// Replace the saved queue with `rows`
///
/// Runs in a single transaction: on failure the previous queue is kept.
///
/// # Errors
///
/// Returns an error if a path is not valid UTF-8, a value does not fit in
/// SQLite's integer type, or the transaction fails
pub async fn replace_all(pool: &SqlitePool, rows: &[PersistedQueueRow]) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM queued_tracks")
        .execute(&mut *tx)
        .await?;

    for row in rows {
        let path = row
            .path
            .to_str()
            .ok_or_else(|| StorageError::invalid_value("path", row.path.display()))?;
        let progress_seconds = i64::try_from(row.progress_seconds)
            .map_err(|_| StorageError::invalid_value("progress_seconds", row.progress_seconds))?;
        let order_index = i64::try_from(row.order_index)
            .map_err(|_| StorageError::invalid_value("order_index", row.order_index))?;

        sqlx::query(
            "INSERT INTO queued_tracks (path, is_playing, progress_seconds, order_index)
             VALUES (?, ?, ?, ?)",
        )
        .bind(path)
        .bind(i64::from(row.is_playing))
        .bind(progress_seconds)
        .bind(order_index)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Number of saved rows
///
/// # Errors
///
/// Returns an error if the query fails
pub async fn count(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM queued_tracks")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
