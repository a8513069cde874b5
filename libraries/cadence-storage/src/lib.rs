//! Cadence Storage
//!
//! `SQLite` persistence for the Cadence playback queue.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: each table owns its queries (`queued_tracks`)
//! - **Ports**: `SqliteQueueStore` implements `cadence_core::QueueStore`
//! - **Atomic Saves**: the queue snapshot is replaced inside one transaction
//!
//! # Example
//!
//! ```rust,no_run
//! use cadence_storage::{create_pool, run_migrations, SqliteQueueStore};
//! use cadence_core::QueueStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://cadence.db").await?;
//! run_migrations(&pool).await?;
//!
//! let store = SqliteQueueStore::new(pool);
//! let rows = store.saved_rows().await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod store;

// Vertical slices
pub mod queued_tracks;

pub use error::StorageError;
pub use store::SqliteQueueStore;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), StorageError> {
    MIGRATOR.run(pool).await?;
    Ok(())
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://cadence.db>`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, StorageError> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!("Creating pool with URL: {}", database_url);

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    Ok(pool)
}
