use crate::queued_tracks;
use async_trait::async_trait;
use cadence_core::{PersistedQueueRow, QueueStore, Result};
use sqlx::SqlitePool;

/// `QueueStore` backed by the `queued_tracks` table
#[derive(Debug, Clone)]
pub struct SqliteQueueStore {
    pool: SqlitePool,
}

impl SqliteQueueStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QueueStore for SqliteQueueStore {
    async fn saved_rows(&self) -> Result<Vec<PersistedQueueRow>> {
        Ok(queued_tracks::get_all(&self.pool).await?)
    }

    async fn save_rows(&self, rows: &[PersistedQueueRow]) -> Result<()> {
        queued_tracks::replace_all(&self.pool, rows).await?;
        tracing::debug!("Replaced saved queue with {} rows", rows.len());
        Ok(())
    }
}
