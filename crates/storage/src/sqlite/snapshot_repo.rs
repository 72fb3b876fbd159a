use async_trait::async_trait;
use chrono::Utc;
use drill_core::model::SessionSnapshot;
use sqlx::Row;

use crate::record::SnapshotRecord;
use crate::repository::{SnapshotRepository, StorageError};

use super::SqliteRepository;

#[async_trait]
impl SnapshotRepository for SqliteRepository {
    async fn load_snapshot(&self, key: &str) -> Result<Option<SessionSnapshot>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT payload
            FROM session_slots
            WHERE key = ?1
            ",
        )
        .bind(key)
        .fetch_optional(self.pool())
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let payload: String = row
            .try_get("payload")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;

        SnapshotRecord::decode(&payload).map(Some)
    }

    async fn save_snapshot(
        &self,
        key: &str,
        snapshot: &SessionSnapshot,
    ) -> Result<(), StorageError> {
        let payload = SnapshotRecord::encode(snapshot)?;

        sqlx::query(
            r"
            INSERT INTO session_slots (key, payload, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at
            ",
        )
        .bind(key)
        .bind(payload)
        .bind(Utc::now())
        .execute(self.pool())
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }
}
