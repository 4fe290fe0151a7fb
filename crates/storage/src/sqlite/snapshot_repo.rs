use async_trait::async_trait;
use quiz_core::model::{GameSnapshot, SNAPSHOT_KEY};
use sqlx::Row;

use super::SqliteRepository;
use crate::repository::{SnapshotRepository, StorageError, decode_snapshot, encode_snapshot};

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

#[async_trait]
impl SnapshotRepository for SqliteRepository {
    async fn save_snapshot(&self, snapshot: &GameSnapshot) -> Result<(), StorageError> {
        let payload = encode_snapshot(snapshot)?;

        sqlx::query(
            r"
            INSERT INTO saved_games (key, payload, saved_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                payload = excluded.payload,
                saved_at = excluded.saved_at
            ",
        )
        .bind(SNAPSHOT_KEY)
        .bind(payload)
        .bind(snapshot.timestamp)
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }

    async fn load_snapshot(&self) -> Result<Option<GameSnapshot>, StorageError> {
        let row = sqlx::query("SELECT payload FROM saved_games WHERE key = ?1")
            .bind(SNAPSHOT_KEY)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let payload: String = row.try_get("payload").map_err(ser)?;
        decode_snapshot(&payload).map(Some)
    }

    async fn clear_snapshot(&self) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM saved_games WHERE key = ?1")
            .bind(SNAPSHOT_KEY)
            .execute(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;
        Ok(())
    }
}
