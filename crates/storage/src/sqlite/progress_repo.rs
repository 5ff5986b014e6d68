use tutor_core::model::{ProgressEntry, UserId};

use super::{
    SqliteRepository,
    mapping::{conn, map_progress_row},
};
use crate::repository::{ProgressRepository, StorageError};

#[async_trait::async_trait]
impl ProgressRepository for SqliteRepository {
    async fn append_entry(&self, entry: &ProgressEntry) -> Result<(), StorageError> {
        sqlx::query(
            r"
                INSERT INTO progress (
                    id, user_id, subject, topic, score, completed, timestamp
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ",
        )
        .bind(entry.id.to_string())
        .bind(entry.user_id.to_string())
        .bind(&entry.subject)
        .bind(&entry.topic)
        .bind(i64::from(entry.score))
        .bind(i64::from(entry.completed))
        .bind(entry.timestamp)
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(())
    }

    async fn entries_for_user(
        &self,
        user_id: UserId,
        limit: u32,
    ) -> Result<Vec<ProgressEntry>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT id, user_id, subject, topic, score, completed, timestamp
                FROM progress
                WHERE user_id = ?1
                ORDER BY timestamp ASC
                LIMIT ?2
            ",
        )
        .bind(user_id.to_string())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_progress_row(&row)?);
        }
        Ok(out)
    }
}
