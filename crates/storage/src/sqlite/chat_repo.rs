use tutor_core::model::{ChatMessage, UserId};

use super::{
    SqliteRepository,
    mapping::{conn, map_chat_row},
};
use crate::repository::{ChatRepository, StorageError};

#[async_trait::async_trait]
impl ChatRepository for SqliteRepository {
    async fn append_message(&self, message: &ChatMessage) -> Result<(), StorageError> {
        sqlx::query(
            r"
                INSERT INTO chat_history (id, user_id, message, response, timestamp)
                VALUES (?1, ?2, ?3, ?4, ?5)
            ",
        )
        .bind(message.id.to_string())
        .bind(message.user_id.to_string())
        .bind(&message.message)
        .bind(&message.response)
        .bind(message.timestamp)
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(())
    }

    async fn history_for_user(
        &self,
        user_id: UserId,
        limit: u32,
    ) -> Result<Vec<ChatMessage>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT id, user_id, message, response, timestamp
                FROM chat_history
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
            out.push(map_chat_row(&row)?);
        }
        Ok(out)
    }
}
