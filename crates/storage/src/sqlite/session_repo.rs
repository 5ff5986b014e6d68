use super::{
    SqliteRepository,
    mapping::{conn, map_session_row},
};
use crate::repository::{AuthSession, SessionRepository, StorageError};

#[async_trait::async_trait]
impl SessionRepository for SqliteRepository {
    async fn insert_session(&self, session: &AuthSession) -> Result<(), StorageError> {
        sqlx::query(
            r"
                INSERT INTO auth_sessions (token, user_id, created_at, expires_at)
                VALUES (?1, ?2, ?3, ?4)
            ",
        )
        .bind(&session.token)
        .bind(session.user_id.to_string())
        .bind(session.created_at)
        .bind(session.expires_at)
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(())
    }

    async fn get_session(&self, token: &str) -> Result<Option<AuthSession>, StorageError> {
        let row = sqlx::query(
            r"
                SELECT token, user_id, created_at, expires_at
                FROM auth_sessions
                WHERE token = ?1
            ",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        row.as_ref().map(map_session_row).transpose()
    }
}
