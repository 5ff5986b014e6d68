use tutor_core::model::{QuizId, QuizRecord, UserId};

use super::{
    SqliteRepository,
    mapping::{conn, map_quiz_row, ser},
};
use crate::repository::{QuizRepository, StorageError};

#[async_trait::async_trait]
impl QuizRepository for SqliteRepository {
    async fn insert_quiz(&self, quiz: &QuizRecord) -> Result<(), StorageError> {
        let questions = serde_json::to_string(&quiz.questions).map_err(ser)?;

        sqlx::query(
            r"
                INSERT INTO quizzes (
                    id, user_id, topic, questions, score, completed, created_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ",
        )
        .bind(quiz.id.to_string())
        .bind(quiz.user_id.to_string())
        .bind(&quiz.topic)
        .bind(questions)
        .bind(quiz.score.map(i64::from))
        .bind(i64::from(quiz.completed))
        .bind(quiz.created_at)
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(())
    }

    async fn get_quiz(&self, id: QuizId, owner: UserId) -> Result<QuizRecord, StorageError> {
        let row = sqlx::query(
            r"
                SELECT id, user_id, topic, questions, score, completed, created_at
                FROM quizzes
                WHERE id = ?1 AND user_id = ?2
            ",
        )
        .bind(id.to_string())
        .bind(owner.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?
        .ok_or(StorageError::NotFound)?;

        map_quiz_row(&row)
    }

    async fn list_quizzes(
        &self,
        owner: UserId,
        limit: u32,
    ) -> Result<Vec<QuizRecord>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT id, user_id, topic, questions, score, completed, created_at
                FROM quizzes
                WHERE user_id = ?1
                ORDER BY created_at DESC
                LIMIT ?2
            ",
        )
        .bind(owner.to_string())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_quiz_row(&row)?);
        }
        Ok(out)
    }

    async fn record_result(&self, id: QuizId, score: u32) -> Result<(), StorageError> {
        let res = sqlx::query("UPDATE quizzes SET score = ?1, completed = 1 WHERE id = ?2")
            .bind(i64::from(score))
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(conn)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}
