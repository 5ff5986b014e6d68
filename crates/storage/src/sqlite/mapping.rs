use sqlx::Row;

use tutor_core::model::{
    ChatMessage, ProgressEntry, ProgressId, QuestionSet, QuizId, QuizRecord, UserAccount, UserId,
};

use crate::repository::{AuthSession, StorageError};

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

pub(crate) fn parse_user_id(s: &str) -> Result<UserId, StorageError> {
    s.parse::<UserId>().map_err(ser)
}

fn i64_to_u32(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

fn i64_to_u64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn map_account_row(row: &sqlx::sqlite::SqliteRow) -> Result<UserAccount, StorageError> {
    let id = parse_user_id(&row.try_get::<String, _>("id").map_err(ser)?)?;
    let badges_json: String = row.try_get("badges").map_err(ser)?;
    let badges: Vec<String> = serde_json::from_str(&badges_json).map_err(ser)?;

    Ok(UserAccount {
        id,
        email: row.try_get("email").map_err(ser)?,
        name: row.try_get("name").map_err(ser)?,
        password_hash: row.try_get("password_hash").map_err(ser)?,
        xp: i64_to_u64("xp", row.try_get("xp").map_err(ser)?)?,
        level: i64_to_u32("level", row.try_get("level").map_err(ser)?)?,
        badges,
        language: row.try_get("language").map_err(ser)?,
        created_at: row.try_get("created_at").map_err(ser)?,
    })
}

pub(crate) fn map_session_row(row: &sqlx::sqlite::SqliteRow) -> Result<AuthSession, StorageError> {
    Ok(AuthSession {
        token: row.try_get("token").map_err(ser)?,
        user_id: parse_user_id(&row.try_get::<String, _>("user_id").map_err(ser)?)?,
        created_at: row.try_get("created_at").map_err(ser)?,
        expires_at: row.try_get("expires_at").map_err(ser)?,
    })
}

pub(crate) fn map_quiz_row(row: &sqlx::sqlite::SqliteRow) -> Result<QuizRecord, StorageError> {
    let id: String = row.try_get("id").map_err(ser)?;
    let questions_json: String = row.try_get("questions").map_err(ser)?;
    let questions: QuestionSet = serde_json::from_str(&questions_json).map_err(ser)?;

    let score = row
        .try_get::<Option<i64>, _>("score")
        .map_err(ser)?
        .map(|v| i64_to_u32("score", v))
        .transpose()?;

    Ok(QuizRecord {
        id: id.parse::<QuizId>().map_err(ser)?,
        user_id: parse_user_id(&row.try_get::<String, _>("user_id").map_err(ser)?)?,
        topic: row.try_get("topic").map_err(ser)?,
        questions,
        score,
        completed: row.try_get::<i64, _>("completed").map_err(ser)? != 0,
        created_at: row.try_get("created_at").map_err(ser)?,
    })
}

pub(crate) fn map_progress_row(row: &sqlx::sqlite::SqliteRow) -> Result<ProgressEntry, StorageError> {
    let id: String = row.try_get("id").map_err(ser)?;

    Ok(ProgressEntry {
        id: id.parse::<ProgressId>().map_err(ser)?,
        user_id: parse_user_id(&row.try_get::<String, _>("user_id").map_err(ser)?)?,
        subject: row.try_get("subject").map_err(ser)?,
        topic: row.try_get("topic").map_err(ser)?,
        score: i64_to_u32("score", row.try_get("score").map_err(ser)?)?,
        completed: row.try_get::<i64, _>("completed").map_err(ser)? != 0,
        timestamp: row.try_get("timestamp").map_err(ser)?,
    })
}

pub(crate) fn map_chat_row(row: &sqlx::sqlite::SqliteRow) -> Result<ChatMessage, StorageError> {
    let id: String = row.try_get("id").map_err(ser)?;

    Ok(ChatMessage {
        id: id.parse().map_err(ser)?,
        user_id: parse_user_id(&row.try_get::<String, _>("user_id").map_err(ser)?)?,
        message: row.try_get("message").map_err(ser)?,
        response: row.try_get("response").map_err(ser)?,
        timestamp: row.try_get("timestamp").map_err(ser)?,
    })
}
