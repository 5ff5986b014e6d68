use tutor_core::model::{UserAccount, UserId};

use super::{
    SqliteRepository,
    mapping::{conn, map_account_row, ser},
};
use crate::repository::{AccountRepository, StorageError};

fn insert_error(e: sqlx::Error) -> StorageError {
    // A duplicate email trips the UNIQUE constraint on users.email.
    if e.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
    {
        StorageError::Conflict
    } else {
        conn(e)
    }
}

#[async_trait::async_trait]
impl AccountRepository for SqliteRepository {
    async fn insert_account(&self, account: &UserAccount) -> Result<(), StorageError> {
        let badges = serde_json::to_string(&account.badges).map_err(ser)?;

        sqlx::query(
            r"
                INSERT INTO users (
                    id, email, name, password_hash, xp, level, badges, language, created_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ",
        )
        .bind(account.id.to_string())
        .bind(&account.email)
        .bind(&account.name)
        .bind(&account.password_hash)
        .bind(i64::try_from(account.xp).map_err(ser)?)
        .bind(i64::from(account.level))
        .bind(badges)
        .bind(&account.language)
        .bind(account.created_at)
        .execute(&self.pool)
        .await
        .map_err(insert_error)?;

        Ok(())
    }

    async fn get_account(&self, id: UserId) -> Result<UserAccount, StorageError> {
        let row = sqlx::query(
            r"
                SELECT id, email, name, password_hash, xp, level, badges, language, created_at
                FROM users
                WHERE id = ?1
            ",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?
        .ok_or(StorageError::NotFound)?;

        map_account_row(&row)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, StorageError> {
        let row = sqlx::query(
            r"
                SELECT id, email, name, password_hash, xp, level, badges, language, created_at
                FROM users
                WHERE email = ?1
            ",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        row.as_ref().map(map_account_row).transpose()
    }

    async fn add_xp(&self, id: UserId, amount: u64) -> Result<(), StorageError> {
        let res = sqlx::query("UPDATE users SET xp = xp + ?1 WHERE id = ?2")
            .bind(i64::try_from(amount).map_err(ser)?)
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
