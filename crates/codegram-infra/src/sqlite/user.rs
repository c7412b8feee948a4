//! SQLite user repository implementation.
//!
//! Users are created lazily on first contact with a single upsert, so two
//! deliveries racing on a new identity still produce exactly one row.

use codegram_core::repository::user::UserRepository;
use codegram_types::error::RepositoryError;
use codegram_types::user::{User, UserContact, UserId};
use sqlx::Row;

use super::{parse_datetime, query_error};
use super::pool::DatabasePool;

/// SQLite-backed implementation of `UserRepository`.
pub struct SqliteUserRepository {
    pool: DatabasePool,
}

impl SqliteUserRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct UserRow {
    id: i64,
    telegram_id: i64,
    username: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    is_whitelisted: bool,
    created_at: String,
    last_active_at: String,
}

impl UserRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            telegram_id: row.try_get("telegram_id")?,
            username: row.try_get("username")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            is_whitelisted: row.try_get("is_whitelisted")?,
            created_at: row.try_get("created_at")?,
            last_active_at: row.try_get("last_active_at")?,
        })
    }

    fn into_user(self) -> Result<User, RepositoryError> {
        Ok(User {
            id: UserId(self.id),
            telegram_id: self.telegram_id,
            username: self.username,
            first_name: self.first_name,
            last_name: self.last_name,
            is_whitelisted: self.is_whitelisted,
            created_at: parse_datetime(&self.created_at)?,
            last_active_at: parse_datetime(&self.last_active_at)?,
        })
    }
}

fn map_user(row: &sqlx::sqlite::SqliteRow) -> Result<User, RepositoryError> {
    UserRow::from_row(row).map_err(query_error)?.into_user()
}

impl UserRepository for SqliteUserRepository {
    async fn get_by_telegram_id(&self, telegram_id: i64) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM users WHERE telegram_id = ?")
            .bind(telegram_id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        row.as_ref().map(map_user).transpose()
    }

    async fn upsert_contact(&self, contact: &UserContact) -> Result<User, RepositoryError> {
        let row = sqlx::query(
            r#"INSERT INTO users (telegram_id, username, first_name, last_name)
               VALUES (?, ?, ?, ?)
               ON CONFLICT(telegram_id) DO UPDATE SET
                   username = COALESCE(excluded.username, users.username),
                   first_name = COALESCE(excluded.first_name, users.first_name),
                   last_name = COALESCE(excluded.last_name, users.last_name),
                   last_active_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
               RETURNING *"#,
        )
        .bind(contact.telegram_id)
        .bind(&contact.username)
        .bind(&contact.first_name)
        .bind(&contact.last_name)
        .fetch_one(&self.pool.writer)
        .await
        .map_err(query_error)?;

        map_user(&row)
    }

    async fn set_whitelisted(&self, telegram_id: i64, whitelisted: bool) -> Result<bool, RepositoryError> {
        let result = sqlx::query("UPDATE users SET is_whitelisted = ? WHERE telegram_id = ?")
            .bind(whitelisted)
            .bind(telegram_id)
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        Ok(result.rows_affected() > 0)
    }
}
