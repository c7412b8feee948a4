//! SQLite session repository implementation.
//!
//! Scope lookups use `project_id IS ?` so that "no project" (NULL) is matched
//! as its own scope rather than as a wildcard.

use codegram_core::repository::session::SessionRepository;
use codegram_types::error::RepositoryError;
use codegram_types::project::ProjectId;
use codegram_types::session::{NewSession, Session, SessionId, SessionScope};
use codegram_types::user::UserId;
use sqlx::Row;

use super::{parse_datetime, query_error};
use super::pool::DatabasePool;

/// SQLite-backed implementation of `SessionRepository`.
pub struct SqliteSessionRepository {
    pool: DatabasePool,
}

impl SqliteSessionRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct SessionRow {
    id: i64,
    user_id: i64,
    project_id: Option<i64>,
    backend_session_id: String,
    title: Option<String>,
    is_active: bool,
    created_at: String,
    last_message_at: String,
}

impl SessionRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            project_id: row.try_get("project_id")?,
            backend_session_id: row.try_get("backend_session_id")?,
            title: row.try_get("title")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get("created_at")?,
            last_message_at: row.try_get("last_message_at")?,
        })
    }

    fn into_session(self) -> Result<Session, RepositoryError> {
        Ok(Session {
            id: SessionId(self.id),
            owner_id: UserId(self.user_id),
            project_id: self.project_id.map(ProjectId),
            backend_session_id: self.backend_session_id,
            title: self.title,
            is_active: self.is_active,
            created_at: parse_datetime(&self.created_at)?,
            last_message_at: parse_datetime(&self.last_message_at)?,
        })
    }
}

fn map_session(row: &sqlx::sqlite::SqliteRow) -> Result<Session, RepositoryError> {
    SessionRow::from_row(row).map_err(query_error)?.into_session()
}

impl SessionRepository for SqliteSessionRepository {
    async fn get_by_backend_id(&self, backend_session_id: &str) -> Result<Option<Session>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM sessions WHERE backend_session_id = ?")
            .bind(backend_session_id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        row.as_ref().map(map_session).transpose()
    }

    async fn find_active(&self, scope: SessionScope) -> Result<Option<Session>, RepositoryError> {
        let row = sqlx::query(
            r#"SELECT * FROM sessions
               WHERE user_id = ? AND project_id IS ? AND is_active = 1
               ORDER BY last_message_at DESC, id DESC
               LIMIT 1"#,
        )
        .bind(scope.owner_id.0)
        .bind(scope.project_id.map(|p| p.0))
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(query_error)?;

        row.as_ref().map(map_session).transpose()
    }

    async fn find_latest_active(&self, owner_id: UserId) -> Result<Option<Session>, RepositoryError> {
        let row = sqlx::query(
            r#"SELECT * FROM sessions
               WHERE user_id = ? AND is_active = 1
               ORDER BY last_message_at DESC, id DESC
               LIMIT 1"#,
        )
        .bind(owner_id.0)
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(query_error)?;

        row.as_ref().map(map_session).transpose()
    }

    async fn list_for_owner(&self, owner_id: UserId, limit: u32) -> Result<Vec<Session>, RepositoryError> {
        let rows = sqlx::query(
            r#"SELECT * FROM sessions
               WHERE user_id = ?
               ORDER BY last_message_at DESC, id DESC
               LIMIT ?"#,
        )
        .bind(owner_id.0)
        .bind(i64::from(limit))
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        rows.iter().map(map_session).collect()
    }

    async fn insert(&self, session: &NewSession) -> Result<Session, RepositoryError> {
        let result = sqlx::query(
            r#"INSERT INTO sessions (user_id, project_id, backend_session_id, title)
               VALUES (?, ?, ?, ?)
               RETURNING *"#,
        )
        .bind(session.scope.owner_id.0)
        .bind(session.scope.project_id.map(|p| p.0))
        .bind(&session.backend_session_id)
        .bind(&session.title)
        .fetch_one(&self.pool.writer)
        .await;

        match result {
            Ok(row) => map_session(&row),
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("UNIQUE") => {
                Err(RepositoryError::Conflict(format!(
                    "backend session '{}' already recorded",
                    session.backend_session_id
                )))
            }
            Err(e) => Err(query_error(e)),
        }
    }

    async fn touch(&self, id: SessionId) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE sessions SET last_message_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') WHERE id = ?",
        )
        .bind(id.0)
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn set_title(&self, id: SessionId, title: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE sessions SET title = ? WHERE id = ?")
            .bind(title)
            .bind(id.0)
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn deactivate(&self, id: SessionId) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE sessions SET is_active = 0 WHERE id = ?")
            .bind(id.0)
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;
        Ok(())
    }

    async fn deactivate_all_for_owner(&self, owner_id: UserId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("UPDATE sessions SET is_active = 0 WHERE user_id = ? AND is_active = 1")
            .bind(owner_id.0)
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        Ok(result.rows_affected())
    }
}
