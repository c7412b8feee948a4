//! SQLite project repository implementation.

use std::path::PathBuf;

use codegram_core::repository::project::ProjectRepository;
use codegram_types::error::RepositoryError;
use codegram_types::project::{NewProject, Project, ProjectId};
use codegram_types::user::UserId;
use sqlx::Row;

use super::{parse_datetime, query_error};
use super::pool::DatabasePool;

/// SQLite-backed implementation of `ProjectRepository`.
pub struct SqliteProjectRepository {
    pool: DatabasePool,
}

impl SqliteProjectRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct ProjectRow {
    id: i64,
    user_id: i64,
    name: String,
    description: Option<String>,
    path: String,
    created_at: String,
    updated_at: String,
}

impl ProjectRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            path: row.try_get("path")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_project(self) -> Result<Project, RepositoryError> {
        Ok(Project {
            id: ProjectId(self.id),
            owner_id: UserId(self.user_id),
            name: self.name,
            description: self.description,
            path: PathBuf::from(self.path),
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

fn map_project(row: &sqlx::sqlite::SqliteRow) -> Result<Project, RepositoryError> {
    ProjectRow::from_row(row).map_err(query_error)?.into_project()
}

fn map_write_error(e: sqlx::Error, name: &str) -> RepositoryError {
    match e {
        sqlx::Error::Database(db_err) if db_err.message().contains("UNIQUE") => {
            RepositoryError::Conflict(format!("project '{name}' already exists"))
        }
        e => query_error(e),
    }
}

impl ProjectRepository for SqliteProjectRepository {
    async fn get(&self, id: ProjectId) -> Result<Option<Project>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM projects WHERE id = ?")
            .bind(id.0)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        row.as_ref().map(map_project).transpose()
    }

    async fn get_by_name(&self, owner_id: UserId, name: &str) -> Result<Option<Project>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM projects WHERE user_id = ? AND name = ?")
            .bind(owner_id.0)
            .bind(name)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        row.as_ref().map(map_project).transpose()
    }

    async fn list_for_owner(&self, owner_id: UserId) -> Result<Vec<Project>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM projects WHERE user_id = ? ORDER BY updated_at DESC, id DESC",
        )
        .bind(owner_id.0)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        rows.iter().map(map_project).collect()
    }

    async fn insert(&self, project: &NewProject) -> Result<Project, RepositoryError> {
        let path = project.path.to_string_lossy().into_owned();
        let row = sqlx::query(
            r#"INSERT INTO projects (user_id, name, description, path)
               VALUES (?, ?, ?, ?)
               RETURNING *"#,
        )
        .bind(project.owner_id.0)
        .bind(&project.name)
        .bind(&project.description)
        .bind(path)
        .fetch_one(&self.pool.writer)
        .await
        .map_err(|e| map_write_error(e, &project.name))?;

        map_project(&row)
    }

    async fn rename(&self, id: ProjectId, name: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"UPDATE projects
               SET name = ?, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
               WHERE id = ?"#,
        )
        .bind(name)
        .bind(id.0)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| map_write_error(e, name))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn describe(&self, id: ProjectId, description: Option<&str>) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"UPDATE projects
               SET description = ?, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
               WHERE id = ?"#,
        )
        .bind(description)
        .bind(id.0)
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, id: ProjectId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id.0)
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;

        Ok(result.rows_affected() > 0)
    }
}
