//! ProjectRepository trait definition.

use codegram_types::error::RepositoryError;
use codegram_types::project::{NewProject, Project, ProjectId};
use codegram_types::user::UserId;

/// Repository trait for the project catalog.
///
/// Rows only describe projects; deleting one never touches the directory on
/// disk or the sessions that reference it.
pub trait ProjectRepository: Send + Sync {
    /// Get a project by row id.
    fn get(
        &self,
        id: ProjectId,
    ) -> impl std::future::Future<Output = Result<Option<Project>, RepositoryError>> + Send;

    /// Get a project by its natural key `(owner, name)`.
    fn get_by_name(
        &self,
        owner_id: UserId,
        name: &str,
    ) -> impl std::future::Future<Output = Result<Option<Project>, RepositoryError>> + Send;

    /// List an owner's projects, most recently updated first.
    fn list_for_owner(
        &self,
        owner_id: UserId,
    ) -> impl std::future::Future<Output = Result<Vec<Project>, RepositoryError>> + Send;

    /// Insert a new project. Fails with `Conflict` if `(owner, name)` is taken.
    fn insert(
        &self,
        project: &NewProject,
    ) -> impl std::future::Future<Output = Result<Project, RepositoryError>> + Send;

    /// Change a project's name. The path is left as provisioned.
    fn rename(
        &self,
        id: ProjectId,
        name: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Replace a project's description (`None` clears it).
    fn describe(
        &self,
        id: ProjectId,
        description: Option<&str>,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Remove a project from the catalog. Returns `false` if it did not exist.
    fn delete(
        &self,
        id: ProjectId,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;
}
