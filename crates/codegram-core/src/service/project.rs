//! Project management service.
//!
//! Creating a project is two steps: provision the directory, then catalog
//! it. There is no compensating action if the second step fails; the
//! directory stays on disk and the next attempt gets a suffixed path.

use codegram_types::error::{CommandError, RepositoryError};
use codegram_types::project::{NewProject, Project};
use codegram_types::user::UserId;
use tracing::{info, warn};

use crate::repository::project::ProjectRepository;
use crate::service::provision::ProjectProvisioner;

/// Service orchestrating the project catalog and on-disk provisioning.
///
/// Generic over the repository and provisioner to keep codegram-core free
/// of I/O dependencies.
pub struct ProjectService<P: ProjectRepository, F: ProjectProvisioner> {
    repo: P,
    provisioner: F,
}

impl<P: ProjectRepository, F: ProjectProvisioner> ProjectService<P, F> {
    pub fn new(repo: P, provisioner: F) -> Self {
        Self { repo, provisioner }
    }

    /// Access the project repository.
    pub fn repo(&self) -> &P {
        &self.repo
    }

    /// Create a project for `owner_id`.
    ///
    /// Rejects an empty or duplicate name before touching the filesystem.
    /// On provisioning failure no row is written.
    pub async fn create_project(
        &self,
        owner_id: UserId,
        name: &str,
        description: Option<&str>,
    ) -> Result<Project, CommandError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CommandError::Usage(
                "Please provide a project name.\n\nUsage: /newproject my-awesome-app",
            ));
        }

        if self.repo.get_by_name(owner_id, name).await?.is_some() {
            return Err(CommandError::DuplicateProject(name.to_string()));
        }

        let path = self
            .provisioner
            .provision(owner_id, name)
            .await
            .map_err(|e| {
                warn!(owner_id = %owner_id, name, error = %e, "Project provisioning failed");
                CommandError::CreateProject(e.to_string())
            })?;

        let new_project = NewProject {
            owner_id,
            name: name.to_string(),
            description: description
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
            path,
        };

        let project = self.repo.insert(&new_project).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => CommandError::DuplicateProject(name.to_string()),
            other => CommandError::CreateProject(other.to_string()),
        })?;

        info!(
            owner_id = %owner_id,
            project_id = %project.id,
            path = %project.path.display(),
            "Project created"
        );
        Ok(project)
    }

    /// Look up one of the owner's projects by name.
    pub async fn find_project(&self, owner_id: UserId, name: &str) -> Result<Project, CommandError> {
        let name = name.trim();
        self.repo
            .get_by_name(owner_id, name)
            .await?
            .ok_or_else(|| CommandError::ProjectNotFound(name.to_string()))
    }

    /// List the owner's projects, most recently updated first.
    pub async fn list_projects(&self, owner_id: UserId) -> Result<Vec<Project>, RepositoryError> {
        self.repo.list_for_owner(owner_id).await
    }

    /// Rename a project. The directory keeps its original path.
    pub async fn rename_project(
        &self,
        owner_id: UserId,
        name: &str,
        new_name: &str,
    ) -> Result<Project, CommandError> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(CommandError::Usage("The new project name cannot be empty."));
        }

        let project = self.find_project(owner_id, name).await?;
        if project.name != new_name && self.repo.get_by_name(owner_id, new_name).await?.is_some() {
            return Err(CommandError::DuplicateProject(new_name.to_string()));
        }

        self.repo
            .rename(project.id, new_name)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => CommandError::DuplicateProject(new_name.to_string()),
                other => CommandError::Storage(other),
            })?;

        info!(project_id = %project.id, new_name, "Project renamed");
        self.find_project(owner_id, new_name).await
    }

    /// Replace or clear a project's description.
    pub async fn describe_project(
        &self,
        owner_id: UserId,
        name: &str,
        description: Option<&str>,
    ) -> Result<Project, CommandError> {
        let project = self.find_project(owner_id, name).await?;
        let description = description.map(str::trim).filter(|d| !d.is_empty());
        self.repo.describe(project.id, description).await?;
        self.find_project(owner_id, &project.name).await
    }

    /// Remove a project from the catalog only.
    ///
    /// The directory is left on disk and sessions referencing the project
    /// keep their now-dangling `project_id`.
    pub async fn delete_project(&self, owner_id: UserId, name: &str) -> Result<Project, CommandError> {
        let project = self.find_project(owner_id, name).await?;
        if !self.repo.delete(project.id).await? {
            return Err(CommandError::ProjectNotFound(project.name));
        }
        info!(project_id = %project.id, "Project removed from catalog");
        Ok(project)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeProvisioner, InMemoryProjects};

    fn service(provisioner: FakeProvisioner) -> ProjectService<InMemoryProjects, FakeProvisioner> {
        ProjectService::new(InMemoryProjects::default(), provisioner)
    }

    #[tokio::test]
    async fn create_provisions_then_catalogs() {
        let svc = service(FakeProvisioner::new("/data/projects"));
        let project = svc
            .create_project(UserId(1), "demo", Some("  a demo  "))
            .await
            .unwrap();

        assert_eq!(project.name, "demo");
        assert_eq!(project.description.as_deref(), Some("a demo"));
        assert_eq!(project.path.to_str(), Some("/data/projects/1/demo"));
        assert_eq!(svc.repo().len(), 1);
    }

    #[tokio::test]
    async fn duplicate_name_rejected_without_second_row() {
        let provisioner = FakeProvisioner::new("/data/projects");
        let svc = service(provisioner.clone());
        svc.create_project(UserId(1), "demo", None).await.unwrap();

        let err = svc.create_project(UserId(1), "demo", None).await.unwrap_err();
        assert!(matches!(err, CommandError::DuplicateProject(ref n) if n == "demo"));
        assert_eq!(svc.repo().len(), 1);
        assert_eq!(provisioner.calls(), 1);
    }

    #[tokio::test]
    async fn same_name_for_other_owner_is_fine() {
        let svc = service(FakeProvisioner::new("/p"));
        svc.create_project(UserId(1), "demo", None).await.unwrap();
        svc.create_project(UserId(2), "demo", None).await.unwrap();
        assert_eq!(svc.repo().len(), 2);
    }

    #[tokio::test]
    async fn empty_name_is_usage_error() {
        let svc = service(FakeProvisioner::new("/p"));
        let err = svc.create_project(UserId(1), "   ", None).await.unwrap_err();
        assert!(matches!(err, CommandError::Usage(_)));
    }

    #[tokio::test]
    async fn provision_failure_writes_no_row() {
        let svc = service(FakeProvisioner::failing());
        let err = svc.create_project(UserId(1), "demo", None).await.unwrap_err();
        assert!(matches!(err, CommandError::CreateProject(_)));
        assert_eq!(svc.repo().len(), 0);
    }

    #[tokio::test]
    async fn rename_keeps_path_and_rejects_taken_name() {
        let svc = service(FakeProvisioner::new("/p"));
        let original = svc.create_project(UserId(1), "demo", None).await.unwrap();
        svc.create_project(UserId(1), "other", None).await.unwrap();

        let err = svc.rename_project(UserId(1), "demo", "other").await.unwrap_err();
        assert!(matches!(err, CommandError::DuplicateProject(_)));

        let renamed = svc.rename_project(UserId(1), "demo", "shiny").await.unwrap();
        assert_eq!(renamed.id, original.id);
        assert_eq!(renamed.path, original.path);
    }

    #[tokio::test]
    async fn describe_and_delete() {
        let svc = service(FakeProvisioner::new("/p"));
        svc.create_project(UserId(1), "demo", None).await.unwrap();

        let described = svc
            .describe_project(UserId(1), "demo", Some("now with words"))
            .await
            .unwrap();
        assert_eq!(described.description.as_deref(), Some("now with words"));

        svc.delete_project(UserId(1), "demo").await.unwrap();
        let err = svc.find_project(UserId(1), "demo").await.unwrap_err();
        assert!(matches!(err, CommandError::ProjectNotFound(_)));
    }
}
