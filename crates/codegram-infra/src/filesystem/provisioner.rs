//! Git-backed project provisioner.
//!
//! Lays out `{projects_root}/{owner_id}/{token}`, writes a README, and makes
//! the initial commit. Collisions are resolved by probing `{token}-1`,
//! `{token}-2`, ... with a non-recursive `create_dir`, so two concurrent
//! provisions can never claim the same directory.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use codegram_core::service::provision::{ProjectProvisioner, sanitize_project_name};
use codegram_types::error::ProvisionError;
use codegram_types::user::UserId;
use tokio::process::Command;
use tracing::{debug, info};

use super::owner_dir;

const COMMIT_AUTHOR_NAME: &str = "codegram";
const COMMIT_AUTHOR_EMAIL: &str = "codegram@localhost";

/// Provisions project directories as fresh git repositories.
#[derive(Debug, Clone)]
pub struct GitProjectProvisioner {
    projects_root: PathBuf,
}

impl GitProjectProvisioner {
    pub fn new(projects_root: impl Into<PathBuf>) -> Self {
        Self {
            projects_root: projects_root.into(),
        }
    }

    pub fn projects_root(&self) -> &Path {
        &self.projects_root
    }

    /// Claim the first free directory for `token` under `parent`.
    async fn claim_dir(parent: &Path, token: &str) -> Result<PathBuf, ProvisionError> {
        tokio::fs::create_dir_all(parent).await?;

        let mut suffix = 0u32;
        loop {
            let candidate = if suffix == 0 {
                parent.join(token)
            } else {
                parent.join(format!("{token}-{suffix}"))
            };

            match tokio::fs::create_dir(&candidate).await {
                Ok(()) => return Ok(candidate),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    debug!(path = %candidate.display(), "Project path taken, trying next suffix");
                    suffix += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

async fn run_git(dir: &Path, step: &str, args: &[&str]) -> Result<(), ProvisionError> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| ProvisionError::Git {
            step: step.to_string(),
            message: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(ProvisionError::Git {
            step: step.to_string(),
            message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(())
}

fn readme(name: &str) -> String {
    format!("# {name}\n\nProject created via Telegram bot.\n")
}

impl ProjectProvisioner for GitProjectProvisioner {
    async fn provision(&self, owner_id: UserId, name: &str) -> Result<PathBuf, ProvisionError> {
        let token = sanitize_project_name(name);
        let parent = owner_dir(&self.projects_root, owner_id.0);
        let path = Self::claim_dir(&parent, &token).await?;

        tokio::fs::write(path.join("README.md"), readme(name)).await?;

        run_git(&path, "init", &["init", "--quiet"]).await?;
        run_git(&path, "add", &["add", "."]).await?;
        run_git(
            &path,
            "commit",
            &[
                "-c",
                &format!("user.name={COMMIT_AUTHOR_NAME}"),
                "-c",
                &format!("user.email={COMMIT_AUTHOR_EMAIL}"),
                "commit",
                "--quiet",
                "-m",
                "Initial commit",
            ],
        )
        .await?;

        info!(owner_id = %owner_id, path = %path.display(), "Provisioned project repository");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn git_available() -> bool {
        std::process::Command::new("git")
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    #[tokio::test]
    async fn test_provision_creates_committed_repo() {
        if !git_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let provisioner = GitProjectProvisioner::new(dir.path());

        let path = provisioner.provision(UserId(7), "My App!!").await.unwrap();
        assert_eq!(path, dir.path().join("7").join("myapp"));

        let readme = tokio::fs::read_to_string(path.join("README.md")).await.unwrap();
        assert_eq!(readme, "# My App!!\n\nProject created via Telegram bot.\n");

        let log = std::process::Command::new("git")
            .args(["log", "--format=%s"])
            .current_dir(&path)
            .output()
            .unwrap();
        assert_eq!(String::from_utf8_lossy(&log.stdout).trim(), "Initial commit");
    }

    #[tokio::test]
    async fn test_collisions_get_numeric_suffix() {
        if !git_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let provisioner = GitProjectProvisioner::new(dir.path());

        let first = provisioner.provision(UserId(7), "demo").await.unwrap();
        let second = provisioner.provision(UserId(7), "Demo").await.unwrap();
        let third = provisioner.provision(UserId(7), "demo!").await.unwrap();

        assert_eq!(first.file_name().unwrap(), "demo");
        assert_eq!(second.file_name().unwrap(), "demo-1");
        assert_eq!(third.file_name().unwrap(), "demo-2");
    }

    #[tokio::test]
    async fn test_owners_are_namespaced() {
        if !git_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let provisioner = GitProjectProvisioner::new(dir.path());

        let a = provisioner.provision(UserId(1), "demo").await.unwrap();
        let b = provisioner.provision(UserId(2), "demo").await.unwrap();
        assert_eq!(a.file_name(), b.file_name());
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_claim_dir_skips_existing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("app")).unwrap();

        let claimed = GitProjectProvisioner::claim_dir(dir.path(), "app").await.unwrap();
        assert_eq!(claimed, dir.path().join("app-1"));
    }

    #[tokio::test]
    async fn test_unwritable_root_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("not-a-dir");
        std::fs::write(&file, "x").unwrap();

        let provisioner = GitProjectProvisioner::new(&file);
        let err = provisioner.provision(UserId(1), "demo").await.unwrap_err();
        assert!(matches!(err, ProvisionError::Io(_)));
    }
}
