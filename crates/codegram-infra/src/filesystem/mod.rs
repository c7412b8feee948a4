//! Filesystem adapters for codegram.
//!
//! Provides the git-backed `ProjectProvisioner` and helpers for the data
//! directory layout.

pub mod provisioner;

use std::path::{Path, PathBuf};

/// Root of all provisioned projects: `{data_dir}/projects`.
pub fn projects_root(data_dir: &Path) -> PathBuf {
    data_dir.join("projects")
}

/// Per-owner project namespace: `{projects_root}/{owner_id}`.
pub fn owner_dir(projects_root: &Path, owner_id: i64) -> PathBuf {
    projects_root.join(owner_id.to_string())
}
