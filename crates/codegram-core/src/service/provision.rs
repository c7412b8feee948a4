//! ProjectProvisioner trait and project-name sanitizing.
//!
//! Provisioning lays out a directory with an initialized repository. It runs
//! before the catalog insert, so a failure leaves no project row behind.

use std::path::PathBuf;

use codegram_types::error::ProvisionError;
use codegram_types::user::UserId;

/// Directory token used when a requested name sanitizes to nothing.
pub const DEFAULT_PROJECT_DIR: &str = "project";

/// Abstraction over creating a project's working directory.
///
/// The `GitProjectProvisioner` adapter lives in codegram-infra.
pub trait ProjectProvisioner: Send + Sync {
    /// Create a fresh directory for `name` under the owner's namespace and
    /// return its path. Never reuses an existing path.
    fn provision(
        &self,
        owner_id: UserId,
        name: &str,
    ) -> impl std::future::Future<Output = Result<PathBuf, ProvisionError>> + Send;
}

/// Reduce a requested project name to a filesystem-safe directory token.
///
/// Keeps alphanumerics, `-` and `_`, lowercased. Empty results map to
/// [`DEFAULT_PROJECT_DIR`].
pub fn sanitize_project_name(name: &str) -> String {
    let token: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
        .flat_map(char::to_lowercase)
        .collect();

    if token.is_empty() {
        DEFAULT_PROJECT_DIR.to_string()
    } else {
        token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_punctuation_and_spaces() {
        assert_eq!(sanitize_project_name("My App!!"), "myapp");
    }

    #[test]
    fn keeps_hyphen_and_underscore() {
        assert_eq!(sanitize_project_name("Web-API_v2"), "web-api_v2");
    }

    #[test]
    fn rejects_path_traversal() {
        assert_eq!(sanitize_project_name("../../etc"), "etc");
        assert_eq!(sanitize_project_name("a/b\\c"), "abc");
    }

    #[test]
    fn empty_maps_to_default() {
        assert_eq!(sanitize_project_name(""), DEFAULT_PROJECT_DIR);
        assert_eq!(sanitize_project_name("!!! ..."), DEFAULT_PROJECT_DIR);
    }
}
