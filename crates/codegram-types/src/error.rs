use thiserror::Error;

/// Errors from repository operations (used by trait definitions in codegram-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors raised while laying out a project directory on disk.
///
/// Provisioning precedes cataloging, so a failure here means no project row
/// was written.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("filesystem error: {0}")]
    Io(String),

    #[error("git {step} failed: {message}")]
    Git { step: String, message: String },
}

impl From<std::io::Error> for ProvisionError {
    fn from(e: std::io::Error) -> Self {
        ProvisionError::Io(e.to_string())
    }
}

/// Errors from the remote coding-agent backend.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The backend answered with a non-success status code.
    #[error("backend returned status {status}")]
    Status { status: u16, body: String },

    /// The request did not complete in time. The backend may still finish the work.
    #[error("backend request timed out")]
    Timeout,

    #[error("{0}")]
    Transport(String),

    #[error("invalid backend response: {0}")]
    InvalidResponse(String),
}

/// Errors delivering a message through the chat platform.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("chat platform returned status {status}: {description}")]
    Status { status: u16, description: String },

    #[error("chat platform request failed: {0}")]
    Http(String),
}

/// Failures inside a command handler.
///
/// `Display` is the reply shown to the user; none of these escape the
/// webhook boundary.
#[derive(Debug, Error)]
pub enum CommandError {
    /// A required argument was missing. Carries the usage hint.
    #[error("{0}")]
    Usage(&'static str),

    #[error("Project '{0}' already exists. Choose a different name.")]
    DuplicateProject(String),

    #[error("Project '{0}' not found.\n\nUse /projects to see your projects.")]
    ProjectNotFound(String),

    #[error("Failed to create project: {0}")]
    CreateProject(String),

    #[error("Failed to switch project: {0}")]
    SwitchProject(String),

    #[error("Something went wrong: {0}")]
    Storage(#[from] RepositoryError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }

    #[test]
    fn test_agent_status_error_embeds_code() {
        let err = AgentError::Status {
            status: 502,
            body: "bad gateway".to_string(),
        };
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn test_provision_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ProvisionError = io.into();
        assert!(matches!(err, ProvisionError::Io(_)));
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_command_error_replies() {
        assert_eq!(
            CommandError::DuplicateProject("demo".to_string()).to_string(),
            "Project 'demo' already exists. Choose a different name."
        );
        assert!(
            CommandError::ProjectNotFound("ghost".to_string())
                .to_string()
                .starts_with("Project 'ghost' not found.")
        );
        assert_eq!(
            CommandError::CreateProject("git init failed".to_string()).to_string(),
            "Failed to create project: git init failed"
        );
    }
}
