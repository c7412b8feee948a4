use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;

use crate::project::ProjectId;
use crate::user::UserId;

/// Store-assigned row identifier for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub i64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The key used to locate a user's active session.
///
/// "No project" is its own scope, distinct from every concrete project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionScope {
    pub owner_id: UserId,
    pub project_id: Option<ProjectId>,
}

impl SessionScope {
    pub fn unscoped(owner_id: UserId) -> Self {
        Self {
            owner_id,
            project_id: None,
        }
    }

    pub fn project(owner_id: UserId, project_id: ProjectId) -> Self {
        Self {
            owner_id,
            project_id: Some(project_id),
        }
    }
}

/// Local record of a conversation held by the agent backend.
///
/// At most one row per [`SessionScope`] is active at a time. Rows are
/// deactivated, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub owner_id: UserId,
    /// May point at a project row that has since been deleted.
    pub project_id: Option<ProjectId>,
    /// Opaque identifier minted by the agent backend.
    pub backend_session_id: String,
    pub title: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub last_message_at: DateTime<Utc>,
}

impl Session {
    pub fn scope(&self) -> SessionScope {
        SessionScope {
            owner_id: self.owner_id,
            project_id: self.project_id,
        }
    }
}

/// Fields needed to record a backend session that was just created.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub scope: SessionScope,
    pub backend_session_id: String,
    pub title: Option<String>,
}
