//! Session coordinator: maps a (user, project-or-none) scope onto a live
//! backend session, creating one on first use.
//!
//! The single-active-session rule is kept by sequencing (deactivate, then
//! create) rather than by a store constraint. Two concurrent first contacts
//! for the same scope can both miss the lookup and mint two backend
//! sessions; that duplication is tolerated.

use std::path::Path;

use codegram_types::error::{AgentError, RepositoryError};
use codegram_types::project::{Project, ProjectId};
use codegram_types::session::{NewSession, Session, SessionScope};
use codegram_types::user::User;
use thiserror::Error;
use tracing::{debug, info};

use crate::agent::backend::{AgentBackend, CreateSessionRequest};
use crate::agent::relay::relay_message;
use crate::repository::session::SessionRepository;

/// Failure to resolve a session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Storage(#[from] RepositoryError),
}

/// Title given to backend sessions opened on behalf of `user`.
pub fn session_title(user: &User) -> String {
    format!("Telegram - {}", user.display_name())
}

/// Coordinates local session records with the agent backend.
pub struct SessionCoordinator<S: SessionRepository, A: AgentBackend> {
    repo: S,
    backend: A,
}

impl<S: SessionRepository, A: AgentBackend> SessionCoordinator<S, A> {
    pub fn new(repo: S, backend: A) -> Self {
        Self { repo, backend }
    }

    pub fn repo(&self) -> &S {
        &self.repo
    }

    pub fn backend(&self) -> &A {
        &self.backend
    }

    /// Get-or-create the active session for `(user, project_id)`.
    ///
    /// An existing active session is returned as-is with no backend call.
    /// Otherwise a backend session is opened, with `directory` as the working
    /// directory hint, and recorded as active for the scope.
    pub async fn resolve_session(
        &self,
        user: &User,
        project_id: Option<ProjectId>,
        directory: Option<&Path>,
    ) -> Result<Session, SessionError> {
        let scope = SessionScope {
            owner_id: user.id,
            project_id,
        };

        if let Some(existing) = self.repo.find_active(scope).await? {
            debug!(
                session_id = %existing.id,
                backend_session_id = %existing.backend_session_id,
                "Reusing active session"
            );
            return Ok(existing);
        }

        let title = session_title(user);
        let request = CreateSessionRequest {
            directory: directory.map(Path::to_path_buf),
            title: Some(title.clone()),
        };
        let backend_session_id = self.backend.create_session(&request).await?;

        let session = self
            .repo
            .insert(&NewSession {
                scope,
                backend_session_id,
                title: Some(title),
            })
            .await?;

        info!(
            telegram_id = user.telegram_id,
            session_id = %session.id,
            backend_session_id = %session.backend_session_id,
            project_id = ?project_id.map(|p| p.0),
            "Created backend session"
        );
        Ok(session)
    }

    /// Resolve the session free text should go to.
    ///
    /// The user's current scope is that of their most recently active
    /// session. With none active, an unscoped session is created.
    pub async fn resolve_current(&self, user: &User) -> Result<Session, SessionError> {
        match self.repo.find_latest_active(user.id).await? {
            Some(session) => Ok(session),
            None => self.resolve_session(user, None, None).await,
        }
    }

    /// Deactivate every session of the user, whatever its scope.
    pub async fn start_fresh(&self, user: &User) -> Result<u64, RepositoryError> {
        let count = self.repo.deactivate_all_for_owner(user.id).await?;
        info!(telegram_id = user.telegram_id, deactivated = count, "Started fresh");
        Ok(count)
    }

    /// Deactivate all of the user's sessions, then open one scoped to
    /// `project` with its path as the working directory.
    pub async fn switch_project(&self, user: &User, project: &Project) -> Result<Session, SessionError> {
        self.repo.deactivate_all_for_owner(user.id).await?;
        self.resolve_session(user, Some(project.id), Some(&project.path))
            .await
    }

    /// The user's sessions, most recent first.
    pub async fn recent_sessions(&self, user: &User, limit: u32) -> Result<Vec<Session>, RepositoryError> {
        self.repo.list_for_owner(user.id, limit).await
    }

    /// Bump the session's last-message timestamp.
    pub async fn record_activity(&self, session: &Session) -> Result<(), RepositoryError> {
        self.repo.touch(session.id).await
    }

    /// Relay `text` to the session's backend and return the display text.
    pub async fn relay(&self, session: &Session, text: &str) -> String {
        relay_message(&self.backend, &session.backend_session_id, text).await
    }
}
