//! SessionRepository trait definition.

use codegram_types::error::RepositoryError;
use codegram_types::session::{NewSession, Session, SessionId, SessionScope};
use codegram_types::user::UserId;

/// Repository trait for local records of backend sessions.
///
/// Sessions are never physically deleted. The single-active-session rule is
/// kept by callers deactivating before inserting, not by a constraint here.
pub trait SessionRepository: Send + Sync {
    /// Look up a session by the identifier the agent backend minted.
    fn get_by_backend_id(
        &self,
        backend_session_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<Session>, RepositoryError>> + Send;

    /// The most recently active session for exactly this scope, if any.
    fn find_active(
        &self,
        scope: SessionScope,
    ) -> impl std::future::Future<Output = Result<Option<Session>, RepositoryError>> + Send;

    /// The most recently active session of the owner across all scopes.
    fn find_latest_active(
        &self,
        owner_id: UserId,
    ) -> impl std::future::Future<Output = Result<Option<Session>, RepositoryError>> + Send;

    /// List an owner's sessions, most recent message first.
    fn list_for_owner(
        &self,
        owner_id: UserId,
        limit: u32,
    ) -> impl std::future::Future<Output = Result<Vec<Session>, RepositoryError>> + Send;

    /// Record a new, active session.
    fn insert(
        &self,
        session: &NewSession,
    ) -> impl std::future::Future<Output = Result<Session, RepositoryError>> + Send;

    /// Bump `last_message_at` to now.
    fn touch(
        &self,
        id: SessionId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Replace the session title.
    fn set_title(
        &self,
        id: SessionId,
        title: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Mark one session inactive.
    fn deactivate(
        &self,
        id: SessionId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Mark every session of the owner inactive, whatever its scope.
    /// Returns the number of rows that were active.
    fn deactivate_all_for_owner(
        &self,
        owner_id: UserId,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
