//! AgentBackend trait: the remote coding-agent service as seen by the gateway.

use std::path::PathBuf;

use codegram_types::error::AgentError;

use super::reply::AgentReply;

/// Hints passed when opening a backend session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateSessionRequest {
    /// Working directory the agent should operate in.
    pub directory: Option<PathBuf>,
    /// Human-readable session title.
    pub title: Option<String>,
}

/// Abstraction over the agent backend's HTTP API.
///
/// Implementations live in codegram-infra (e.g., `OpencodeClient`).
pub trait AgentBackend: Send + Sync {
    /// Open a new remote session and return its opaque identifier.
    fn create_session(
        &self,
        request: &CreateSessionRequest,
    ) -> impl std::future::Future<Output = Result<String, AgentError>> + Send;

    /// Post one user message to a session and return the backend's raw answer.
    ///
    /// Called exactly once per inbound message; implementations must not retry.
    fn send_message(
        &self,
        backend_session_id: &str,
        text: &str,
    ) -> impl std::future::Future<Output = Result<AgentReply, AgentError>> + Send;
}
