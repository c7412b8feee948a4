//! Message relay: one attempt per inbound message, never an error to the caller.

use codegram_types::error::AgentError;
use tracing::{debug, warn};

use super::backend::AgentBackend;

/// Shown when the backend did not answer within the timeout. The work may
/// still complete on the backend side.
pub const STILL_PROCESSING_REPLY: &str = "Request is being processed. This may take a while...";

/// Forward `text` to the backend session and return what to show the user.
///
/// Failures are folded into the returned string:
/// - non-success status: an error line embedding the status code
/// - timeout: [`STILL_PROCESSING_REPLY`]
/// - anything else: an error line embedding the failure description
pub async fn relay_message<A: AgentBackend>(
    backend: &A,
    backend_session_id: &str,
    text: &str,
) -> String {
    match backend.send_message(backend_session_id, text).await {
        Ok(reply) => reply.into_display_text(),
        Err(AgentError::Status { status, body }) => {
            warn!(session_id = %backend_session_id, status, body = %body, "Backend rejected message");
            format!("Error: agent backend returned status {status}")
        }
        Err(AgentError::Timeout) => {
            debug!(session_id = %backend_session_id, "Backend still processing after timeout");
            STILL_PROCESSING_REPLY.to_string()
        }
        Err(e) => {
            warn!(session_id = %backend_session_id, error = %e, "Backend request failed");
            format!("Error communicating with agent backend: {e}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedAgent, ScriptedReply};

    #[tokio::test]
    async fn relays_text() {
        let agent = ScriptedAgent::replying(ScriptedReply::Text("hi there"));
        let reply = relay_message(&agent, "ses_1", "hello").await;
        assert_eq!(reply, "hi there");
        assert_eq!(agent.sent(), vec![("ses_1".to_string(), "hello".to_string())]);
    }

    #[tokio::test]
    async fn status_error_embeds_code() {
        let agent = ScriptedAgent::replying(ScriptedReply::Status(503));
        let reply = relay_message(&agent, "ses_1", "hello").await;
        assert_eq!(reply, "Error: agent backend returned status 503");
    }

    #[tokio::test]
    async fn timeout_is_still_processing_and_not_retried() {
        let agent = ScriptedAgent::replying(ScriptedReply::Timeout);
        let reply = relay_message(&agent, "ses_1", "hello").await;
        assert_eq!(reply, STILL_PROCESSING_REPLY);
        assert_eq!(agent.sent().len(), 1);
    }

    #[tokio::test]
    async fn transport_error_embeds_description() {
        let agent = ScriptedAgent::replying(ScriptedReply::Transport("connection refused"));
        let reply = relay_message(&agent, "ses_1", "hello").await;
        assert_eq!(
            reply,
            "Error communicating with agent backend: connection refused"
        );
    }
}
