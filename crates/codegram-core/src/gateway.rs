//! Inbound gateway: turns one webhook update into replies.
//!
//! Flow per update: resolve the user, check access, dispatch commands, and
//! otherwise relay the text to the user's current agent session. Every
//! failure short of reply delivery becomes a chat reply.

use codegram_types::error::{CommandError, TransportError};
use codegram_types::telegram::Update;
use tracing::{info, warn};

use crate::agent::backend::AgentBackend;
use crate::chat::transport::ChatTransport;
use crate::command::router::CommandRouter;
use crate::repository::project::ProjectRepository;
use crate::repository::session::SessionRepository;
use crate::repository::user::UserRepository;
use crate::service::access::AccessPolicy;
use crate::service::provision::ProjectProvisioner;

pub const DENIED_TEXT: &str =
    "Sorry, you're not authorized to use this bot. Contact the administrator.";
pub const NON_TEXT_REPLY: &str = "Please send a text message.";

/// Inbound and outbound text is logged cut to this many characters.
const LOG_PREVIEW_CHARS: usize = 100;

pub struct Gateway<U, P, F, S, A, T>
where
    U: UserRepository,
    P: ProjectRepository,
    F: ProjectProvisioner,
    S: SessionRepository,
    A: AgentBackend,
    T: ChatTransport,
{
    users: U,
    access: AccessPolicy,
    router: CommandRouter<P, F, S, A, T>,
}

impl<U, P, F, S, A, T> Gateway<U, P, F, S, A, T>
where
    U: UserRepository,
    P: ProjectRepository,
    F: ProjectProvisioner,
    S: SessionRepository,
    A: AgentBackend,
    T: ChatTransport,
{
    pub fn new(users: U, access: AccessPolicy, router: CommandRouter<P, F, S, A, T>) -> Self {
        Self {
            users,
            access,
            router,
        }
    }

    pub fn users(&self) -> &U {
        &self.users
    }

    pub fn router(&self) -> &CommandRouter<P, F, S, A, T> {
        &self.router
    }

    /// Process one update. Only a failed reply delivery is an error.
    pub async fn handle_update(&self, update: &Update) -> Result<(), TransportError> {
        let Some(message) = &update.message else {
            return Ok(());
        };
        let chat_id = message.chat.id;
        let transport = self.router.transport();

        let user = match self.users.upsert_contact(&message.contact()).await {
            Ok(user) => user,
            Err(e) => {
                warn!(chat_id, error = %e, "Failed to resolve user");
                return transport
                    .send_text(chat_id, &CommandError::Storage(e).to_string())
                    .await;
            }
        };

        if !self.access.is_allowed(&user) {
            info!(telegram_id = user.telegram_id, "Rejected unauthorized user");
            return transport.send_text(chat_id, DENIED_TEXT).await;
        }

        let Some(text) = message.text.as_deref() else {
            return transport.send_text(chat_id, NON_TEXT_REPLY).await;
        };

        info!(
            telegram_id = user.telegram_id,
            chat_id,
            text = %preview(text),
            "Received message"
        );

        if self.router.route(chat_id, &user, text).await? {
            return Ok(());
        }

        self.router.typing(chat_id).await;

        let sessions = self.router.sessions();
        let session = match sessions.resolve_current(&user).await {
            Ok(session) => session,
            Err(e) => {
                warn!(telegram_id = user.telegram_id, error = %e, "Failed to initialize session");
                return transport
                    .send_text(chat_id, &format!("Failed to initialize session: {e}"))
                    .await;
            }
        };

        if let Err(e) = sessions.record_activity(&session).await {
            warn!(session_id = %session.id, error = %e, "Failed to record session activity");
        }

        let reply = sessions.relay(&session, text).await;
        info!(
            telegram_id = user.telegram_id,
            session_id = %session.id,
            reply = %preview(&reply),
            "Relayed agent reply"
        );

        transport.send_text(chat_id, &reply).await
    }
}

fn preview(text: &str) -> String {
    text.chars().take(LOG_PREVIEW_CHARS).collect()
}
