//! ChatTransport trait: outbound delivery to the chat platform.

use codegram_types::error::TransportError;

/// Abstraction over the chat platform's send API.
///
/// Implementations live in codegram-infra (e.g., `TelegramClient`).
pub trait ChatTransport: Send + Sync {
    /// Send a text reply to a chat.
    fn send_text(
        &self,
        chat_id: i64,
        text: &str,
    ) -> impl std::future::Future<Output = Result<(), TransportError>> + Send;

    /// Show a "typing" presence signal in a chat.
    fn send_typing(
        &self,
        chat_id: i64,
    ) -> impl std::future::Future<Output = Result<(), TransportError>> + Send;
}
