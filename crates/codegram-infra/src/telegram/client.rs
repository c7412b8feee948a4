//! TelegramClient -- [`ChatTransport`] over the Telegram Bot API.
//!
//! The bot token is part of every request URL, so it is held as a
//! [`SecretString`] and stripped from any error text before logging.

use std::time::Duration;

use codegram_core::chat::transport::ChatTransport;
use codegram_types::error::TransportError;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://api.telegram.org";
const TRUNCATION_MARKER: &str = "\n\n... (message truncated)";
const PARSE_MODE: &str = "Markdown";

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: i64,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct SendChatAction {
    chat_id: i64,
    action: &'static str,
}

#[derive(Debug, Default, Deserialize)]
struct ApiError {
    #[serde(default)]
    description: String,
}

/// Client for the Bot API methods the gateway needs.
pub struct TelegramClient {
    client: reqwest::Client,
    token: SecretString,
    base_url: String,
    max_reply_chars: usize,
}

impl TelegramClient {
    pub fn new(token: SecretString, max_reply_chars: usize) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            client,
            token,
            base_url: DEFAULT_BASE_URL.to_string(),
            max_reply_chars,
        }
    }

    /// Override the base URL (useful for testing or a local Bot API server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{method}", self.base_url, self.token.expose_secret())
    }

    async fn post<B: Serialize>(&self, method: &str, body: &B) -> Result<(), TransportError> {
        let response = self
            .client
            .post(self.method_url(method))
            .json(body)
            .send()
            .await
            .map_err(|e| TransportError::Http(e.without_url().to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let text = response.text().await.unwrap_or_default();
        let description = serde_json::from_str::<ApiError>(&text)
            .map(|e| e.description)
            .unwrap_or(text);
        Err(TransportError::Status {
            status: status.as_u16(),
            description,
        })
    }
}

/// Cut `text` to `max_chars` characters, marking the cut.
pub fn truncate_reply(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}{TRUNCATION_MARKER}", &text[..idx]),
        None => text.to_string(),
    }
}

impl ChatTransport for TelegramClient {
    /// Send with Markdown first; if Telegram rejects it (usually unbalanced
    /// markup in agent output), send once more as plain text.
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), TransportError> {
        let text = truncate_reply(text, self.max_reply_chars);

        let formatted = SendMessage {
            chat_id,
            text: &text,
            parse_mode: Some(PARSE_MODE),
        };
        match self.post("sendMessage", &formatted).await {
            Err(e @ TransportError::Status { .. }) => {
                debug!(chat_id, error = %e, "Formatted send rejected, retrying as plain text");
                let plain = SendMessage {
                    chat_id,
                    text: &text,
                    parse_mode: None,
                };
                self.post("sendMessage", &plain).await.inspect_err(|e| {
                    warn!(chat_id, error = %e, "Failed to deliver reply");
                })
            }
            // Network failures are never resent.
            other => other.inspect_err(|e| {
                warn!(chat_id, error = %e, "Failed to deliver reply");
            }),
        }
    }

    async fn send_typing(&self, chat_id: i64) -> Result<(), TransportError> {
        self.post(
            "sendChatAction",
            &SendChatAction {
                chat_id,
                action: "typing",
            },
        )
        .await
    }
}
