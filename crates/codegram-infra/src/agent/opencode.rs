//! OpencodeClient -- [`AgentBackend`] over the OpenCode server's HTTP API.
//!
//! - `POST {base}/session` opens a session. The working directory goes in
//!   both the JSON body and the `x-opencode-directory` header.
//! - `POST {base}/session/{id}/message` posts one user message and waits for
//!   the assistant's answer.
//!
//! Each call has its own timeout. A timed-out call surfaces as
//! [`AgentError::Timeout`] and is never retried.

use std::time::Duration;

use codegram_core::agent::backend::{AgentBackend, CreateSessionRequest};
use codegram_core::agent::reply::AgentReply;
use codegram_types::config::GatewayConfig;
use codegram_types::error::AgentError;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

const DIRECTORY_HEADER: &str = "x-opencode-directory";

#[derive(Debug, Serialize)]
struct CreateSessionBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    directory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct CreatedSession {
    id: String,
}

#[derive(Debug, Serialize)]
struct TextPart<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct MessageBody<'a> {
    parts: [TextPart<'a>; 1],
}

/// HTTP client for an OpenCode server.
#[derive(Debug, Clone)]
pub struct OpencodeClient {
    client: reqwest::Client,
    base_url: String,
    create_timeout: Duration,
    message_timeout: Duration,
}

impl OpencodeClient {
    pub fn new(base_url: impl Into<String>, create_timeout: Duration, message_timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("codegram/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            create_timeout,
            message_timeout,
        }
    }

    /// Build a client with the timeouts from `config`.
    pub fn from_config(base_url: impl Into<String>, config: &GatewayConfig) -> Self {
        Self::new(
            base_url,
            Duration::from_secs(config.create_session_timeout_secs),
            Duration::from_secs(config.message_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn map_send_error(e: reqwest::Error) -> AgentError {
    if e.is_timeout() {
        AgentError::Timeout
    } else {
        AgentError::Transport(e.to_string())
    }
}

async fn status_error(response: reqwest::Response) -> AgentError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    AgentError::Status { status, body }
}

impl AgentBackend for OpencodeClient {
    async fn create_session(&self, request: &CreateSessionRequest) -> Result<String, AgentError> {
        let directory = request
            .directory
            .as_ref()
            .map(|d| d.to_string_lossy().into_owned());
        let body = CreateSessionBody {
            directory: directory.clone(),
            title: request.title.as_deref(),
        };

        let mut builder = self
            .client
            .post(self.url("/session"))
            .timeout(self.create_timeout)
            .json(&body);
        if let Some(directory) = &directory {
            builder = builder.header(DIRECTORY_HEADER, directory);
        }

        let response = builder.send().await.map_err(map_send_error)?;
        let status = response.status();
        if status != StatusCode::OK && status != StatusCode::CREATED {
            return Err(status_error(response).await);
        }

        let created: CreatedSession = response
            .json()
            .await
            .map_err(|e| AgentError::InvalidResponse(format!("session id missing: {e}")))?;

        debug!(backend_session_id = %created.id, directory = ?directory, "Backend session created");
        Ok(created.id)
    }

    async fn send_message(&self, backend_session_id: &str, text: &str) -> Result<AgentReply, AgentError> {
        let body = MessageBody {
            parts: [TextPart { kind: "text", text }],
        };

        let response = self
            .client
            .post(self.url(&format!("/session/{backend_session_id}/message")))
            .timeout(self.message_timeout)
            .json(&body)
            .send()
            .await
            .map_err(map_send_error)?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let value: Value = response.json().await.map_err(|e| {
            if e.is_timeout() {
                AgentError::Timeout
            } else {
                AgentError::InvalidResponse(e.to_string())
            }
        })?;

        Ok(AgentReply::from(value))
    }
}
