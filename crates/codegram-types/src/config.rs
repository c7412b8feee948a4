//! Tuning configuration for codegram.
//!
//! `GatewayConfig` mirrors the optional `config.toml` in the data directory.
//! Every field has a default, so an empty or missing file is valid.

use serde::{Deserialize, Serialize};

/// Limits and timeouts applied by the gateway and its HTTP clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Timeout for creating a backend session.
    #[serde(default = "default_create_session_timeout_secs")]
    pub create_session_timeout_secs: u64,

    /// Timeout for relaying one message to the backend.
    #[serde(default = "default_message_timeout_secs")]
    pub message_timeout_secs: u64,

    /// How many sessions `/sessions` lists.
    #[serde(default = "default_session_list_limit")]
    pub session_list_limit: u32,

    /// Replies longer than this are cut and marked as truncated.
    #[serde(default = "default_max_reply_chars")]
    pub max_reply_chars: usize,
}

fn default_create_session_timeout_secs() -> u64 {
    30
}

fn default_message_timeout_secs() -> u64 {
    300
}

fn default_session_list_limit() -> u32 {
    10
}

fn default_max_reply_chars() -> usize {
    4000
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            create_session_timeout_secs: default_create_session_timeout_secs(),
            message_timeout_secs: default_message_timeout_secs(),
            session_list_limit: default_session_list_limit(),
            max_reply_chars: default_max_reply_chars(),
        }
    }
}
