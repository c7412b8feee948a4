//! Normalization of the backend's message response.
//!
//! The backend answers a posted message with either a single message object
//! or a list of them. Each message carries typed parts; only `text` parts are
//! shown to the user.

use serde::Deserialize;
use serde_json::Value;

/// Shown when the backend answered but produced no text parts.
pub const NO_TEXT_REPLY: &str = "Request processed.";

/// Shown when the answer is neither a message nor a list of messages.
pub const UNRECOGNIZED_REPLY: &str = "Request processed successfully.";

/// One part of a backend message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MessagePart {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

/// A backend message with its ordered parts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AgentMessage {
    #[serde(default)]
    pub parts: Vec<MessagePart>,
}

/// The shapes a message response can take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentReply {
    /// An object with a `parts` array.
    Message(AgentMessage),
    /// An array of message objects. Entries without parts contribute nothing.
    Messages(Vec<AgentMessage>),
    /// Anything else.
    Unrecognized,
}

impl From<Value> for AgentReply {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => AgentReply::Messages(
                items.into_iter().map(message_from_value).collect(),
            ),
            Value::Object(ref map) if map.contains_key("parts") => {
                AgentReply::Message(message_from_value(value))
            }
            _ => AgentReply::Unrecognized,
        }
    }
}

fn message_from_value(value: Value) -> AgentMessage {
    let Value::Object(mut map) = value else {
        return AgentMessage::default();
    };
    let parts = match map.remove("parts") {
        Some(Value::Array(parts)) => parts
            .into_iter()
            .filter_map(|p| serde_json::from_value::<MessagePart>(p).ok())
            .collect(),
        _ => Vec::new(),
    };
    AgentMessage { parts }
}

impl AgentReply {
    /// Collapse the reply into the text shown to the user.
    ///
    /// Text parts are concatenated in order, across all messages, joined
    /// with newlines.
    pub fn into_display_text(self) -> String {
        let messages = match self {
            AgentReply::Message(message) => vec![message],
            AgentReply::Messages(messages) => messages,
            AgentReply::Unrecognized => return UNRECOGNIZED_REPLY.to_string(),
        };

        let texts: Vec<String> = messages
            .into_iter()
            .flat_map(|m| m.parts)
            .filter(|p| p.kind.as_deref() == Some("text"))
            .map(|p| p.text.unwrap_or_default())
            .collect();

        if texts.is_empty() {
            NO_TEXT_REPLY.to_string()
        } else {
            texts.join("\n")
        }
    }
}
