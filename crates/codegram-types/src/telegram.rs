//! Inbound Telegram webhook payload.
//!
//! Only the fields the gateway reads are modeled; everything else in the
//! update is ignored by serde.

use serde::{Deserialize, Serialize};

use crate::user::UserContact;

/// One webhook delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Update {
    #[serde(default)]
    pub update_id: i64,
    /// Absent for edited messages, callbacks, and other update kinds.
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub chat: Chat,
    #[serde(default)]
    pub from: Option<Sender>,
    /// Absent for photos, stickers, voice notes, and other non-text payloads.
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sender {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl Message {
    /// Sender identity, falling back to the chat id when `from` is missing.
    pub fn contact(&self) -> UserContact {
        match &self.from {
            Some(sender) => UserContact {
                telegram_id: sender.id,
                username: sender.username.clone(),
                first_name: sender.first_name.clone(),
                last_name: sender.last_name.clone(),
            },
            None => UserContact {
                telegram_id: self.chat.id,
                ..UserContact::default()
            },
        }
    }
}
