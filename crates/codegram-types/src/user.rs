use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;

/// Store-assigned row identifier for a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A chat-platform user known to the gateway.
///
/// Created lazily on first contact and refreshed on every subsequent contact.
/// Rows are never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    /// Stable platform identity (the Telegram user id).
    pub telegram_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Set by an operator through the admin CLI.
    pub is_whitelisted: bool,
    pub created_at: DateTime<Utc>,
    pub last_active_at: DateTime<Utc>,
}

impl User {
    /// Human-readable label: username, then first name, then the platform id.
    pub fn display_name(&self) -> String {
        self.username
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.first_name.as_deref().filter(|s| !s.is_empty()))
            .map(str::to_string)
            .unwrap_or_else(|| self.telegram_id.to_string())
    }
}

/// Identity fields carried by an inbound message, used to create or refresh a [`User`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserContact {
    pub telegram_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}
