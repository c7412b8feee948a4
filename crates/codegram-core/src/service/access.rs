//! Access gate: decides whether a resolved user may use the gateway.

use std::collections::HashSet;

use codegram_types::user::User;

/// Whitelist policy built once at startup from configuration.
#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    allow_all: bool,
    whitelist: HashSet<i64>,
}

impl AccessPolicy {
    pub fn new(allow_all: bool, whitelist: impl IntoIterator<Item = i64>) -> Self {
        Self {
            allow_all,
            whitelist: whitelist.into_iter().collect(),
        }
    }

    /// A user is allowed if allow-all is on, their stored flag is set, or
    /// their platform id is in the configured whitelist.
    pub fn is_allowed(&self, user: &User) -> bool {
        self.allow_all || user.is_whitelisted || self.whitelist.contains(&user.telegram_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use codegram_types::user::UserId;

    fn user(telegram_id: i64, is_whitelisted: bool) -> User {
        User {
            id: UserId(1),
            telegram_id,
            username: None,
            first_name: None,
            last_name: None,
            is_whitelisted,
            created_at: Utc::now(),
            last_active_at: Utc::now(),
        }
    }

    #[test]
    fn allow_all_admits_everyone() {
        let policy = AccessPolicy::new(true, []);
        for (id, flag) in [(1, false), (2, true), (-5, false)] {
            assert!(policy.is_allowed(&user(id, flag)));
        }
    }

    #[test]
    fn stored_flag_admits() {
        let policy = AccessPolicy::new(false, []);
        assert!(policy.is_allowed(&user(7, true)));
        assert!(!policy.is_allowed(&user(7, false)));
    }

    #[test]
    fn configured_whitelist_admits() {
        let policy = AccessPolicy::new(false, [100, 200]);
        assert!(policy.is_allowed(&user(200, false)));
        assert!(!policy.is_allowed(&user(300, false)));
    }
}
