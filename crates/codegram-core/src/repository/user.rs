//! UserRepository trait definition.

use codegram_types::error::RepositoryError;
use codegram_types::user::{User, UserContact};

/// Repository trait for user persistence.
///
/// Implementations live in codegram-infra (e.g., `SqliteUserRepository`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait UserRepository: Send + Sync {
    /// Get a user by platform identity.
    fn get_by_telegram_id(
        &self,
        telegram_id: i64,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Create the user on first contact, or refresh it on every later contact.
    ///
    /// Display fields that are `None` in `contact` keep their stored value.
    /// `last_active_at` is always bumped. Must be atomic with respect to
    /// concurrent calls for the same identity.
    fn upsert_contact(
        &self,
        contact: &UserContact,
    ) -> impl std::future::Future<Output = Result<User, RepositoryError>> + Send;

    /// Set the stored whitelist flag. Returns `false` if no such user exists.
    fn set_whitelisted(
        &self,
        telegram_id: i64,
        whitelisted: bool,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;
}
