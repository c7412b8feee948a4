//! SQLite storage layer.
//!
//! Repository implementations backed by SQLite with WAL mode and split
//! read/write connection pools. Every write is a single statement, and
//! timestamps are assigned by SQLite, never by the caller.

use chrono::{DateTime, Utc};
use codegram_types::error::RepositoryError;

pub mod pool;
pub mod project;
pub mod session;
pub mod user;

/// Pool exhaustion, a closed pool, or an I/O failure means the database is
/// unreachable; anything else is reported against the query itself.
pub(crate) fn query_error(e: sqlx::Error) -> RepositoryError {
    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            tracing::error!(error = %e, "Database unavailable");
            RepositoryError::Connection
        }
        e => RepositoryError::Query(e.to_string()),
    }
}

pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}
