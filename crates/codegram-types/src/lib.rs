//! Shared domain types for codegram.
//!
//! Users, projects, and agent sessions as persisted by the store, the inbound
//! webhook payload, tuning configuration, and the error enums shared across
//! crates.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod config;
pub mod error;
pub mod project;
pub mod session;
pub mod telegram;
pub mod user;
