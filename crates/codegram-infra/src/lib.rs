//! Infrastructure layer for codegram.
//!
//! Contains implementations of the ports defined in `codegram-core`:
//! SQLite storage, the git-backed project provisioner, the OpenCode agent
//! client, and the Telegram Bot API client.

pub mod agent;
pub mod config;
pub mod filesystem;
pub mod sqlite;
pub mod telegram;
