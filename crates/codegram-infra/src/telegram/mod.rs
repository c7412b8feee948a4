//! Telegram Bot API adapter.

pub mod client;
