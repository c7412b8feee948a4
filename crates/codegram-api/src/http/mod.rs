//! Webhook HTTP surface.
//!
//! `POST /webhook` receives Telegram updates; `GET /health` answers probes.

pub mod error;
pub mod handlers;
pub mod router;
