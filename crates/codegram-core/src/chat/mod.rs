//! Chat platform abstractions.
//!
//! This module defines the `ChatTransport` trait that the infrastructure
//! layer implements for sending replies and presence signals.

pub mod transport;
