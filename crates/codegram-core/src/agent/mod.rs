//! The remote coding-agent backend: the port, response normalization, and
//! the message relay.

pub mod backend;
pub mod relay;
pub mod reply;
