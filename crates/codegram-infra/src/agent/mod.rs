//! Agent backend adapters.

pub mod opencode;
