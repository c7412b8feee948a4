//! Business logic services (use cases).
//!
//! Services orchestrate repository calls, provisioning, and the agent
//! backend. They depend on traits (ports), never on concrete
//! infrastructure implementations.

pub mod access;
pub mod project;
pub mod provision;
pub mod session;
