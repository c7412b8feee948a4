//! Session and command orchestration for codegram.
//!
//! This crate defines the "ports" (repository traits, agent backend, chat
//! transport, provisioner) that the infrastructure layer implements, plus
//! the logic built on them. It depends only on `codegram-types` -- never on
//! `codegram-infra` or any database/IO crate.

pub mod agent;
pub mod chat;
pub mod command;
pub mod gateway;
pub mod repository;
pub mod service;

#[cfg(test)]
mod testing;
