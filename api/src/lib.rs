//! # Veritel API
//!
//! HTTP surface for the verification and registration workflow. Handlers are
//! generic over the core repository and messaging traits, so the same routes
//! serve the MySQL-backed binary and the in-memory test wiring.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod routes;
