//! # Veritel Core
//!
//! Core business logic and domain layer for the Veritel backend.
//! This crate contains domain entities, business services, repository
//! interfaces, and error types that form the foundation of the
//! verification and registration workflow.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
