//! # Infrastructure Layer
//!
//! Concrete implementations behind the core repository and messaging
//! boundaries:
//! - **Database**: MySQL implementations using SQLx
//! - **Messaging**: HTTP SMS provider and chat-app gateway, plus a mock

pub mod database;
pub mod messaging;

use thiserror::Error;

/// Errors raised by infrastructure components before they are translated
/// into domain errors at the repository boundary.
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Messaging error: {0}")]
    Messaging(String),

    #[error(transparent)]
    General(#[from] anyhow::Error),
}
