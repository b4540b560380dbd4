//! Shared utilities and common types for the Veritel server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types
//! - Response envelope structures
//! - Utility functions (document/phone/email validation)

pub mod config;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, DatabaseConfig, Environment, MessagingConfig, ServerConfig, VerificationConfig,
};
pub use types::{ApiResponse, ErrorBody};
pub use utils::{phone, validation};
