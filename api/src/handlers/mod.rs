//! Shared handler utilities: error translation and request helpers

pub mod error;

pub use error::{domain_error_response, validation_error_response};
