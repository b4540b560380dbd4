//! Verification workflow configuration
//!
//! Environment-level knobs consumed by the verification core: code length,
//! the failed-attempt block threshold, token lifetime, and the delivery
//! dry-run toggle used in development.

use serde::{Deserialize, Serialize};

/// Default length of a one-time code
pub const DEFAULT_TOKEN_LENGTH: usize = 4;

/// Default number of failed attempts before a (client, channel) pair is blocked
pub const DEFAULT_BLOCK_THRESHOLD: u32 = 3;

/// Default token lifetime in seconds (2.5 minutes)
pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 150;

/// Verification workflow configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VerificationConfig {
    /// Number of characters in a generated one-time code
    pub token_length: usize,

    /// Failed attempts after which a (client, channel) pair is blocked
    pub block_threshold: u32,

    /// Seconds before a pending token expires
    pub token_ttl_seconds: i64,

    /// When true, delivery is simulated and the code only appears in logs
    pub dry_run: bool,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            token_length: DEFAULT_TOKEN_LENGTH,
            block_threshold: DEFAULT_BLOCK_THRESHOLD,
            token_ttl_seconds: DEFAULT_TOKEN_TTL_SECONDS,
            dry_run: false,
        }
    }
}

impl VerificationConfig {
    /// Load from `TOKEN_LENGTH` / `BLOCK_THRESHOLD` / `TOKEN_TTL_SECONDS` / `DELIVERY_DRY_RUN`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            token_length: std::env::var("TOKEN_LENGTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.token_length),
            block_threshold: std::env::var("BLOCK_THRESHOLD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.block_threshold),
            token_ttl_seconds: std::env::var("TOKEN_TTL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.token_ttl_seconds),
            dry_run: std::env::var("DELIVERY_DRY_RUN")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(defaults.dry_run),
        }
    }
}
