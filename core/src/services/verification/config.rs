//! Configuration for the verification state machine

use crate::domain::entities::verification_token::DEFAULT_TOKEN_TTL_SECONDS;
use crate::services::token::DEFAULT_CODE_LENGTH;

/// Configuration for the verification state machine
#[derive(Debug, Clone)]
pub struct VerificationConfig {
    /// Number of characters in a generated code
    pub code_length: usize,
    /// Failed attempts after which a (client, channel) pair is blocked
    pub block_threshold: u32,
    /// Seconds before a pending token expires
    pub token_ttl_seconds: i64,
    /// When true, delivery is simulated and only logged
    pub dry_run: bool,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            code_length: DEFAULT_CODE_LENGTH,
            block_threshold: 3,
            token_ttl_seconds: DEFAULT_TOKEN_TTL_SECONDS,
            dry_run: false,
        }
    }
}

impl From<vt_shared::VerificationConfig> for VerificationConfig {
    fn from(config: vt_shared::VerificationConfig) -> Self {
        Self {
            code_length: config.token_length,
            block_threshold: config.block_threshold,
            token_ttl_seconds: config.token_ttl_seconds,
            dry_run: config.dry_run,
        }
    }
}
