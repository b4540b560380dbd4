//! Result types for the verification state machine

use serde::Serialize;
use uuid::Uuid;

use crate::domain::entities::verification_token::Channel;

/// Result of a successful token request
#[derive(Debug, Clone, Serialize)]
pub struct RequestTokenResult {
    /// Identifier of the freshly minted token
    pub token_id: Uuid,
    /// Seconds until the token expires
    pub expires_in_seconds: i64,
}

/// Result of a successful verification
#[derive(Debug, Clone, Serialize)]
pub struct VerifiedToken {
    /// Identifier of the validated token
    pub token_id: Uuid,
    /// Seconds between token creation and validation
    pub elapsed_seconds: i64,
}

/// Read-only cooldown report for a (client, channel) pair
#[derive(Debug, Clone, Serialize)]
pub struct CooldownStatus {
    /// Channel the report covers
    pub channel: Channel,
    /// Attempts charged so far
    pub attempts: u32,
    /// Ordinal of the next attempt (1-indexed)
    pub next_attempt_number: u32,
    /// Total mandatory wait for the next attempt, in seconds
    pub wait_seconds: u64,
    /// Seconds still remaining of that wait
    pub remaining_seconds: u64,
    /// Whether the threshold block flag is set
    pub blocked: bool,
    /// Whether a new request would pass the cooldown gate right now
    pub can_request: bool,
}
