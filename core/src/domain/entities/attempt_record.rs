//! Attempt record entity: the per-client-per-channel ledger row that drives
//! cooldown and block decisions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::verification_token::Channel;

/// Attempt ledger row, unique per (client, channel) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptRecord {
    /// Unique identifier
    pub id: Uuid,

    /// Owning client
    pub client_id: Uuid,

    /// Delivery channel this row tracks
    pub channel: Channel,

    /// Failed-attempt count; monotonically non-decreasing
    pub count: u32,

    /// Timestamp of the last recorded attempt
    pub last_attempt_at: Option<DateTime<Utc>>,

    /// Whether the pair crossed the block threshold
    pub blocked: bool,
}

impl AttemptRecord {
    /// Fresh ledger row with no attempts
    pub fn new(client_id: Uuid, channel: Channel) -> Self {
        Self {
            id: Uuid::new_v4(),
            client_id,
            channel,
            count: 0,
            last_attempt_at: None,
            blocked: false,
        }
    }

    /// Register one failed attempt: bump the count, stamp the time and
    /// recompute the blocked flag against the threshold.
    pub fn register_failure(&mut self, block_threshold: u32) {
        self.count += 1;
        self.last_attempt_at = Some(Utc::now());
        self.blocked = self.count >= block_threshold;
    }

    /// Register a successful verification: clears the blocked flag.
    /// The count is kept as an audit trail.
    pub fn register_success(&mut self) {
        self.blocked = false;
    }

    /// Attempts left before the threshold blocks the pair
    pub fn remaining_attempts(&self, block_threshold: u32) -> u32 {
        block_threshold.saturating_sub(self.count)
    }
}
