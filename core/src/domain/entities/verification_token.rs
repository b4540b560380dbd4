//! Verification token entity: a single OTP attempt instance.
//!
//! A token is created in `Pending` state and moves to exactly one terminal
//! state. Terminal states admit no further transition; the entity enforces
//! this so repository implementations cannot accidentally resurrect a token.

use std::net::IpAddr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{DomainError, DomainResult};

/// Default token lifetime: 150 seconds from creation
pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 150;

/// Delivery channel for a one-time code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// Plain SMS
    Sms,
    /// Chat-app message
    Whatsapp,
}

impl Channel {
    /// Single-letter wire code (`S` / `W`)
    pub fn as_code(&self) -> &'static str {
        match self {
            Channel::Sms => "S",
            Channel::Whatsapp => "W",
        }
    }

    /// Parse the single-letter wire code
    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "S" => Some(Channel::Sms),
            "W" => Some(Channel::Whatsapp),
            _ => None,
        }
    }
}

/// Lifecycle status of a verification token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenStatus {
    /// Awaiting verification
    Pending,
    /// Correct code submitted in time
    Validated,
    /// Deadline passed without a correct code
    Expired,
    /// Cancelled, either voluntarily or by crossing the attempt threshold
    Cancelled,
    /// Delivery to the messaging provider failed
    NotSent,
}

impl TokenStatus {
    /// Whether the status admits no further transition
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TokenStatus::Pending)
    }

    /// Single-letter wire code (`P`/`V`/`E`/`X`/`N`)
    pub fn as_code(&self) -> &'static str {
        match self {
            TokenStatus::Pending => "P",
            TokenStatus::Validated => "V",
            TokenStatus::Expired => "E",
            TokenStatus::Cancelled => "X",
            TokenStatus::NotSent => "N",
        }
    }

    /// Parse the single-letter wire code
    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "P" => Some(TokenStatus::Pending),
            "V" => Some(TokenStatus::Validated),
            "E" => Some(TokenStatus::Expired),
            "X" => Some(TokenStatus::Cancelled),
            "N" => Some(TokenStatus::NotSent),
            _ => None,
        }
    }
}

/// Verification token entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationToken {
    /// Unique identifier
    pub id: Uuid,

    /// Owning client
    pub client_id: Uuid,

    /// Plaintext code, kept for audit and operator display
    pub code: String,

    /// Password-grade hash of the code, used for verification
    pub code_hash: String,

    /// Delivery channel
    pub channel: Channel,

    /// Lifecycle status
    pub status: TokenStatus,

    /// IP address that requested the token; verification is pinned to it
    pub requester_ip: IpAddr,

    /// Timestamp when the token was created
    pub created_at: DateTime<Utc>,

    /// Wall-clock deadline for verification
    pub expires_at: DateTime<Utc>,

    /// Seconds between creation and successful validation (audit)
    pub elapsed_seconds: Option<i64>,
}

impl VerificationToken {
    /// Create a new pending token with the given lifetime
    pub fn new(
        client_id: Uuid,
        code: String,
        code_hash: String,
        channel: Channel,
        requester_ip: IpAddr,
        ttl_seconds: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            client_id,
            code,
            code_hash,
            channel,
            status: TokenStatus::Pending,
            requester_ip,
            created_at: now,
            expires_at: now + Duration::seconds(ttl_seconds),
            elapsed_seconds: None,
        }
    }

    /// Whether the wall-clock deadline has passed
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    pub fn is_pending(&self) -> bool {
        self.status == TokenStatus::Pending
    }

    fn transition(&mut self, to: TokenStatus) -> DomainResult<()> {
        if self.status.is_terminal() {
            return Err(DomainError::Conflict {
                message: format!(
                    "Token {} is already {:?}, no further transition allowed",
                    self.id, self.status
                ),
            });
        }
        self.status = to;
        Ok(())
    }

    /// Pending -> Validated, recording the elapsed time for audit
    pub fn mark_validated(&mut self) -> DomainResult<()> {
        self.transition(TokenStatus::Validated)?;
        self.elapsed_seconds = Some((Utc::now() - self.created_at).num_seconds().max(0));
        Ok(())
    }

    /// Pending -> Expired
    pub fn mark_expired(&mut self) -> DomainResult<()> {
        self.transition(TokenStatus::Expired)
    }

    /// Pending -> Cancelled
    pub fn mark_cancelled(&mut self) -> DomainResult<()> {
        self.transition(TokenStatus::Cancelled)
    }

    /// Pending -> NotSent
    pub fn mark_not_sent(&mut self) -> DomainResult<()> {
        self.transition(TokenStatus::NotSent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_token(ttl_seconds: i64) -> VerificationToken {
        VerificationToken::new(
            Uuid::new_v4(),
            "A3K9".to_string(),
            "$2b$08$fakehashfakehashfakehash".to_string(),
            Channel::Sms,
            "10.0.0.1".parse().unwrap(),
            ttl_seconds,
        )
    }

    #[test]
    fn new_token_is_pending_and_unexpired() {
        let token = sample_token(150);
        assert!(token.is_pending());
        assert!(!token.is_expired());
        assert!(!token.status.is_terminal());
    }

    #[test]
    fn zero_ttl_token_expires() {
        let token = sample_token(-1);
        assert!(token.is_expired());
        // Expiry is a wall-clock fact, not a state transition
        assert!(token.is_pending());
    }

    #[test]
    fn validated_records_elapsed_seconds() {
        let mut token = sample_token(150);
        token.mark_validated().unwrap();
        assert_eq!(token.status, TokenStatus::Validated);
        assert!(token.elapsed_seconds.unwrap() >= 0);
    }

    #[test]
    fn terminal_states_reject_further_transitions() {
        for terminal in [
            TokenStatus::Validated,
            TokenStatus::Expired,
            TokenStatus::Cancelled,
            TokenStatus::NotSent,
        ] {
            let mut token = sample_token(150);
            token.transition(terminal).unwrap();
            assert!(token.mark_validated().is_err());
            assert!(token.mark_expired().is_err());
            assert!(token.mark_cancelled().is_err());
            assert!(token.mark_not_sent().is_err());
            assert_eq!(token.status, terminal);
        }
    }

    #[test]
    fn wire_codes_round_trip() {
        for status in [
            TokenStatus::Pending,
            TokenStatus::Validated,
            TokenStatus::Expired,
            TokenStatus::Cancelled,
            TokenStatus::NotSent,
        ] {
            assert_eq!(TokenStatus::parse(status.as_code()), Some(status));
        }
        assert_eq!(Channel::parse("S"), Some(Channel::Sms));
        assert_eq!(Channel::parse("W"), Some(Channel::Whatsapp));
        assert_eq!(Channel::parse("I"), None);
    }
}
