//! Attempt ledger repository trait.
//!
//! Mutations must be linearizable per (client, channel): two concurrent
//! charges must both land (no lost update). A charge and the token mutation
//! it entails are one unit of work: the MySQL implementation runs both
//! statements in a single transaction behind a row lock, the in-memory mock
//! serializes all mutations through a single lock.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::attempt_record::AttemptRecord;
use crate::domain::entities::verification_token::{Channel, VerificationToken};
use crate::errors::DomainError;

/// Repository contract for the per-(client, channel) attempt ledger
#[async_trait]
pub trait AttemptRepository: Send + Sync {
    /// Fetch the ledger row for the pair, creating an empty one on first use.
    /// Idempotent: exactly one row ever exists per pair.
    async fn get_or_create(
        &self,
        client_id: Uuid,
        channel: Channel,
    ) -> Result<AttemptRecord, DomainError>;

    /// Charge one failed attempt against the token's (client, channel) pair:
    /// increment the count, stamp `last_attempt_at` and recompute the blocked
    /// flag against `block_threshold`. When the charge reaches the threshold
    /// the supplied pending token is cancelled in the same unit of work, so
    /// a blocked ledger can never coexist with a still-pending token.
    /// Returns the updated row and the (possibly cancelled) token.
    async fn record_failure(
        &self,
        block_threshold: u32,
        token: VerificationToken,
    ) -> Result<(AttemptRecord, VerificationToken), DomainError>;

    /// Cancel the pending token and charge one attempt against its
    /// (client, channel) pair in the same unit of work: both land or
    /// neither does. Returns the updated row and the cancelled token.
    async fn record_cancellation(
        &self,
        block_threshold: u32,
        token: VerificationToken,
    ) -> Result<(AttemptRecord, VerificationToken), DomainError>;

    /// Clear the blocked flag after a successful verification. The count is
    /// left untouched. Returns the updated row.
    async fn record_success(
        &self,
        client_id: Uuid,
        channel: Channel,
    ) -> Result<AttemptRecord, DomainError>;
}
