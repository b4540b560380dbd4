//! Verification token repository trait.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::verification_token::VerificationToken;
use crate::errors::DomainError;

/// Repository contract for [`VerificationToken`] persistence
///
/// Tokens are looked up by id through the client's `current_token_id`
/// pointer; implementations do not need most-recent-row queries.
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Persist a new token
    async fn create(&self, token: VerificationToken) -> Result<VerificationToken, DomainError>;

    /// Find a token by its unique identifier
    async fn find_by_id(&self, id: Uuid) -> Result<Option<VerificationToken>, DomainError>;

    /// Persist a status transition or audit update
    async fn update(&self, token: VerificationToken) -> Result<VerificationToken, DomainError>;
}
