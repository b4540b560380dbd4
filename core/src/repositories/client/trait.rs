//! Client repository trait.
//!
//! The document number carries a uniqueness constraint at the store level;
//! `create` must surface a conflict for duplicates rather than silently
//! overwrite.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::client::Client;
use crate::errors::DomainError;

/// Repository contract for [`Client`] persistence
#[async_trait]
pub trait ClientRepository: Send + Sync {
    /// Find a client by its unique identifier
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Client>, DomainError>;

    /// Find a client by its (globally unique) document number
    async fn find_by_document(&self, document: &str) -> Result<Option<Client>, DomainError>;

    /// Persist a new client
    ///
    /// Fails with a conflict when the document number is already taken.
    async fn create(&self, client: Client) -> Result<Client, DomainError>;

    /// Persist changes to an existing client
    async fn update(&self, client: Client) -> Result<Client, DomainError>;
}
