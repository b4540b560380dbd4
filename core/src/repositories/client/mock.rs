//! Mock implementation of ClientRepository for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::client::Client;
use crate::errors::DomainError;

use super::trait_::ClientRepository;

/// In-memory client repository for tests
#[derive(Default)]
pub struct MockClientRepository {
    clients: Arc<RwLock<HashMap<Uuid, Client>>>,
}

impl MockClientRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClientRepository for MockClientRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Client>, DomainError> {
        let clients = self.clients.read().await;
        Ok(clients.get(&id).cloned())
    }

    async fn find_by_document(&self, document: &str) -> Result<Option<Client>, DomainError> {
        let clients = self.clients.read().await;
        Ok(clients.values().find(|c| c.document == document).cloned())
    }

    async fn create(&self, client: Client) -> Result<Client, DomainError> {
        let mut clients = self.clients.write().await;

        if clients.values().any(|c| c.document == client.document) {
            return Err(DomainError::Conflict {
                message: "Document number already registered".to_string(),
            });
        }

        clients.insert(client.id, client.clone());
        Ok(client)
    }

    async fn update(&self, client: Client) -> Result<Client, DomainError> {
        let mut clients = self.clients.write().await;

        if !clients.contains_key(&client.id) {
            return Err(DomainError::NotFound {
                resource: "Client".to_string(),
            });
        }

        clients.insert(client.id, client.clone());
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::client::DocumentType;

    fn sample_client(document: &str) -> Client {
        Client::new(
            DocumentType::Dni,
            document.to_string(),
            "5".to_string(),
            "Jose".to_string(),
            "Rojas".to_string(),
            "Diaz".to_string(),
        )
    }

    #[tokio::test]
    async fn create_rejects_duplicate_document() {
        let repo = MockClientRepository::new();
        repo.create(sample_client("12345678")).await.unwrap();

        let err = repo.create(sample_client("12345678")).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict { .. }));
    }

    #[tokio::test]
    async fn find_by_document_returns_created_client() {
        let repo = MockClientRepository::new();
        let created = repo.create(sample_client("87654321")).await.unwrap();

        let found = repo.find_by_document("87654321").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert!(repo.find_by_document("00000000").await.unwrap().is_none());
    }
}
