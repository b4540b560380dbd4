//! Mock implementation of AttemptRepository for testing
//!
//! All mutations go through a single mutex, giving the linearizability the
//! trait contract requires: concurrent charges are applied one at a time and
//! none is lost. Charges write the token through the shared token store while
//! holding that mutex, so ledger and token always move together, and
//! `set_fail_charges` simulates a storage error that rolls the whole unit of
//! work back before anything lands.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::entities::attempt_record::AttemptRecord;
use crate::domain::entities::verification_token::{Channel, VerificationToken};
use crate::errors::DomainError;

use super::trait_::AttemptRepository;
use crate::repositories::token::{MockTokenRepository, TokenRepository};

/// In-memory attempt ledger for tests
pub struct MockAttemptRepository {
    records: Arc<Mutex<HashMap<(Uuid, Channel), AttemptRecord>>>,
    tokens: Arc<MockTokenRepository>,
    fail_charges: AtomicBool,
}

impl MockAttemptRepository {
    pub fn new(tokens: Arc<MockTokenRepository>) -> Self {
        Self {
            records: Arc::new(Mutex::new(HashMap::new())),
            tokens,
            fail_charges: AtomicBool::new(false),
        }
    }

    /// Make charges fail before touching any state
    pub fn set_fail_charges(&self, fail: bool) {
        self.fail_charges.store(fail, Ordering::SeqCst);
    }

    fn check_charges_available(&self) -> Result<(), DomainError> {
        if self.fail_charges.load(Ordering::SeqCst) {
            return Err(DomainError::Internal {
                message: "Attempt storage unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl AttemptRepository for MockAttemptRepository {
    async fn get_or_create(
        &self,
        client_id: Uuid,
        channel: Channel,
    ) -> Result<AttemptRecord, DomainError> {
        let mut records = self.records.lock().await;
        let record = records
            .entry((client_id, channel))
            .or_insert_with(|| AttemptRecord::new(client_id, channel));
        Ok(record.clone())
    }

    async fn record_failure(
        &self,
        block_threshold: u32,
        mut token: VerificationToken,
    ) -> Result<(AttemptRecord, VerificationToken), DomainError> {
        self.check_charges_available()?;
        let mut records = self.records.lock().await;

        let key = (token.client_id, token.channel);
        let mut record = records
            .get(&key)
            .cloned()
            .unwrap_or_else(|| AttemptRecord::new(token.client_id, token.channel));
        record.register_failure(block_threshold);

        // Token first: a failing token write leaves the ledger untouched
        if record.count >= block_threshold {
            token.mark_cancelled()?;
            self.tokens.update(token.clone()).await?;
        }
        records.insert(key, record.clone());
        Ok((record, token))
    }

    async fn record_cancellation(
        &self,
        block_threshold: u32,
        mut token: VerificationToken,
    ) -> Result<(AttemptRecord, VerificationToken), DomainError> {
        self.check_charges_available()?;
        let mut records = self.records.lock().await;

        token.mark_cancelled()?;
        self.tokens.update(token.clone()).await?;

        let record = records
            .entry((token.client_id, token.channel))
            .or_insert_with(|| AttemptRecord::new(token.client_id, token.channel));
        record.register_failure(block_threshold);
        Ok((record.clone(), token))
    }

    async fn record_success(
        &self,
        client_id: Uuid,
        channel: Channel,
    ) -> Result<AttemptRecord, DomainError> {
        let mut records = self.records.lock().await;
        let record = records
            .entry((client_id, channel))
            .or_insert_with(|| AttemptRecord::new(client_id, channel));
        record.register_success();
        Ok(record.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::verification_token::TokenStatus;

    fn repo() -> (MockAttemptRepository, Arc<MockTokenRepository>) {
        let tokens = Arc::new(MockTokenRepository::new());
        (MockAttemptRepository::new(Arc::clone(&tokens)), tokens)
    }

    async fn pending_token(tokens: &MockTokenRepository, client_id: Uuid) -> VerificationToken {
        let token = VerificationToken::new(
            client_id,
            "A3K9".to_string(),
            "$2b$08$fakehashfakehashfakehash".to_string(),
            Channel::Sms,
            "10.0.0.1".parse().unwrap(),
            150,
        );
        tokens.create(token).await.unwrap()
    }

    #[tokio::test]
    async fn get_or_create_is_idempotent() {
        let (repo, _) = repo();
        let client_id = Uuid::new_v4();

        let first = repo.get_or_create(client_id, Channel::Sms).await.unwrap();
        let second = repo.get_or_create(client_id, Channel::Sms).await.unwrap();
        assert_eq!(first.id, second.id);

        // Channels are tracked independently
        let other = repo
            .get_or_create(client_id, Channel::Whatsapp)
            .await
            .unwrap();
        assert_ne!(first.id, other.id);
    }

    #[tokio::test]
    async fn concurrent_failures_are_not_lost() {
        let (repo, tokens) = repo();
        let repo = Arc::new(repo);
        let client_id = Uuid::new_v4();
        let token = pending_token(&tokens, client_id).await;

        let a = {
            let repo = Arc::clone(&repo);
            let token = token.clone();
            tokio::spawn(async move { repo.record_failure(3, token).await })
        };
        let b = {
            let repo = Arc::clone(&repo);
            let token = token.clone();
            tokio::spawn(async move { repo.record_failure(3, token).await })
        };
        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();

        let record = repo.get_or_create(client_id, Channel::Sms).await.unwrap();
        assert_eq!(record.count, 2);
    }

    #[tokio::test]
    async fn the_blocking_charge_cancels_the_token_in_the_same_call() {
        let (repo, tokens) = repo();
        let client_id = Uuid::new_v4();
        let token = pending_token(&tokens, client_id).await;

        for _ in 0..2 {
            let (record, returned) = repo.record_failure(3, token.clone()).await.unwrap();
            assert!(!record.blocked);
            assert_eq!(returned.status, TokenStatus::Pending);
        }
        let (record, returned) = repo.record_failure(3, token.clone()).await.unwrap();
        assert!(record.blocked);
        assert_eq!(returned.status, TokenStatus::Cancelled);

        let stored = tokens.find_by_id(token.id).await.unwrap().unwrap();
        assert_eq!(stored.status, TokenStatus::Cancelled);
    }

    #[tokio::test]
    async fn cancellation_charges_and_cancels_together() {
        let (repo, tokens) = repo();
        let client_id = Uuid::new_v4();
        let token = pending_token(&tokens, client_id).await;

        let (record, returned) = repo.record_cancellation(3, token.clone()).await.unwrap();
        assert_eq!(record.count, 1);
        assert_eq!(returned.status, TokenStatus::Cancelled);

        let stored = tokens.find_by_id(token.id).await.unwrap().unwrap();
        assert_eq!(stored.status, TokenStatus::Cancelled);
    }
}
