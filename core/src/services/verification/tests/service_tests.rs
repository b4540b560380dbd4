//! Scenario tests for [`VerificationService`] over in-memory repositories

use std::net::IpAddr;
use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::client::{Client, DocumentType};
use crate::domain::entities::verification_token::{Channel, TokenStatus};
use crate::errors::{DomainError, ValidationError, VerificationError};
use crate::repositories::{
    AttemptRepository, ClientRepository, MockAttemptRepository, MockClientRepository,
    MockTokenRepository, TokenRepository,
};
use crate::services::verification::config::VerificationConfig;
use crate::services::verification::service::VerificationService;

use super::mocks::MockMessageSender;

type TestService = VerificationService<
    MockClientRepository,
    MockTokenRepository,
    MockAttemptRepository,
    MockMessageSender,
>;

struct Harness {
    service: TestService,
    clients: Arc<MockClientRepository>,
    tokens: Arc<MockTokenRepository>,
    attempts: Arc<MockAttemptRepository>,
    sender: Arc<MockMessageSender>,
}

fn harness(config: VerificationConfig) -> Harness {
    let clients = Arc::new(MockClientRepository::new());
    let tokens = Arc::new(MockTokenRepository::new());
    let attempts = Arc::new(MockAttemptRepository::new(Arc::clone(&tokens)));
    let sender = Arc::new(MockMessageSender::new());
    let service = VerificationService::new(
        Arc::clone(&clients),
        Arc::clone(&tokens),
        Arc::clone(&attempts),
        Arc::clone(&sender),
        config,
    );
    Harness {
        service,
        clients,
        tokens,
        attempts,
        sender,
    }
}

fn default_harness() -> Harness {
    harness(VerificationConfig::default())
}

fn caller_ip() -> IpAddr {
    "181.65.200.14".parse().unwrap()
}

fn other_ip() -> IpAddr {
    "181.65.200.99".parse().unwrap()
}

async fn seed_client(h: &Harness) -> Uuid {
    let client = Client::new(
        DocumentType::Dni,
        "45879632".to_string(),
        "4".to_string(),
        "Luis".to_string(),
        "Torres".to_string(),
        "Mendoza".to_string(),
    );
    h.clients.create(client).await.unwrap().id
}

async fn request(h: &Harness, client_id: Uuid) -> Uuid {
    h.service
        .request_token(client_id, "987654321", "MOVISTAR", "S", caller_ip())
        .await
        .unwrap()
        .token_id
}

/// The plaintext code of a stored token, for replaying it as the caller would
async fn stored_code(h: &Harness, token_id: Uuid) -> String {
    h.tokens.find_by_id(token_id).await.unwrap().unwrap().code
}

async fn token_status(h: &Harness, token_id: Uuid) -> TokenStatus {
    h.tokens
        .find_by_id(token_id)
        .await
        .unwrap()
        .unwrap()
        .status
}

#[tokio::test]
async fn request_token_mints_pending_token_and_delivers() {
    let h = default_harness();
    let client_id = seed_client(&h).await;

    let result = h
        .service
        .request_token(client_id, " 987654321 ", "movistar", "s", caller_ip())
        .await
        .unwrap();
    assert_eq!(result.expires_in_seconds, 150);

    let token = h.tokens.find_by_id(result.token_id).await.unwrap().unwrap();
    assert_eq!(token.status, TokenStatus::Pending);
    assert_eq!(token.requester_ip, caller_ip());
    assert_eq!(token.code.len(), 4);

    let client = h.clients.find_by_id(client_id).await.unwrap().unwrap();
    assert_eq!(client.phone.as_deref(), Some("987654321"));
    assert_eq!(client.current_token_id, Some(result.token_id));

    let sent = h.sender.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].1, "987654321");
    assert!(sent[0].2.contains(&token.code));
}

#[tokio::test]
async fn request_token_validates_inputs() {
    let h = default_harness();
    let client_id = seed_client(&h).await;

    let err = h
        .service
        .request_token(client_id, "12345", "MOVISTAR", "S", caller_ip())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationError::InvalidPhone)
    ));

    let err = h
        .service
        .request_token(client_id, "987654321", "VODAFONE", "S", caller_ip())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationError::InvalidOperator)
    ));

    let err = h
        .service
        .request_token(client_id, "987654321", "MOVISTAR", "Z", caller_ip())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationError::InvalidChannel)
    ));

    // Nothing was minted or delivered
    let client = h.clients.find_by_id(client_id).await.unwrap().unwrap();
    assert!(client.current_token_id.is_none());
    assert_eq!(h.sender.sent_count().await, 0);
}

#[tokio::test]
async fn request_token_rejects_unknown_and_completed_clients() {
    let h = default_harness();

    let err = h
        .service
        .request_token(Uuid::new_v4(), "987654321", "MOVISTAR", "S", caller_ip())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));

    let client_id = seed_client(&h).await;
    let mut client = h.clients.find_by_id(client_id).await.unwrap().unwrap();
    client
        .complete("luis@example.com".to_string(), None, None, None)
        .unwrap();
    h.clients.update(client).await.unwrap();

    // Every operation rejects a completed client
    let err = h
        .service
        .request_token(client_id, "987654321", "MOVISTAR", "S", caller_ip())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Verification(VerificationError::AlreadyRegistered)
    ));
    for err in [
        h.service
            .verify_token(client_id, "0000", caller_ip())
            .await
            .unwrap_err(),
        h.service.cancel_token(client_id).await.unwrap_err(),
        h.service.expire_token(client_id).await.unwrap_err(),
        h.service.cooldown_status(client_id, "S").await.unwrap_err(),
    ] {
        assert!(matches!(
            err,
            DomainError::Verification(VerificationError::AlreadyRegistered)
        ));
    }
}

#[tokio::test]
async fn delivery_failure_marks_token_not_sent_without_charging() {
    let h = default_harness();
    let client_id = seed_client(&h).await;
    h.sender.set_failing(true);

    let err = h
        .service
        .request_token(client_id, "987654321", "BITEL", "S", caller_ip())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Verification(VerificationError::SendFailed { .. })
    ));

    let client = h.clients.find_by_id(client_id).await.unwrap().unwrap();
    let token_id = client.current_token_id.unwrap();
    assert_eq!(token_status(&h, token_id).await, TokenStatus::NotSent);

    // No retry budget consumed, so recovery is an ordinary re-request
    let ledger = h
        .attempts
        .get_or_create(client_id, Channel::Sms)
        .await
        .unwrap();
    assert_eq!(ledger.count, 0);

    h.sender.set_failing(false);
    let retried = request(&h, client_id).await;
    assert_eq!(token_status(&h, retried).await, TokenStatus::Pending);
}

#[tokio::test]
async fn dry_run_skips_delivery_but_mints_a_usable_token() {
    let h = harness(VerificationConfig {
        dry_run: true,
        ..VerificationConfig::default()
    });
    let client_id = seed_client(&h).await;

    let token_id = request(&h, client_id).await;
    assert_eq!(h.sender.sent_count().await, 0);
    assert_eq!(token_status(&h, token_id).await, TokenStatus::Pending);

    let code = stored_code(&h, token_id).await;
    let verified = h
        .service
        .verify_token(client_id, &code, caller_ip())
        .await
        .unwrap();
    assert_eq!(verified.token_id, token_id);
}

#[tokio::test]
async fn new_request_supersedes_the_pending_token() {
    let h = default_harness();
    let client_id = seed_client(&h).await;

    let first = request(&h, client_id).await;
    let second = request(&h, client_id).await;
    assert_ne!(first, second);

    assert_eq!(token_status(&h, first).await, TokenStatus::Expired);
    assert_eq!(token_status(&h, second).await, TokenStatus::Pending);

    let client = h.clients.find_by_id(client_id).await.unwrap().unwrap();
    assert_eq!(client.current_token_id, Some(second));

    // The superseded code no longer verifies anything
    let old_code = stored_code(&h, first).await;
    let new_code = stored_code(&h, second).await;
    if old_code != new_code {
        let err = h
            .service
            .verify_token(client_id, &old_code, caller_ip())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::Verification(VerificationError::InvalidToken { .. })
        ));
    }
}

#[tokio::test]
async fn wrong_code_charges_the_ledger_and_reports_remaining_attempts() {
    let h = default_harness();
    let client_id = seed_client(&h).await;
    let token_id = request(&h, client_id).await;

    // "0000" is outside the code alphabet, so it can never match
    let err = h
        .service
        .verify_token(client_id, "0000", caller_ip())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Verification(VerificationError::InvalidToken {
            remaining_attempts: 2
        })
    ));

    let err = h
        .service
        .verify_token(client_id, "0000", caller_ip())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Verification(VerificationError::InvalidToken {
            remaining_attempts: 1
        })
    ));

    // Still pending: two failures do not invalidate the token
    assert_eq!(token_status(&h, token_id).await, TokenStatus::Pending);
}

#[tokio::test]
async fn third_failure_blocks_the_pair_and_cancels_the_token() {
    let h = default_harness();
    let client_id = seed_client(&h).await;
    let token_id = request(&h, client_id).await;

    for _ in 0..2 {
        let _ = h
            .service
            .verify_token(client_id, "0000", caller_ip())
            .await
            .unwrap_err();
    }
    let err = h
        .service
        .verify_token(client_id, "0000", caller_ip())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Verification(VerificationError::MaxAttempts)
    ));
    assert_eq!(token_status(&h, token_id).await, TokenStatus::Cancelled);

    // The blocked pair gates new requests until the wait elapses
    let err = h
        .service
        .request_token(client_id, "987654321", "MOVISTAR", "S", caller_ip())
        .await
        .unwrap_err();
    match err {
        DomainError::Verification(VerificationError::CooldownActive { remaining_seconds }) => {
            assert!(remaining_seconds > 0 && remaining_seconds <= 180);
        }
        other => panic!("expected CooldownActive, got {:?}", other),
    }

    // The other channel is unaffected
    let status = h.service.cooldown_status(client_id, "W").await.unwrap();
    assert!(status.can_request);
    assert_eq!(status.attempts, 0);
}

#[tokio::test]
async fn ip_mismatch_is_rejected_without_charging() {
    let h = default_harness();
    let client_id = seed_client(&h).await;
    let token_id = request(&h, client_id).await;
    let code = stored_code(&h, token_id).await;

    let err = h
        .service
        .verify_token(client_id, &code, other_ip())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Verification(VerificationError::IpMismatch)
    ));

    // Token still pending, no retry budget consumed
    assert_eq!(token_status(&h, token_id).await, TokenStatus::Pending);
    let status = h.service.cooldown_status(client_id, "S").await.unwrap();
    assert_eq!(status.attempts, 0);

    // The pinned IP can still finish
    h.service
        .verify_token(client_id, &code, caller_ip())
        .await
        .unwrap();
}

#[tokio::test]
async fn correct_code_after_the_deadline_expires_the_token() {
    let h = default_harness();
    let client_id = seed_client(&h).await;
    let token_id = request(&h, client_id).await;
    let code = stored_code(&h, token_id).await;

    let mut token = h.tokens.find_by_id(token_id).await.unwrap().unwrap();
    token.expires_at = Utc::now() - Duration::seconds(1);
    h.tokens.update(token).await.unwrap();

    let err = h
        .service
        .verify_token(client_id, &code, caller_ip())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Verification(VerificationError::TokenExpired)
    ));
    assert_eq!(token_status(&h, token_id).await, TokenStatus::Expired);
}

#[tokio::test]
async fn successful_verification_is_terminal_and_clears_the_block_flag() {
    let h = default_harness();
    let client_id = seed_client(&h).await;
    let token_id = request(&h, client_id).await;
    let code = stored_code(&h, token_id).await;

    // Two misses first, then the real code (lowercase, padded: the service
    // normalizes the submission before comparing)
    for _ in 0..2 {
        let _ = h
            .service
            .verify_token(client_id, "0000", caller_ip())
            .await
            .unwrap_err();
    }
    let verified = h
        .service
        .verify_token(client_id, &format!(" {} ", code.to_lowercase()), caller_ip())
        .await
        .unwrap();
    assert_eq!(verified.token_id, token_id);
    assert!(verified.elapsed_seconds >= 0);
    assert_eq!(token_status(&h, token_id).await, TokenStatus::Validated);

    // Count stays as audit trail, the block flag is clear
    let status = h.service.cooldown_status(client_id, "S").await.unwrap();
    assert_eq!(status.attempts, 2);
    assert!(!status.blocked);

    // A validated token cannot be verified again
    let err = h
        .service
        .verify_token(client_id, &code, caller_ip())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Verification(VerificationError::NoPendingToken)
    ));
}

#[tokio::test]
async fn cancel_charges_one_attempt() {
    let h = default_harness();
    let client_id = seed_client(&h).await;
    let token_id = request(&h, client_id).await;

    h.service.cancel_token(client_id).await.unwrap();
    assert_eq!(token_status(&h, token_id).await, TokenStatus::Cancelled);

    let status = h.service.cooldown_status(client_id, "S").await.unwrap();
    assert_eq!(status.attempts, 1);

    let err = h.service.cancel_token(client_id).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Verification(VerificationError::NoPendingToken)
    ));
}

#[tokio::test]
async fn a_failed_charge_leaves_no_partial_state() {
    let h = default_harness();
    let client_id = seed_client(&h).await;
    let token_id = request(&h, client_id).await;

    // Two misses, then a storage failure on the charge that would block
    for _ in 0..2 {
        let _ = h
            .service
            .verify_token(client_id, "0000", caller_ip())
            .await
            .unwrap_err();
    }
    h.attempts.set_fail_charges(true);
    let err = h
        .service
        .verify_token(client_id, "0000", caller_ip())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Internal { .. }));

    // Neither the charge nor the cancellation landed
    assert_eq!(token_status(&h, token_id).await, TokenStatus::Pending);
    let ledger = h
        .attempts
        .get_or_create(client_id, Channel::Sms)
        .await
        .unwrap();
    assert_eq!(ledger.count, 2);
    assert!(!ledger.blocked);

    // Same for a voluntary cancellation: it cannot come out free
    let err = h.service.cancel_token(client_id).await.unwrap_err();
    assert!(matches!(err, DomainError::Internal { .. }));
    assert_eq!(token_status(&h, token_id).await, TokenStatus::Pending);
    assert_eq!(
        h.attempts
            .get_or_create(client_id, Channel::Sms)
            .await
            .unwrap()
            .count,
        2
    );

    // Once storage recovers the pending token finishes the normal way
    h.attempts.set_fail_charges(false);
    let err = h
        .service
        .verify_token(client_id, "0000", caller_ip())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Verification(VerificationError::MaxAttempts)
    ));
    assert_eq!(token_status(&h, token_id).await, TokenStatus::Cancelled);
}

#[tokio::test]
async fn expire_is_no_fault_and_idempotent() {
    let h = default_harness();
    let client_id = seed_client(&h).await;
    let token_id = request(&h, client_id).await;

    assert!(h.service.expire_token(client_id).await.unwrap());
    assert_eq!(token_status(&h, token_id).await, TokenStatus::Expired);
    assert!(!h.service.expire_token(client_id).await.unwrap());

    // Timeouts never consume retry budget
    let status = h.service.cooldown_status(client_id, "S").await.unwrap();
    assert_eq!(status.attempts, 0);
    assert!(status.can_request);
}

#[tokio::test]
async fn cooldown_status_reports_the_schedule() {
    let h = default_harness();
    let client_id = seed_client(&h).await;

    let fresh = h.service.cooldown_status(client_id, "S").await.unwrap();
    assert_eq!(fresh.attempts, 0);
    assert_eq!(fresh.next_attempt_number, 1);
    assert_eq!(fresh.wait_seconds, 0);
    assert!(fresh.can_request);

    request(&h, client_id).await;
    for _ in 0..2 {
        let _ = h
            .service
            .verify_token(client_id, "0000", caller_ip())
            .await
            .unwrap_err();
    }

    let status = h.service.cooldown_status(client_id, "S").await.unwrap();
    assert_eq!(status.attempts, 2);
    assert_eq!(status.next_attempt_number, 3);
    assert_eq!(status.wait_seconds, 90);
    assert!(status.remaining_seconds > 0 && status.remaining_seconds <= 90);
    assert!(!status.blocked);
    assert!(!status.can_request);

    let err = h
        .service
        .cooldown_status(client_id, "Z")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationError::InvalidChannel)
    ));
    let err = h
        .service
        .cooldown_status(Uuid::new_v4(), "S")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}
