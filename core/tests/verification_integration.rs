//! End-to-end test of the registration and verification workflow over the
//! in-memory repositories.

use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use vt_core::domain::entities::verification_token::Channel;
use vt_core::errors::{DomainError, VerificationError};
use vt_core::repositories::{
    MockAttemptRepository, MockClientRepository, MockTokenRepository, TokenRepository,
};
use vt_core::services::registration::{RegistrationRequest, RegistrationService};
use vt_core::services::verification::{MessageSender, VerificationConfig, VerificationService};

/// Captures the last delivered message body so the test can read the code
/// out of it, exactly as a phone owner would.
#[derive(Default)]
struct CapturingSender {
    last_message: std::sync::Mutex<Option<String>>,
    deliveries: AtomicUsize,
}

#[async_trait]
impl MessageSender for CapturingSender {
    async fn send(
        &self,
        _channel: Channel,
        _destination: &str,
        message: &str,
    ) -> Result<String, String> {
        let n = self.deliveries.fetch_add(1, Ordering::SeqCst);
        *self.last_message.lock().unwrap() = Some(message.to_string());
        Ok(format!("msg-{}", n))
    }
}

struct World {
    registration: RegistrationService<MockClientRepository, MockTokenRepository>,
    verification: Arc<
        VerificationService<
            MockClientRepository,
            MockTokenRepository,
            MockAttemptRepository,
            CapturingSender,
        >,
    >,
    tokens: Arc<MockTokenRepository>,
    sender: Arc<CapturingSender>,
}

fn world() -> World {
    let clients = Arc::new(MockClientRepository::new());
    let tokens = Arc::new(MockTokenRepository::new());
    let attempts = Arc::new(MockAttemptRepository::new(Arc::clone(&tokens)));
    let sender = Arc::new(CapturingSender::default());
    World {
        registration: RegistrationService::new(Arc::clone(&clients), Arc::clone(&tokens)),
        verification: Arc::new(VerificationService::new(
            clients,
            Arc::clone(&tokens),
            attempts,
            Arc::clone(&sender),
            VerificationConfig::default(),
        )),
        tokens,
        sender,
    }
}

fn ip() -> IpAddr {
    "181.65.12.34".parse().unwrap()
}

fn identity() -> RegistrationRequest {
    RegistrationRequest {
        document_type: "DNI".to_string(),
        document: "40302010".to_string(),
        check_digit: "9".to_string(),
        given_names: "Carmen".to_string(),
        paternal_surname: "Huaman".to_string(),
        maternal_surname: "Rios".to_string(),
    }
}

#[tokio::test]
async fn full_registration_flow() {
    let w = world();

    // Step 1: identity
    let client_id = w.registration.register(identity()).await.unwrap().client().id;

    // Step 4 before verification is rejected
    let err = w
        .registration
        .finalize(client_id, "carmen@example.com", None, None, None, true)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Verification(VerificationError::PhoneNotVerified)
    ));

    // Step 2: request a code over SMS
    let requested = w
        .verification
        .request_token(client_id, "912345678", "CLARO", "S", ip())
        .await
        .unwrap();
    assert_eq!(requested.expires_in_seconds, 150);
    assert_eq!(w.sender.deliveries.load(Ordering::SeqCst), 1);

    // Step 3: the code from the delivered message verifies the phone
    let code = w
        .tokens
        .find_by_id(requested.token_id)
        .await
        .unwrap()
        .unwrap()
        .code;
    let message = w.sender.last_message.lock().unwrap().clone().unwrap();
    assert!(message.contains(&code));

    let verified = w.verification.verify_token(client_id, &code, ip()).await.unwrap();
    assert_eq!(verified.token_id, requested.token_id);

    // Step 4: finalize
    let client = w
        .registration
        .finalize(
            client_id,
            "carmen@example.com",
            Some("Cusco".to_string()),
            None,
            None,
            true,
        )
        .await
        .unwrap();
    assert!(client.completed);

    // Every further operation on the completed client is rejected
    let err = w
        .verification
        .request_token(client_id, "912345678", "CLARO", "S", ip())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Verification(VerificationError::AlreadyRegistered)
    ));
    let err = w.registration.register(identity()).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Verification(VerificationError::AlreadyRegistered)
    ));
}

#[tokio::test]
async fn concurrent_wrong_submissions_are_both_charged() {
    let w = world();
    let client_id = w.registration.register(identity()).await.unwrap().client().id;
    w.verification
        .request_token(client_id, "912345678", "ENTEL", "W", ip())
        .await
        .unwrap();

    // "0000" is outside the code alphabet and can never match
    let a = {
        let service = Arc::clone(&w.verification);
        tokio::spawn(async move { service.verify_token(client_id, "0000", ip()).await })
    };
    let b = {
        let service = Arc::clone(&w.verification);
        tokio::spawn(async move { service.verify_token(client_id, "0000", ip()).await })
    };
    assert!(a.await.unwrap().is_err());
    assert!(b.await.unwrap().is_err());

    let status = w.verification.cooldown_status(client_id, "W").await.unwrap();
    assert_eq!(status.attempts, 2);
}
