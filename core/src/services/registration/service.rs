//! Registration orchestrator

use std::sync::Arc;

use uuid::Uuid;

use vt_shared::utils::validation::{
    is_present, is_valid_check_digit, is_valid_document, is_valid_email,
};

use crate::domain::entities::client::{Client, DocumentType};
use crate::domain::entities::verification_token::TokenStatus;
use crate::errors::{DomainError, DomainResult, ValidationError, VerificationError};
use crate::repositories::{ClientRepository, TokenRepository};

/// Step-1 registration data, already decoded from the transport layer
#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    pub document_type: String,
    pub document: String,
    pub check_digit: String,
    pub given_names: String,
    pub paternal_surname: String,
    pub maternal_surname: String,
}

/// Whether `register` created a new client or picked up an unfinished one
#[derive(Debug, Clone)]
pub enum RegistrationOutcome {
    Created(Client),
    Resumed(Client),
}

impl RegistrationOutcome {
    pub fn client(&self) -> &Client {
        match self {
            RegistrationOutcome::Created(client) | RegistrationOutcome::Resumed(client) => client,
        }
    }

    pub fn is_resumed(&self) -> bool {
        matches!(self, RegistrationOutcome::Resumed(_))
    }
}

/// Orchestrates registration step 1 (identity) and step 4 (finalize).
/// Steps 2 and 3 are the token request/verify operations of the
/// verification service.
pub struct RegistrationService<C, T>
where
    C: ClientRepository,
    T: TokenRepository,
{
    clients: Arc<C>,
    tokens: Arc<T>,
}

impl<C, T> RegistrationService<C, T>
where
    C: ClientRepository,
    T: TokenRepository,
{
    pub fn new(clients: Arc<C>, tokens: Arc<T>) -> Self {
        Self { clients, tokens }
    }

    /// Create the client record from identity data, or resume an unfinished
    /// registration for the same document.
    ///
    /// A document that already belongs to a completed registration is
    /// rejected; an unfinished one is returned as-is so the caller can
    /// continue where it left off.
    pub async fn register(&self, request: RegistrationRequest) -> DomainResult<RegistrationOutcome> {
        let type_code = request.document_type.trim().to_uppercase();
        let document_type =
            DocumentType::parse(&type_code).ok_or(ValidationError::InvalidDocumentType)?;

        let document = request.document.trim().to_string();
        if !is_valid_document(&type_code, &document) {
            return Err(ValidationError::InvalidDocumentNumber {
                expected: document_type.expected_length(),
            }
            .into());
        }

        let check_digit = request.check_digit.trim().to_string();
        if !is_valid_check_digit(&check_digit) {
            return Err(ValidationError::InvalidCheckDigit.into());
        }

        let given_names = request.given_names.trim().to_string();
        let paternal_surname = request.paternal_surname.trim().to_string();
        let maternal_surname = request.maternal_surname.trim().to_string();
        for (field, value) in [
            ("given_names", &given_names),
            ("paternal_surname", &paternal_surname),
            ("maternal_surname", &maternal_surname),
        ] {
            if !is_present(value) {
                return Err(ValidationError::RequiredField {
                    field: field.to_string(),
                }
                .into());
            }
        }

        if let Some(existing) = self.clients.find_by_document(&document).await? {
            if existing.completed {
                tracing::info!(
                    client_id = %existing.id,
                    event = "register_duplicate",
                    "Registration attempt for an already completed document"
                );
                return Err(VerificationError::AlreadyRegistered.into());
            }
            tracing::info!(
                client_id = %existing.id,
                event = "register_resumed",
                "Unfinished registration resumed"
            );
            return Ok(RegistrationOutcome::Resumed(existing));
        }

        let client = Client::new(
            document_type,
            document,
            check_digit,
            given_names,
            paternal_surname,
            maternal_surname,
        );
        let client = self.clients.create(client).await?;
        tracing::info!(
            client_id = %client.id,
            document_type = document_type.as_str(),
            event = "client_registered",
            "New client created"
        );
        Ok(RegistrationOutcome::Created(client))
    }

    /// Complete the registration with contact and residence data.
    ///
    /// Requires an accepted terms flag, a syntactically valid email and a
    /// phone number already verified through the token flow. Irreversible.
    pub async fn finalize(
        &self,
        client_id: Uuid,
        email: &str,
        department: Option<String>,
        province: Option<String>,
        district: Option<String>,
        accepted_terms: bool,
    ) -> DomainResult<Client> {
        let mut client =
            self.clients
                .find_by_id(client_id)
                .await?
                .ok_or_else(|| DomainError::NotFound {
                    resource: "Client".to_string(),
                })?;
        if client.completed {
            return Err(VerificationError::AlreadyRegistered.into());
        }

        if !accepted_terms {
            return Err(ValidationError::TermsNotAccepted.into());
        }
        let email = email.trim().to_lowercase();
        if !is_valid_email(&email) {
            return Err(ValidationError::InvalidEmail.into());
        }

        let verified = match client.current_token_id {
            Some(token_id) => self
                .tokens
                .find_by_id(token_id)
                .await?
                .map(|token| token.status == TokenStatus::Validated)
                .unwrap_or(false),
            None => false,
        };
        if !verified {
            return Err(VerificationError::PhoneNotVerified.into());
        }

        let trim_opt = |value: Option<String>| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        client.complete(
            email,
            trim_opt(department),
            trim_opt(province),
            trim_opt(district),
        )?;
        let client = self.clients.update(client).await?;

        tracing::info!(
            client_id = %client.id,
            event = "registration_completed",
            "Client registration finalized"
        );
        Ok(client)
    }
}
