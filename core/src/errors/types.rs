//! Error types for the verification workflow and input validation
//!
//! Each variant carries a stable machine code (see [`VerificationError::code`]
//! and [`ValidationError::code`]) that the HTTP layer surfaces to clients,
//! matching the public API contract.

use thiserror::Error;

/// Failures of the verification state machine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    #[error("Mandatory wait period active, {remaining_seconds}s remaining")]
    CooldownActive { remaining_seconds: u64 },

    #[error("No pending token found, request a new one")]
    NoPendingToken,

    #[error("Incorrect code, {remaining_attempts} attempt(s) remaining")]
    InvalidToken { remaining_attempts: u32 },

    #[error("Maximum attempts reached, this code has been invalidated")]
    MaxAttempts,

    #[error("The token has expired, request a new one")]
    TokenExpired,

    #[error("Verification IP does not match the IP that requested the token")]
    IpMismatch,

    #[error("Message delivery failed: {reason}")]
    SendFailed { reason: String },

    #[error("Client is already registered and verified")]
    AlreadyRegistered,

    #[error("Phone number has not been verified yet")]
    PhoneNotVerified,
}

impl VerificationError {
    /// Stable machine code for API consumers
    pub fn code(&self) -> &'static str {
        match self {
            VerificationError::CooldownActive { .. } => "ERR_COOLDOWN_ACTIVE",
            VerificationError::NoPendingToken => "ERR_NO_PENDING_TOKEN",
            VerificationError::InvalidToken { .. } => "ERR_INVALID_TOKEN",
            VerificationError::MaxAttempts => "ERR_MAX_ATTEMPTS",
            VerificationError::TokenExpired => "ERR_TOKEN_EXPIRED",
            VerificationError::IpMismatch => "ERR_IP_MISMATCH",
            VerificationError::SendFailed { .. } => "ERR_SEND_FAILED",
            VerificationError::AlreadyRegistered => "ALREADY_REGISTERED",
            VerificationError::PhoneNotVerified => "ERR_PHONE_NOT_VERIFIED",
        }
    }
}

/// Input validation failures, surfaced before any state mutation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid document type (DNI, RUC, CDE)")]
    InvalidDocumentType,

    #[error("Document number must be exactly {expected} digits")]
    InvalidDocumentNumber { expected: usize },

    #[error("Check digit must be numeric")]
    InvalidCheckDigit,

    #[error("Required field: {field}")]
    RequiredField { field: String },

    #[error("Phone number must be exactly 9 digits, no letters or prefixes")]
    InvalidPhone,

    #[error("Invalid operator (MOVISTAR, BITEL, CLARO, ENTEL)")]
    InvalidOperator,

    #[error("Invalid delivery channel (only S or W)")]
    InvalidChannel,

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Terms and conditions must be accepted")]
    TermsNotAccepted,
}

impl ValidationError {
    /// Stable machine code for API consumers
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::InvalidDocumentType => "ERR_INVALID_DOCUMENT_TYPE",
            ValidationError::InvalidDocumentNumber { .. } => "ERR_INVALID_DOCUMENT_NUMBER",
            ValidationError::InvalidCheckDigit => "ERR_INVALID_CHECK_DIGIT",
            ValidationError::RequiredField { .. } => "ERR_REQUIRED_FIELD",
            ValidationError::InvalidPhone => "ERR_INVALID_PHONE",
            ValidationError::InvalidOperator => "ERR_INVALID_OPERATOR",
            ValidationError::InvalidChannel => "ERR_INVALID_CHANNEL",
            ValidationError::InvalidEmail => "ERR_INVALID_EMAIL",
            ValidationError::TermsNotAccepted => "ERR_TERMS_NOT_ACCEPTED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verification_error_messages_carry_context() {
        let err = VerificationError::CooldownActive {
            remaining_seconds: 42,
        };
        assert!(err.to_string().contains("42"));
        assert_eq!(err.code(), "ERR_COOLDOWN_ACTIVE");

        let err = VerificationError::InvalidToken {
            remaining_attempts: 2,
        };
        assert!(err.to_string().contains('2'));
    }

    #[test]
    fn validation_error_codes_are_stable() {
        assert_eq!(ValidationError::InvalidPhone.code(), "ERR_INVALID_PHONE");
        assert_eq!(
            ValidationError::InvalidDocumentNumber { expected: 8 }.code(),
            "ERR_INVALID_DOCUMENT_NUMBER"
        );
    }
}
