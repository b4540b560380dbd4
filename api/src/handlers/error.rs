//! Translation of domain errors into HTTP responses
//!
//! Every response carries the error envelope with a stable machine code so
//! API consumers can branch without parsing messages.

use actix_web::HttpResponse;
use validator::ValidationErrors;

use vt_core::errors::{DomainError, VerificationError};
use vt_shared::types::ErrorBody;

/// Map a domain error to its HTTP response
pub fn domain_error_response(error: &DomainError) -> HttpResponse {
    match error {
        DomainError::Validation(e) => {
            HttpResponse::BadRequest().json(ErrorBody::new(e.to_string()).with_code(e.code()))
        }

        DomainError::Verification(e) => {
            let body = ErrorBody::new(e.to_string()).with_code(e.code());
            match e {
                VerificationError::CooldownActive { remaining_seconds } => {
                    HttpResponse::TooManyRequests()
                        .json(body.with_remaining_seconds(*remaining_seconds))
                }
                VerificationError::InvalidToken { remaining_attempts } => {
                    HttpResponse::BadRequest().json(body.with_remaining_attempts(*remaining_attempts))
                }
                VerificationError::IpMismatch => HttpResponse::Forbidden().json(body),
                VerificationError::SendFailed { .. } => {
                    HttpResponse::ServiceUnavailable().json(body)
                }
                VerificationError::NoPendingToken
                | VerificationError::MaxAttempts
                | VerificationError::TokenExpired
                | VerificationError::AlreadyRegistered
                | VerificationError::PhoneNotVerified => HttpResponse::BadRequest().json(body),
            }
        }

        DomainError::NotFound { resource } => HttpResponse::NotFound().json(
            ErrorBody::new(format!("{} not found", resource)).with_code("ERR_NOT_FOUND"),
        ),

        DomainError::Conflict { message } => {
            HttpResponse::Conflict().json(ErrorBody::new(message.clone()).with_code("ERR_CONFLICT"))
        }

        DomainError::Internal { message } => {
            log::error!("Internal error: {}", message);
            HttpResponse::InternalServerError()
                .json(ErrorBody::new("An internal error occurred").with_code("ERR_INTERNAL"))
        }
    }
}

/// Map DTO validation failures to a 400 with the offending fields listed
pub fn validation_error_response(errors: &ValidationErrors) -> HttpResponse {
    let fields: Vec<&str> = errors.field_errors().keys().copied().collect();
    HttpResponse::BadRequest().json(
        ErrorBody::new(format!("Missing or invalid fields: {}", fields.join(", ")))
            .with_code("ERR_REQUIRED_FIELD"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use vt_core::errors::ValidationError;

    #[test]
    fn status_codes_follow_the_contract() {
        let cases = [
            (
                DomainError::Verification(VerificationError::CooldownActive {
                    remaining_seconds: 90,
                }),
                StatusCode::TOO_MANY_REQUESTS,
            ),
            (
                DomainError::Verification(VerificationError::IpMismatch),
                StatusCode::FORBIDDEN,
            ),
            (
                DomainError::Verification(VerificationError::SendFailed {
                    reason: "down".to_string(),
                }),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                DomainError::Verification(VerificationError::MaxAttempts),
                StatusCode::BAD_REQUEST,
            ),
            (
                DomainError::Validation(ValidationError::InvalidPhone),
                StatusCode::BAD_REQUEST,
            ),
            (
                DomainError::NotFound {
                    resource: "Client".to_string(),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                DomainError::Internal {
                    message: "boom".to_string(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, expected) in cases {
            assert_eq!(domain_error_response(&error).status(), expected);
        }
    }
}
