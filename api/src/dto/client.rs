//! Client registration and verification DTOs
//!
//! Field names follow the public API contract (Spanish wire names). Only
//! presence and basic shape are checked here; the domain layer owns the
//! real validation rules and their stable error codes.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Body of `POST /clients` (registration step 1)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Document type code: DNI, RUC or CDE
    #[validate(length(min = 1, message = "tipo_documento is required"))]
    pub tipo_documento: String,

    /// Document number
    #[validate(length(min = 1, message = "documento is required"))]
    pub documento: String,

    /// Check digit
    #[validate(length(min = 1, message = "dv is required"))]
    pub dv: String,

    /// Given names
    #[validate(length(min = 1, message = "nombres is required"))]
    pub nombres: String,

    /// Paternal surname
    #[validate(length(min = 1, message = "ap_paterno is required"))]
    pub ap_paterno: String,

    /// Maternal surname
    #[validate(length(min = 1, message = "ap_materno is required"))]
    pub ap_materno: String,
}

/// Response of `POST /clients`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisteredResponse {
    pub id: Uuid,
    /// True when an unfinished registration was picked up instead of created
    pub resumed: bool,
}

/// Body of `POST /clients/{id}/token` (step 2)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TokenRequest {
    /// Local 9-digit mobile number
    #[validate(length(min = 1, message = "celular is required"))]
    pub celular: String,

    /// Mobile operator name
    #[validate(length(min = 1, message = "operador is required"))]
    pub operador: String,

    /// Delivery channel code: S (SMS) or W (chat app)
    #[validate(length(min = 1, message = "via is required"))]
    pub via: String,
}

/// Response of `GET /clients/{id}/verify/{code}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifiedResponse {
    pub status: String,
    pub token_id: Uuid,
    pub elapsed_seconds: i64,
}

/// Body of `POST /clients/{id}/finalize` (step 4)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FinalizeRequest {
    /// Contact email
    #[validate(length(min = 1, message = "correo is required"))]
    pub correo: String,

    pub departamento: Option<String>,
    pub provincia: Option<String>,
    pub distrito: Option<String>,

    /// Terms and conditions acceptance flag
    pub accept: bool,
}

/// Response of `POST /clients/{id}/finalize`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalizedResponse {
    pub id: Uuid,
    pub completed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_request_rejects_empty_fields() {
        let request = RegisterRequest {
            tipo_documento: "DNI".to_string(),
            documento: "".to_string(),
            dv: "7".to_string(),
            nombres: "Ana".to_string(),
            ap_paterno: "Quispe".to_string(),
            ap_materno: "Flores".to_string(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn token_request_deserializes_wire_names() {
        let request: TokenRequest = serde_json::from_str(
            r#"{"celular": "987654321", "operador": "MOVISTAR", "via": "S"}"#,
        )
        .unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.via, "S");
    }
}
