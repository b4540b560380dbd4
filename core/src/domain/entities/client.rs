//! Client entity: the identity being registered through the four-step flow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{DomainError, DomainResult};

/// Identity document type accepted at registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DocumentType {
    /// National identity document, 8 digits
    Dni,
    /// Tax registry number, 11 digits
    Ruc,
    /// Foreigner card, 9 digits
    Cde,
}

impl DocumentType {
    /// Exact number of digits the document number must have
    pub fn expected_length(&self) -> usize {
        match self {
            DocumentType::Dni => 8,
            DocumentType::Ruc => 11,
            DocumentType::Cde => 9,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Dni => "DNI",
            DocumentType::Ruc => "RUC",
            DocumentType::Cde => "CDE",
        }
    }

    /// Parse a (normalized, uppercase) type code
    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "DNI" => Some(DocumentType::Dni),
            "RUC" => Some(DocumentType::Ruc),
            "CDE" => Some(DocumentType::Cde),
            _ => None,
        }
    }
}

/// Mobile network operator of the verified phone number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operator {
    Movistar,
    Bitel,
    Claro,
    Entel,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Movistar => "MOVISTAR",
            Operator::Bitel => "BITEL",
            Operator::Claro => "CLARO",
            Operator::Entel => "ENTEL",
        }
    }

    /// Parse a (normalized, uppercase) operator name
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "MOVISTAR" => Some(Operator::Movistar),
            "BITEL" => Some(Operator::Bitel),
            "CLARO" => Some(Operator::Claro),
            "ENTEL" => Some(Operator::Entel),
            _ => None,
        }
    }
}

/// Client entity
///
/// Created on registration step 1, mutated through steps 2-4, never deleted
/// by this subsystem. `completed` is terminal: once true, every further
/// state mutation for this client is rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    /// Unique identifier
    pub id: Uuid,

    /// Document type
    pub document_type: DocumentType,

    /// Document number, globally unique
    pub document: String,

    /// Numeric check digit accompanying the document
    pub check_digit: String,

    /// Given names
    pub given_names: String,

    /// Paternal surname
    pub paternal_surname: String,

    /// Maternal surname
    pub maternal_surname: String,

    /// Verified mobile number (9 local digits), set on step 2
    pub phone: Option<String>,

    /// Mobile operator, set on step 2
    pub operator: Option<Operator>,

    /// Contact email, set on step 4
    pub email: Option<String>,

    /// Department of residence, set on step 4
    pub department: Option<String>,

    /// Province of residence, set on step 4
    pub province: Option<String>,

    /// District of residence, set on step 4
    pub district: Option<String>,

    /// Whether terms and conditions were accepted (step 4)
    pub accepted_terms: bool,

    /// Registration completed flag; terminal once true
    pub completed: bool,

    /// Pointer to the token currently governing verification.
    /// Replaces most-recent-row lookups by timestamp.
    pub current_token_id: Option<Uuid>,

    /// Timestamp when the client was created
    pub created_at: DateTime<Utc>,

    /// Timestamp of the last update
    pub updated_at: DateTime<Utc>,
}

impl Client {
    /// Create a new client from step-1 registration data
    pub fn new(
        document_type: DocumentType,
        document: String,
        check_digit: String,
        given_names: String,
        paternal_surname: String,
        maternal_surname: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            document_type,
            document,
            check_digit,
            given_names,
            paternal_surname,
            maternal_surname,
            phone: None,
            operator: None,
            email: None,
            department: None,
            province: None,
            district: None,
            accepted_terms: false,
            completed: false,
            current_token_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Store the contact details submitted with a token request
    pub fn set_contact(&mut self, phone: String, operator: Operator) {
        self.phone = Some(phone);
        self.operator = Some(operator);
        self.updated_at = Utc::now();
    }

    /// Point the client at a freshly minted token
    pub fn set_current_token(&mut self, token_id: Uuid) {
        self.current_token_id = Some(token_id);
        self.updated_at = Utc::now();
    }

    /// Flip the terminal completion flag. Only the finalize step calls this;
    /// it is irreversible.
    pub fn complete(
        &mut self,
        email: String,
        department: Option<String>,
        province: Option<String>,
        district: Option<String>,
    ) -> DomainResult<()> {
        if self.completed {
            return Err(DomainError::Conflict {
                message: "Client registration already completed".to_string(),
            });
        }
        self.email = Some(email);
        self.department = department;
        self.province = province;
        self.district = district;
        self.accepted_terms = true;
        self.completed = true;
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_client() -> Client {
        Client::new(
            DocumentType::Dni,
            "12345678".to_string(),
            "7".to_string(),
            "Ana Maria".to_string(),
            "Quispe".to_string(),
            "Flores".to_string(),
        )
    }

    #[test]
    fn new_client_starts_incomplete() {
        let client = sample_client();
        assert!(!client.completed);
        assert!(client.current_token_id.is_none());
        assert!(client.phone.is_none());
    }

    #[test]
    fn document_type_lengths() {
        assert_eq!(DocumentType::Dni.expected_length(), 8);
        assert_eq!(DocumentType::Ruc.expected_length(), 11);
        assert_eq!(DocumentType::Cde.expected_length(), 9);
        assert_eq!(DocumentType::parse("DNI"), Some(DocumentType::Dni));
        assert_eq!(DocumentType::parse("PAS"), None);
    }

    #[test]
    fn operator_parsing_is_strict() {
        assert_eq!(Operator::parse("MOVISTAR"), Some(Operator::Movistar));
        assert_eq!(Operator::parse("movistar"), None);
        assert_eq!(Operator::parse("VODAFONE"), None);
    }

    #[test]
    fn complete_is_irreversible() {
        let mut client = sample_client();
        client
            .complete("ana@example.com".to_string(), None, None, None)
            .unwrap();
        assert!(client.completed);
        assert!(client.accepted_terms);

        let err = client
            .complete("other@example.com".to_string(), None, None, None)
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict { .. }));
        assert_eq!(client.email.as_deref(), Some("ana@example.com"));
    }
}
