//! Input validation rules for the registration flow
//!
//! Document rules: DNI is 8 digits, RUC is 11, CDE (foreigner card) is 9,
//! all digits-only. The check digit is a short numeric string. Email
//! validation is syntactic only.

use once_cell::sync::Lazy;
use regex::Regex;

static DIGITS_ONLY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").unwrap());
static EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Expected document number length for a document type code
/// (`DNI` = 8, `RUC` = 11, `CDE` = 9)
pub fn document_length_for(type_code: &str) -> Option<usize> {
    match type_code {
        "DNI" => Some(8),
        "RUC" => Some(11),
        "CDE" => Some(9),
        _ => None,
    }
}

/// Check that a document number is digits-only and has the exact length
/// required by its type
pub fn is_valid_document(type_code: &str, number: &str) -> bool {
    match document_length_for(type_code) {
        Some(len) => number.len() == len && DIGITS_ONLY.is_match(number),
        None => false,
    }
}

/// Check digit: one or two numeric characters
pub fn is_valid_check_digit(digit: &str) -> bool {
    !digit.is_empty() && digit.len() <= 2 && DIGITS_ONLY.is_match(digit)
}

/// Syntactic email check
pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

/// Non-empty after trimming
pub fn is_present(value: &str) -> bool {
    !value.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lengths_are_enforced() {
        assert!(is_valid_document("DNI", "12345678"));
        assert!(!is_valid_document("DNI", "1234567"));
        assert!(is_valid_document("RUC", "12345678901"));
        assert!(is_valid_document("CDE", "123456789"));
        assert!(!is_valid_document("CDE", "12345678"));
        assert!(!is_valid_document("PAS", "12345678"));
    }

    #[test]
    fn documents_must_be_numeric() {
        assert!(!is_valid_document("DNI", "1234567a"));
        assert!(!is_valid_document("RUC", "1234567890x"));
    }

    #[test]
    fn check_digit_is_numeric() {
        assert!(is_valid_check_digit("7"));
        assert!(is_valid_check_digit("12"));
        assert!(!is_valid_check_digit("a"));
        assert!(!is_valid_check_digit(""));
        assert!(!is_valid_check_digit("123"));
    }

    #[test]
    fn email_is_syntactically_checked() {
        assert!(is_valid_email("ana@example.com"));
        assert!(!is_valid_email("ana@example"));
        assert!(!is_valid_email("ana example.com"));
        assert!(!is_valid_email("@example.com"));
    }
}
