//! Local phone number helpers
//!
//! Numbers are handled as local 9-digit mobile numbers (no country prefix);
//! the carrier prefix is implied by the operator selection.

use once_cell::sync::Lazy;
use regex::Regex;

static LOCAL_PHONE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{9}$").unwrap());

/// Check that a phone number is exactly 9 digits, nothing else
pub fn is_valid_local_phone(phone: &str) -> bool {
    LOCAL_PHONE.is_match(phone)
}

/// Mask a phone number for logging, keeping only the last two characters.
/// Counts characters, not bytes, so arbitrary input cannot split a
/// multi-byte character.
pub fn mask_phone(phone: &str) -> String {
    let total = phone.chars().count();
    if total <= 2 {
        return "*".repeat(total);
    }
    let visible: String = phone.chars().skip(total - 2).collect();
    format!("{}{}", "*".repeat(total - 2), visible)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_nine_digits() {
        assert!(is_valid_local_phone("987654321"));
    }

    #[test]
    fn rejects_prefixes_letters_and_wrong_lengths() {
        assert!(!is_valid_local_phone("+51987654321"));
        assert!(!is_valid_local_phone("98765432"));
        assert!(!is_valid_local_phone("9876543210"));
        assert!(!is_valid_local_phone("98765432a"));
        assert!(!is_valid_local_phone("987 654 321"));
    }

    #[test]
    fn masks_all_but_last_two() {
        assert_eq!(mask_phone("987654321"), "*******21");
        assert_eq!(mask_phone("9"), "*");
    }

    #[test]
    fn masking_counts_characters_not_bytes() {
        assert_eq!(mask_phone("9876543ñé"), "*******ñé");
        assert_eq!(mask_phone("ñé"), "**");
    }
}
