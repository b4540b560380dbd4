//! One-time code generation and hashing.
//!
//! Codes are short, human-enterable strings drawn uniformly from an alphabet
//! that excludes visually confusable characters: no `0`/`O`, no `1`/`I`,
//! ASCII only. The digest side uses a password-grade hash with a work factor
//! tuned so verification stays well under 100ms.

use rand::rngs::OsRng;
use rand::Rng;

use crate::errors::{DomainError, DomainResult};

/// Code alphabet: uppercase ASCII letters and digits minus `0`, `O`, `1`, `I`
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Default code length
pub const DEFAULT_CODE_LENGTH: usize = 4;

/// bcrypt work factor; verification of a 4-char code completes in a few
/// milliseconds at this cost
pub const HASH_COST: u32 = 8;

/// Generate a random code of `length` characters from [`CODE_ALPHABET`]
/// using the OS CSPRNG.
pub fn generate(length: usize) -> String {
    let mut rng = OsRng;
    (0..length)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// Compute the one-way digest of a code
pub fn hash(code: &str) -> DomainResult<String> {
    bcrypt::hash(code, HASH_COST).map_err(|e| DomainError::Internal {
        message: format!("Failed to hash verification code: {}", e),
    })
}

/// Check a submitted code against a stored digest. The comparison happens
/// inside the hash primitive, so timing does not leak the match position.
pub fn verify(code: &str, digest: &str) -> DomainResult<bool> {
    bcrypt::verify(code, digest).map_err(|e| DomainError::Internal {
        message: format!("Failed to verify code digest: {}", e),
    })
}
