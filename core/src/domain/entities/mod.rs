//! Domain entities representing core business objects.

pub mod attempt_record;
pub mod client;
pub mod verification_token;

// Re-export commonly used types
pub use attempt_record::AttemptRecord;
pub use client::{Client, DocumentType, Operator};
pub use verification_token::{Channel, TokenStatus, VerificationToken, DEFAULT_TOKEN_TTL_SECONDS};
