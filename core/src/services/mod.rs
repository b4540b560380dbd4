//! Business services containing domain logic and use cases.

pub mod cooldown;
pub mod registration;
pub mod token;
pub mod verification;

// Re-export commonly used types
pub use cooldown::CooldownPolicy;
pub use registration::{RegistrationOutcome, RegistrationService};
pub use verification::{
    CooldownStatus, MessageSender, RequestTokenResult, VerificationConfig, VerificationService,
    VerifiedToken,
};
