//! Verification state machine for the OTP workflow
//!
//! Orchestrates a client's token lifecycle: request, verify, cancel and
//! expire, consulting the cooldown policy and attempt ledger before minting
//! codes and charging the ledger after each failed outcome.

mod config;
mod service;
mod traits;
mod types;

#[cfg(test)]
mod tests;

pub use config::VerificationConfig;
pub use service::VerificationService;
pub use traits::MessageSender;
pub use types::{CooldownStatus, RequestTokenResult, VerifiedToken};
