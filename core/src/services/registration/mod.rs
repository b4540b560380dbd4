//! Staged client registration: create the identity record, then finalize it
//! once the phone number has been verified.

mod service;

pub use service::{RegistrationOutcome, RegistrationRequest, RegistrationService};
