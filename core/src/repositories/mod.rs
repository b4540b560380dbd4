//! Repository traits defining the persistence boundary of the domain layer,
//! plus in-memory mock implementations for tests.

pub mod attempt;
pub mod client;
pub mod token;

pub use attempt::AttemptRepository;
pub use client::ClientRepository;
pub use token::TokenRepository;

pub use attempt::MockAttemptRepository;
pub use client::MockClientRepository;
pub use token::MockTokenRepository;
