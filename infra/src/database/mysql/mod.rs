//! MySQL repository implementations backed by SQLx

pub mod attempt_repository_impl;
pub mod client_repository_impl;
pub mod token_repository_impl;

pub use attempt_repository_impl::MySqlAttemptRepository;
pub use client_repository_impl::MySqlClientRepository;
pub use token_repository_impl::MySqlTokenRepository;
