//! Request and response DTOs for the HTTP surface

pub mod client;

pub use client::{
    FinalizeRequest, FinalizedResponse, RegisterRequest, RegisteredResponse, TokenRequest,
    VerifiedResponse,
};
