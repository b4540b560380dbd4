//! Route handlers grouped by resource

pub mod client;

pub use client::AppState;
