//! Capability trait for outbound message delivery

use async_trait::async_trait;

use crate::domain::entities::verification_token::Channel;

/// Outbound messaging capability, one route per delivery channel.
///
/// Implementations are fallible and potentially slow; callers must never
/// hold an in-process lock across a send.
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Deliver `message` to `destination` (local 9-digit number) over
    /// `channel`. Returns a provider message id on success.
    async fn send(
        &self,
        channel: Channel,
        destination: &str,
        message: &str,
    ) -> Result<String, String>;
}
