//! Outbound messaging: one provider per delivery channel behind the core
//! [`MessageSender`] capability.

pub mod mock;
pub mod sms;
pub mod whatsapp;

pub use mock::MockMessenger;
pub use sms::SmsProvider;
pub use whatsapp::{GatewayState, WhatsappGateway};

use async_trait::async_trait;

use vt_core::domain::entities::verification_token::Channel;
use vt_core::services::verification::MessageSender;
use vt_shared::config::messaging::MessagingConfig;

/// Routes each delivery channel to its provider
pub struct MessageDispatcher {
    sms: SmsProvider,
    whatsapp: WhatsappGateway,
}

impl MessageDispatcher {
    pub fn new(config: MessagingConfig) -> Self {
        Self {
            sms: SmsProvider::new(config.sms),
            whatsapp: WhatsappGateway::new(config.chat),
        }
    }
}

#[async_trait]
impl MessageSender for MessageDispatcher {
    async fn send(
        &self,
        channel: Channel,
        destination: &str,
        message: &str,
    ) -> Result<String, String> {
        let result = match channel {
            Channel::Sms => self.sms.send(destination, message).await,
            Channel::Whatsapp => self.whatsapp.send(destination, message).await,
        };
        result.map_err(|e| e.to_string())
    }
}
