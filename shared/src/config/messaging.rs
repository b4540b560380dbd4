//! Outbound messaging provider configuration

use serde::{Deserialize, Serialize};

/// SMS provider settings (HTTP gateway)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SmsProviderConfig {
    /// Provider API endpoint
    pub api_url: String,
    /// API key for the provider
    pub api_key: String,
    /// Sender identifier shown to the recipient
    pub sender_id: String,
}

/// Chat-app gateway settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ChatGatewayConfig {
    /// Gateway endpoint
    pub gateway_url: String,
    /// Gateway access token
    pub access_token: String,
}

/// Messaging provider configuration for both delivery channels
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MessagingConfig {
    /// SMS channel provider
    pub sms: SmsProviderConfig,
    /// Chat-app channel gateway
    pub chat: ChatGatewayConfig,
}

impl MessagingConfig {
    /// Load from `SMS_API_URL` / `SMS_API_KEY` / `SMS_SENDER_ID` and
    /// `CHAT_GATEWAY_URL` / `CHAT_ACCESS_TOKEN`
    pub fn from_env() -> Self {
        Self {
            sms: SmsProviderConfig {
                api_url: std::env::var("SMS_API_URL").unwrap_or_default(),
                api_key: std::env::var("SMS_API_KEY").unwrap_or_default(),
                sender_id: std::env::var("SMS_SENDER_ID").unwrap_or_else(|_| "VERITEL".to_string()),
            },
            chat: ChatGatewayConfig {
                gateway_url: std::env::var("CHAT_GATEWAY_URL").unwrap_or_default(),
                access_token: std::env::var("CHAT_ACCESS_TOKEN").unwrap_or_default(),
            },
        }
    }
}
