//! HTTP SMS provider
//!
//! Talks to a generic JSON SMS gateway: one POST per message, bearer-token
//! auth, the provider's message id comes back in the response body.

use std::time::Duration;

use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use vt_shared::config::messaging::SmsProviderConfig;
use vt_shared::utils::phone::mask_phone;

use crate::InfrastructureError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Deserialize)]
struct ProviderResponse {
    message_id: Option<String>,
}

/// SMS delivery over the configured HTTP gateway
pub struct SmsProvider {
    client: reqwest::Client,
    config: SmsProviderConfig,
}

impl SmsProvider {
    pub fn new(config: SmsProviderConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self { client, config }
    }

    /// Deliver one message. Returns the provider message id.
    pub async fn send(
        &self,
        destination: &str,
        message: &str,
    ) -> Result<String, InfrastructureError> {
        if self.config.api_url.is_empty() {
            return Err(InfrastructureError::Config(
                "SMS provider URL is not configured".to_string(),
            ));
        }

        let body = json!({
            "to": destination,
            "message": message,
            "sender_id": self.config.sender_id,
        });

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(InfrastructureError::Http)?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::warn!(
                phone = %mask_phone(destination),
                status = %status,
                event = "sms_rejected",
                "SMS gateway rejected the message"
            );
            return Err(InfrastructureError::Messaging(format!(
                "SMS gateway returned {}",
                status
            )));
        }

        let message_id = response
            .json::<ProviderResponse>()
            .await
            .ok()
            .and_then(|r| r.message_id)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        tracing::info!(
            phone = %mask_phone(destination),
            message_id = %message_id,
            event = "sms_sent",
            "SMS accepted by the gateway"
        );
        Ok(message_id)
    }
}
