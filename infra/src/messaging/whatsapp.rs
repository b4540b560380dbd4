//! Chat-app gateway client
//!
//! The gateway session is stateful: it has to be connected before it can
//! deliver. The connection state lives behind a lock and the rest of the
//! system only ever sees the narrow `send`/`status` surface.

use std::time::Duration;

use serde::Deserialize;
use serde_json::json;
use tokio::sync::RwLock;
use uuid::Uuid;

use vt_shared::config::messaging::ChatGatewayConfig;
use vt_shared::utils::phone::mask_phone;

use crate::InfrastructureError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Connection state of the gateway session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayState {
    Disconnected,
    Connecting,
    Connected,
}

#[derive(Deserialize)]
struct StatusResponse {
    connected: bool,
}

#[derive(Deserialize)]
struct SendResponse {
    message_id: Option<String>,
}

/// Client for the chat-app message gateway
pub struct WhatsappGateway {
    client: reqwest::Client,
    config: ChatGatewayConfig,
    state: RwLock<GatewayState>,
}

impl WhatsappGateway {
    pub fn new(config: ChatGatewayConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            config,
            state: RwLock::new(GatewayState::Disconnected),
        }
    }

    /// Current session state
    pub async fn status(&self) -> GatewayState {
        *self.state.read().await
    }

    /// Probe the gateway and update the session state accordingly
    async fn connect(&self) -> Result<(), InfrastructureError> {
        if self.config.gateway_url.is_empty() {
            return Err(InfrastructureError::Config(
                "Chat gateway URL is not configured".to_string(),
            ));
        }

        {
            let mut state = self.state.write().await;
            if *state == GatewayState::Connected {
                return Ok(());
            }
            *state = GatewayState::Connecting;
        }

        let result = self
            .client
            .get(format!("{}/status", self.config.gateway_url))
            .bearer_auth(&self.config.access_token)
            .send()
            .await;

        let mut state = self.state.write().await;
        match result {
            Ok(response) if response.status().is_success() => {
                let connected = response
                    .json::<StatusResponse>()
                    .await
                    .map(|s| s.connected)
                    .unwrap_or(false);
                *state = if connected {
                    GatewayState::Connected
                } else {
                    GatewayState::Disconnected
                };
                if connected {
                    Ok(())
                } else {
                    Err(InfrastructureError::Messaging(
                        "Chat gateway session is not connected".to_string(),
                    ))
                }
            }
            Ok(response) => {
                *state = GatewayState::Disconnected;
                Err(InfrastructureError::Messaging(format!(
                    "Chat gateway status returned {}",
                    response.status()
                )))
            }
            Err(e) => {
                *state = GatewayState::Disconnected;
                Err(InfrastructureError::Http(e))
            }
        }
    }

    /// Deliver one message, connecting the session first when needed.
    /// Returns the gateway message id.
    pub async fn send(
        &self,
        destination: &str,
        message: &str,
    ) -> Result<String, InfrastructureError> {
        if self.status().await != GatewayState::Connected {
            self.connect().await?;
        }

        let body = json!({
            "to": destination,
            "message": message,
        });

        let response = self
            .client
            .post(format!("{}/send", self.config.gateway_url))
            .bearer_auth(&self.config.access_token)
            .json(&body)
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                // A transport failure invalidates the session
                *self.state.write().await = GatewayState::Disconnected;
                return Err(InfrastructureError::Http(e));
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            tracing::warn!(
                phone = %mask_phone(destination),
                status = %status,
                event = "chat_rejected",
                "Chat gateway rejected the message"
            );
            return Err(InfrastructureError::Messaging(format!(
                "Chat gateway returned {}",
                status
            )));
        }

        let message_id = response
            .json::<SendResponse>()
            .await
            .ok()
            .and_then(|r| r.message_id)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        tracing::info!(
            phone = %mask_phone(destination),
            message_id = %message_id,
            event = "chat_sent",
            "Message accepted by the chat gateway"
        );
        Ok(message_id)
    }
}
