//! Mock messenger for development and tests
//!
//! Logs every message instead of delivering it, counts deliveries, and can
//! simulate provider failures.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use uuid::Uuid;

use vt_core::domain::entities::verification_token::Channel;
use vt_core::services::verification::MessageSender;
use vt_shared::utils::phone::mask_phone;

/// In-process messenger that never talks to a real provider
#[derive(Default)]
pub struct MockMessenger {
    message_count: AtomicU64,
    simulate_failure: AtomicBool,
}

impl MockMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total messages "delivered" so far
    pub fn message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }

    /// Make every subsequent send fail (or succeed again)
    pub fn set_simulate_failure(&self, simulate: bool) {
        self.simulate_failure.store(simulate, Ordering::SeqCst);
    }
}

#[async_trait]
impl MessageSender for MockMessenger {
    async fn send(
        &self,
        channel: Channel,
        destination: &str,
        message: &str,
    ) -> Result<String, String> {
        if self.simulate_failure.load(Ordering::SeqCst) {
            tracing::warn!(
                phone = %mask_phone(destination),
                channel = channel.as_code(),
                event = "mock_delivery_failed",
                "Mock messenger simulating a provider failure"
            );
            return Err("simulated provider failure".to_string());
        }

        self.message_count.fetch_add(1, Ordering::SeqCst);
        tracing::info!(
            phone = %mask_phone(destination),
            channel = channel.as_code(),
            event = "mock_delivery",
            "Mock delivery: {}",
            message
        );
        Ok(Uuid::new_v4().to_string())
    }
}
