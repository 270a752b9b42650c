use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use super::{OutboundRequest, WebhookSink};
use crate::error::DeliveryError;

/// Logs requests instead of sending them. Keeps only a counter.
#[derive(Debug, Default)]
pub struct DryRunSink {
    seen: AtomicU64,
}

impl DryRunSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seen(&self) -> u64 {
        self.seen.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl WebhookSink for DryRunSink {
    async fn post(&self, request: &OutboundRequest) -> Result<(), DeliveryError> {
        self.seen.fetch_add(1, Ordering::Relaxed);
        // the URL carries the webhook token, so only the body is logged
        tracing::info!(
            target: "rowhook::webhook",
            content_type = request.content_type,
            body = request.body_str().unwrap_or("<binary>"),
            "dry run: notification not sent"
        );
        Ok(())
    }
}
