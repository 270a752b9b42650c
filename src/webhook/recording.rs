use async_trait::async_trait;
use parking_lot::Mutex;

use super::{OutboundRequest, WebhookSink};
use crate::error::DeliveryError;

/// Keeps every request it is given; test-only.
#[derive(Debug, Default)]
pub struct RecordingSink {
    sent: Mutex<Vec<OutboundRequest>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> Vec<OutboundRequest> {
        self.sent.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.sent.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sent.lock().is_empty()
    }
}

#[async_trait]
impl WebhookSink for RecordingSink {
    async fn post(&self, request: &OutboundRequest) -> Result<(), DeliveryError> {
        self.sent.lock().push(request.clone());
        Ok(())
    }
}
