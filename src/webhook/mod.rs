use async_trait::async_trait;

use crate::error::DeliveryError;

pub mod discord;
pub mod dry_run;
#[cfg(test)]
pub(crate) mod recording;

pub use discord::DiscordWebhook;
pub use dry_run::DryRunSink;
#[cfg(test)]
pub(crate) use recording::RecordingSink;

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// One POST as the notifier wants it sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    pub url: String,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl OutboundRequest {
    pub fn json(url: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            url: url.into(),
            content_type: JSON_CONTENT_TYPE,
            body,
        }
    }

    pub fn body_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }
}

/// HTTP-capable context handed to the notifier on every invocation.
#[async_trait]
pub trait WebhookSink: Send + Sync {
    async fn post(&self, request: &OutboundRequest) -> Result<(), DeliveryError>;
}
