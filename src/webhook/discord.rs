use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client, RequestBuilder};

use super::{OutboundRequest, WebhookSink};
use crate::config::NotifierConfig;
use crate::error::DeliveryError;

/// Posts to a Discord-compatible incoming webhook over reqwest.
#[derive(Debug, Clone)]
pub struct DiscordWebhook {
    client: Client,
}

impl Default for DiscordWebhook {
    fn default() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl DiscordWebhook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    pub fn from_config(cfg: &NotifierConfig) -> Result<Self, reqwest::Error> {
        Self::with_timeout(cfg.request_timeout)
    }

    pub fn request(&self, request: &OutboundRequest) -> RequestBuilder {
        self.client
            .post(request.url.as_str())
            .header(CONTENT_TYPE, request.content_type)
            .body(request.body.clone())
    }
}

#[async_trait]
impl WebhookSink for DiscordWebhook {
    async fn post(&self, request: &OutboundRequest) -> Result<(), DeliveryError> {
        let response = self
            .request(request)
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(e.without_url()))?;
        let status = response.status();

        if status.is_success() {
            tracing::debug!(
                target: "rowhook::webhook",
                status = status.as_u16(),
                "webhook accepted notification"
            );
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!(
            target: "rowhook::webhook",
            status = status.as_u16(),
            body = %body,
            "webhook rejected notification"
        );
        Err(DeliveryError::Status {
            status: status.as_u16(),
            body,
        })
    }
}
