use std::time::Instant;

use super::event::InsertEvent;
use super::message::NotificationMessage;
use crate::config::NotifierConfig;
use crate::error::{DeliveryError, NotifyError};
use crate::observability::prom;
use crate::webhook::{OutboundRequest, WebhookSink};

/// Turns one insert event into one chat notification.
///
/// Stateless apart from the configuration it was built with, so a single
/// instance is shared by every concurrent invocation. Nothing is retried or
/// deduplicated: each call to [`Notifier::handle`] issues at most one POST.
#[derive(Debug, Clone)]
pub struct Notifier {
    cfg: NotifierConfig,
}

impl Notifier {
    pub fn new(cfg: NotifierConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &NotifierConfig {
        &self.cfg
    }

    pub async fn handle(
        &self,
        event: &InsertEvent,
        sink: &dyn WebhookSink,
    ) -> Result<NotificationMessage, NotifyError> {
        let out = self.dispatch(event, sink).await;

        match &out {
            Ok(message) => {
                prom::observe_notification("sent");
                tracing::info!(
                    target: "rowhook::notifier",
                    table = %event.table,
                    title = message.title().unwrap_or_default(),
                    "notification sent"
                );
            }
            Err(e) => {
                prom::observe_notification(e.kind());
                tracing::error!(
                    target: "rowhook::notifier",
                    table = %event.table,
                    error = %e,
                    "notification failed"
                );
            }
        }

        out
    }

    async fn dispatch(
        &self,
        event: &InsertEvent,
        sink: &dyn WebhookSink,
    ) -> Result<NotificationMessage, NotifyError> {
        // checked before anything else: no URL, no network call
        let url = self.cfg.webhook_url().ok_or(NotifyError::Configuration)?;

        let message = NotificationMessage::for_insert(event)?;
        let body = message.to_json().map_err(DeliveryError::from)?;
        let request = OutboundRequest::json(url, body);

        let start = Instant::now();
        let posted = sink.post(&request).await;
        prom::observe_webhook_post(
            if posted.is_ok() { "ok" } else { "error" },
            start.elapsed().as_secs_f64(),
        );
        posted?;

        Ok(message)
    }
}
