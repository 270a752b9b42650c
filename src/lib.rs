pub mod config;
pub mod domain;
pub mod error;
pub mod observability;
pub mod services;
pub mod webhook;

pub use config::{init_tracing, NotifierConfig, ServerConfig};
pub use domain::{InsertEvent, NotificationMessage, Notifier, OperationType, ACCENT_COLOR};
pub use error::{DeliveryError, NotifyError};
pub use services::{app_state, configure, RequestMetrics};
pub use webhook::{DiscordWebhook, DryRunSink, OutboundRequest, WebhookSink};
