use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

/// Failure of a single outbound POST to the chat webhook.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Carries no URL: the webhook URL embeds its secret token.
    #[error("webhook request failed: {0}")]
    Transport(reqwest::Error),

    #[error("webhook responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not encode notification: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum NotifyError {
    /// Destination URL missing. Aborts the invocation before any network call.
    #[error("destination URL not set")]
    Configuration,

    #[error("invalid insert event: {0}")]
    InvalidEvent(String),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

impl NotifyError {
    pub fn kind(&self) -> &'static str {
        match self {
            NotifyError::Configuration => "configuration",
            NotifyError::InvalidEvent(_) => "invalid_event",
            NotifyError::Delivery(_) => "delivery",
        }
    }
}

impl ResponseError for NotifyError {
    fn status_code(&self) -> StatusCode {
        match self {
            NotifyError::Configuration => StatusCode::INTERNAL_SERVER_ERROR,
            NotifyError::InvalidEvent(_) => StatusCode::UNPROCESSABLE_ENTITY,
            NotifyError::Delivery(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "status": "failed",
            "error": self.kind(),
            "message": self.to_string(),
        }))
    }
}
