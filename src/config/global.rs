use std::time::Duration;

use super::{first_set, parse_flag};

pub const DEFAULT_TABLE_NAME: &str = "users";

// -------------------------------------------------------
// Notifier Config
// -------------------------------------------------------
/// Read once at startup and handed to the notifier; never mutated afterwards.
#[derive(Clone, Debug)]
pub struct NotifierConfig {
    /// Table whose inserts are forwarded (`TABLE_NAME`)
    pub table_name: String,

    /// Chat webhook destination (`WEBHOOK_URL`). Absence fails every invocation.
    pub webhook_url: Option<String>,

    /// Outbound request timeout (`WEBHOOK_TIMEOUT_SECS`), client default when unset
    pub request_timeout: Option<Duration>,

    /// Log outbound requests instead of sending them (`DRY_RUN`)
    pub dry_run: bool,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            table_name: DEFAULT_TABLE_NAME.to_string(),
            webhook_url: None,
            request_timeout: None,
            dry_run: false,
        }
    }
}

impl NotifierConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let table_name = first_set(&lookup, &["TABLE_NAME", "SUPABASE_TABLE"])
            .unwrap_or(defaults.table_name);

        let webhook_url = first_set(&lookup, &["WEBHOOK_URL", "DISCORD_WEBHOOK_URL"]);

        let request_timeout = first_set(&lookup, &["WEBHOOK_TIMEOUT_SECS"]).and_then(|raw| {
            match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
                _ => {
                    tracing::warn!(
                        target: "rowhook::config",
                        value = %raw,
                        "ignoring invalid WEBHOOK_TIMEOUT_SECS"
                    );
                    None
                }
            }
        });

        let dry_run = first_set(&lookup, &["DRY_RUN"])
            .and_then(|raw| parse_flag(&raw))
            .unwrap_or(defaults.dry_run);

        Self {
            table_name,
            webhook_url,
            request_timeout,
            dry_run,
        }
    }

    pub fn with_webhook_url(mut self, url: impl Into<String>) -> Self {
        self.webhook_url = Some(url.into());
        self
    }

    pub fn with_table_name(mut self, table: impl Into<String>) -> Self {
        self.table_name = table.into();
        self
    }

    /// Configured destination, treating a blank value as unset.
    pub fn webhook_url(&self) -> Option<&str> {
        self.webhook_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

// -------------------------------------------------------
// TRACING SETUP
// -------------------------------------------------------
pub fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    // RUST_LOG wins; otherwise rowhook + actix at info
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("rowhook=info,actix_web=info"));

    let fmt_layer = fmt::layer().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
