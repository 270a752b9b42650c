use super::{first_set, parse_flag};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Address the event receiver listens on (`BIND_ADDR`)
    pub bind_addr: String,
    /// Add `x-rowhook-elapsed-ms` to every response (`RESPONSE_HEADERS`)
    pub add_response_headers: bool,
    /// Log each request at DEBUG level
    pub log_requests: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            add_response_headers: true,
            log_requests: true,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            bind_addr: first_set(&lookup, &["BIND_ADDR"]).unwrap_or(defaults.bind_addr),
            add_response_headers: first_set(&lookup, &["RESPONSE_HEADERS"])
                .and_then(|raw| parse_flag(&raw))
                .unwrap_or(defaults.add_response_headers),
            log_requests: defaults.log_requests,
        }
    }
}
