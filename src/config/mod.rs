pub mod global;
pub mod http;

pub use global::{init_tracing, NotifierConfig, DEFAULT_TABLE_NAME};
pub use http::ServerConfig;

/// Return the first non-blank value among `keys`.
pub(crate) fn first_set<F>(lookup: &F, keys: &[&str]) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    keys.iter()
        .filter_map(|k| lookup(*k))
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}

pub(crate) fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
