pub mod http;
pub mod receiver;

pub use http::RequestMetrics;
pub use receiver::{app_state, configure, AppState};
