pub mod event;
pub mod message;
pub mod notifier;
pub mod trigger;

pub use event::{InsertEvent, OperationType};
pub use message::{Embed, NotificationMessage, ACCENT_COLOR};
pub use notifier::Notifier;
pub use trigger::{SkipReason, TriggerFilter, TriggerSpec};
