use serde::{Deserialize, Serialize};

use super::event::InsertEvent;
use crate::error::NotifyError;

/// Embed accent color (Discord blurple).
pub const ACCENT_COLOR: u32 = 0x7289da;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    pub color: u32,
    pub title: String,
}

/// Outbound chat-webhook body: always exactly one embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationMessage {
    pub embeds: Vec<Embed>,
}

pub fn insert_title(table: &str, email: &str) -> String {
    format!("New row created in {table}: {email}")
}

impl NotificationMessage {
    pub fn for_insert(event: &InsertEvent) -> Result<Self, NotifyError> {
        event.validate()?;
        let email = event.email()?;
        Ok(Self {
            embeds: vec![Embed {
                color: ACCENT_COLOR,
                title: insert_title(&event.table, email),
            }],
        })
    }

    pub fn title(&self) -> Option<&str> {
        self.embeds.first().map(|e| e.title.as_str())
    }

    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}
