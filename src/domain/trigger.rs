use std::fmt;

use serde::Serialize;

use super::event::{InsertEvent, OperationType};

pub const TRIGGER_ID: &str = "supabase-to-discord";
pub const TRIGGER_NAME: &str = "Supabase to Discord";
pub const TRIGGER_SERVICE: &str = "supabase";
pub const TRIGGER_EVENT_NAME: &str = "row.inserted";

/// Which events reach the notifier. Applied by the receiver, never by the notifier itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriggerFilter {
    #[serde(rename = "type")]
    pub operation_types: Vec<OperationType>,
    #[serde(rename = "table")]
    pub tables: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Operation(OperationType),
    Table(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Operation(op) => write!(f, "operation {op:?} is not watched"),
            SkipReason::Table(table) => write!(f, "table `{table}` is not watched"),
        }
    }
}

impl TriggerFilter {
    /// INSERT on `table` only.
    pub fn inserts_on(table: impl Into<String>) -> Self {
        Self {
            operation_types: vec![OperationType::Insert],
            tables: vec![table.into()],
        }
    }

    pub fn check(&self, event: &InsertEvent) -> Result<(), SkipReason> {
        if !self.operation_types.contains(&event.operation_type) {
            return Err(SkipReason::Operation(event.operation_type));
        }
        if !self.tables.iter().any(|t| t == &event.table) {
            return Err(SkipReason::Table(event.table.clone()));
        }
        Ok(())
    }
}

/// Registration descriptor for the receiver, reported on `/health`.
#[derive(Debug, Clone, Serialize)]
pub struct TriggerSpec {
    pub id: &'static str,
    pub name: &'static str,
    pub service: &'static str,
    #[serde(rename = "eventName")]
    pub event_name: &'static str,
    pub filter: TriggerFilter,
}

impl TriggerSpec {
    pub fn for_table(table: impl Into<String>) -> Self {
        Self {
            id: TRIGGER_ID,
            name: TRIGGER_NAME,
            service: TRIGGER_SERVICE,
            event_name: TRIGGER_EVENT_NAME,
            filter: TriggerFilter::inserts_on(table),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    fn event(table: &str, op: OperationType) -> InsertEvent {
        let mut event = InsertEvent::new(table, Map::new());
        event.operation_type = op;
        event
    }

    #[test]
    fn accepts_insert_on_watched_table() {
        let filter = TriggerFilter::inserts_on("users");
        assert_eq!(filter.check(&event("users", OperationType::Insert)), Ok(()));
    }

    #[test]
    fn skips_other_operations() {
        let filter = TriggerFilter::inserts_on("users");
        for op in [OperationType::Update, OperationType::Delete, OperationType::Other] {
            assert_eq!(
                filter.check(&event("users", op)),
                Err(SkipReason::Operation(op))
            );
        }
    }

    #[test]
    fn skips_other_tables() {
        let filter = TriggerFilter::inserts_on("users");
        let reason = filter.check(&event("orders", OperationType::Insert)).unwrap_err();
        assert_eq!(reason, SkipReason::Table("orders".into()));
        assert_eq!(reason.to_string(), "table `orders` is not watched");
    }

    #[test]
    fn descriptor_serializes_filter() {
        let spec = TriggerSpec::for_table("users");
        assert_eq!(
            serde_json::to_value(&spec).unwrap(),
            json!({
                "id": "supabase-to-discord",
                "name": "Supabase to Discord",
                "service": "supabase",
                "eventName": "row.inserted",
                "filter": { "type": ["INSERT"], "table": ["users"] }
            })
        );
    }
}
