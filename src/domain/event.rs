use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::NotifyError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperationType {
    Insert,
    Update,
    Delete,
    #[serde(other)]
    Other,
}

/// One row-insertion notification as delivered by the database webhook.
///
/// Shaped as `{ "table": ..., "record": { "email": ..., ... }, "operationType": "INSERT" }`.
/// Database webhooks that send the operation under `type` are accepted too;
/// `operationType` wins when both keys are present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawInsertEvent")]
pub struct InsertEvent {
    pub table: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    pub record: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_record: Option<Value>,

    #[serde(rename = "operationType")]
    pub operation_type: OperationType,
}

#[derive(Deserialize)]
struct RawInsertEvent {
    table: String,
    #[serde(default)]
    schema: Option<String>,
    record: Map<String, Value>,
    #[serde(default)]
    old_record: Option<Value>,
    #[serde(default, rename = "operationType")]
    operation_type: Option<OperationType>,
    #[serde(default, rename = "type")]
    kind: Option<OperationType>,
}

impl TryFrom<RawInsertEvent> for InsertEvent {
    type Error = String;

    fn try_from(raw: RawInsertEvent) -> Result<Self, Self::Error> {
        let operation_type = raw
            .operation_type
            .or(raw.kind)
            .ok_or_else(|| "missing field `operationType`".to_string())?;
        Ok(Self {
            table: raw.table,
            schema: raw.schema,
            record: raw.record,
            old_record: raw.old_record,
            operation_type,
        })
    }
}

impl InsertEvent {
    pub fn new(table: impl Into<String>, record: Map<String, Value>) -> Self {
        Self {
            table: table.into(),
            schema: None,
            record,
            old_record: None,
            operation_type: OperationType::Insert,
        }
    }

    /// `record.email`, rejected when missing, null, or not a string.
    pub fn email(&self) -> Result<&str, NotifyError> {
        match self.record.get("email") {
            Some(Value::String(email)) => Ok(email),
            None | Some(Value::Null) => Err(NotifyError::InvalidEvent(
                "record.email is missing".to_string(),
            )),
            Some(other) => Err(NotifyError::InvalidEvent(format!(
                "record.email must be a string, got {other}"
            ))),
        }
    }

    pub fn validate(&self) -> Result<(), NotifyError> {
        if self.table.trim().is_empty() {
            return Err(NotifyError::InvalidEvent("table is empty".to_string()));
        }
        self.email().map(|_| ())
    }
}
