use serde::{Deserialize, Serialize};

use super::attribute::Item;

/// Kind of row-level change carried by a record.
///
/// Only `Insert` and `Modify` are actionable. Any other name is kept
/// verbatim in `Other` so the record re-serializes unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventKind {
    Insert,
    Modify,
    Remove,
    Other(String),
}

impl EventKind {
    pub fn as_str(&self) -> &str {
        match self {
            EventKind::Insert => "INSERT",
            EventKind::Modify => "MODIFY",
            EventKind::Remove => "REMOVE",
            EventKind::Other(name) => name,
        }
    }
}

impl Default for EventKind {
    fn default() -> Self {
        EventKind::Other(String::new())
    }
}

impl From<String> for EventKind {
    fn from(name: String) -> Self {
        match name.as_str() {
            "INSERT" => EventKind::Insert,
            "MODIFY" => EventKind::Modify,
            "REMOVE" => EventKind::Remove,
            _ => EventKind::Other(name),
        }
    }
}

impl From<EventKind> for String {
    fn from(kind: EventKind) -> Self {
        match kind {
            EventKind::Other(name) => name,
            kind => kind.as_str().to_string(),
        }
    }
}

/// The change payload of a record: key attributes plus before and after
/// images.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StreamRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keys: Option<Item>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_image: Option<Item>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_image: Option<Item>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_view_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approximate_creation_date_time: Option<f64>,
}

/// One row-level change as delivered in a batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChangeRecord {
    #[serde(rename = "awsRegion", default)]
    pub aws_region: String,
    #[serde(rename = "dynamodb", default)]
    pub change: StreamRecord,
    #[serde(rename = "eventID", default)]
    pub event_id: String,
    #[serde(rename = "eventName", default)]
    pub event_kind: EventKind,
    #[serde(rename = "eventSource", default)]
    pub event_source: String,
    #[serde(rename = "eventSourceARN", default)]
    pub event_source_arn: String,
    #[serde(rename = "eventVersion", default)]
    pub event_version: String,
}

/// A batch of change records, in arrival order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Batch {
    #[serde(rename = "Records", default)]
    pub records: Vec<ChangeRecord>,
}

impl ChangeRecord {
    pub fn new_image(&self) -> Option<&Item> {
        self.change.new_image.as_ref()
    }

    pub fn old_image(&self) -> Option<&Item> {
        self.change.old_image.as_ref()
    }

    /// Table name embedded in the source ARN, i.e. the second
    /// `/`-separated segment of `arn:...:table/<name>/stream/<ts>`.
    pub fn table_name(&self) -> Option<&str> {
        self.event_source_arn.split('/').nth(1)
    }
}
