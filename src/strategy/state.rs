use serde::Serialize;
use tracing::debug;

use super::detect_change;
use crate::error::DecodeError;
use crate::stream::{ChangeRecord, EventKind, Item};
use crate::traits::{MessageExtractor, TopicNamer};
use crate::Result;

/// Names topics `<table>-<state>` from a designated string attribute and
/// publishes only when that state actually transitions.
#[derive(Debug, Clone)]
pub struct StateTransition {
    attribute: String,
}

/// Reduced record view published by [`StateTransition`].
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct Transition<'a> {
    keys: Option<&'a Item>,
    new_image: Option<&'a Item>,
    old_image: Option<&'a Item>,
}

impl StateTransition {
    pub fn new(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
        }
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Reads the state value from an image.
    pub fn state<'a>(&self, image: Option<&'a Item>) -> std::result::Result<&'a str, DecodeError> {
        let value = image
            .and_then(|item| item.get(&self.attribute))
            .ok_or_else(|| DecodeError::StateNotFound {
                attribute: self.attribute.clone(),
            })?;

        value.as_str().ok_or_else(|| DecodeError::StateNotString {
            attribute: self.attribute.clone(),
        })
    }
}

impl Default for StateTransition {
    fn default() -> Self {
        Self::new("state")
    }
}

impl TopicNamer for StateTransition {
    fn topic_name(&self, record: &ChangeRecord) -> Result<Option<String>> {
        if !matches!(record.event_kind, EventKind::Insert | EventKind::Modify) {
            return Ok(None);
        }

        let table = record
            .table_name()
            .ok_or_else(|| DecodeError::InvalidArn {
                arn: record.event_source_arn.clone(),
            })?;

        match detect_change(record, |image| self.state(image))? {
            Some(state) => Ok(Some(format!("{}-{}", table, state))),
            None => {
                debug!(table = %table, attribute = %self.attribute, "state not changed");
                Ok(None)
            }
        }
    }
}

impl MessageExtractor for StateTransition {
    fn extract_message(&self, record: &ChangeRecord) -> Result<String> {
        let transition = Transition {
            keys: record.change.keys.as_ref(),
            new_image: record.new_image(),
            old_image: record.old_image(),
        };
        serde_json::to_string(&transition).map_err(Into::into)
    }
}
