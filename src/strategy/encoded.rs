use tracing::debug;

use super::detect_change;
use crate::error::DecodeError;
use crate::stream::{AttributeValue, ChangeRecord, Item};
use crate::traits::{MessageExtractor, TopicNamer};
use crate::Result;

/// Format tag leading every encoded value.
pub const VERSION: &str = "1";

const SEPARATOR: char = ',';

/// Names topics from a single self-describing attribute holding
/// `<version>,<topic>,<message>`.
///
/// The message is everything after the second comma and may contain
/// commas of its own.
#[derive(Debug, Clone)]
pub struct EncodedAttribute {
    attribute: String,
}

impl EncodedAttribute {
    pub fn new(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
        }
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }
}

impl Default for EncodedAttribute {
    fn default() -> Self {
        Self::new("event")
    }
}

impl TopicNamer for EncodedAttribute {
    fn topic_name(&self, record: &ChangeRecord) -> Result<Option<String>> {
        let decoded = detect_change(record, |image| decode(image, &self.attribute))?;
        if decoded.is_none() {
            debug!(attribute = %self.attribute, "encoded value unchanged");
        }
        Ok(decoded.map(|(topic, _)| topic.to_string()))
    }
}

impl MessageExtractor for EncodedAttribute {
    fn extract_message(&self, record: &ChangeRecord) -> Result<String> {
        let (_, message) = decode(record.new_image(), &self.attribute)?;
        Ok(message.to_string())
    }
}

/// Encodes a topic and message into the attribute value the strategy reads.
///
/// Fails with [`DecodeError::InvalidEncoding`] when the topic is empty or
/// contains the delimiter, since such a value could not be decoded back.
pub fn encode(topic: &str, message: &str) -> std::result::Result<AttributeValue, DecodeError> {
    if topic.is_empty() || topic.contains(SEPARATOR) {
        return Err(DecodeError::InvalidEncoding);
    }

    Ok(AttributeValue::String(format!(
        "{VERSION}{SEPARATOR}{topic}{SEPARATOR}{message}"
    )))
}

/// Decodes `(topic, message)` from `attribute` of `image`.
pub fn decode<'a>(
    image: Option<&'a Item>,
    attribute: &str,
) -> std::result::Result<(&'a str, &'a str), DecodeError> {
    let image = image.ok_or(DecodeError::NilItem)?;

    let value = image.get(attribute).ok_or_else(|| DecodeError::EmptyKey {
        key: attribute.to_string(),
    })?;

    let raw = value.as_str().ok_or_else(|| DecodeError::EmptyValue {
        key: attribute.to_string(),
    })?;

    let body = raw
        .strip_prefix(VERSION)
        .and_then(|rest| rest.strip_prefix(SEPARATOR))
        .ok_or(DecodeError::InvalidEncoding)?;

    match body.split_once(SEPARATOR) {
        Some((topic, message)) if !topic.is_empty() => Ok((topic, message)),
        _ => Err(DecodeError::InvalidEncoding),
    }
}
