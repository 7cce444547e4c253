//! The four roles the dispatcher is composed from.
//!
//! A naming strategy is a value implementing one or more of these roles;
//! [`TopicNamer`] and [`MessageExtractor`] are also implemented for plain
//! closures so small policies need no type of their own.

use async_trait::async_trait;
use std::fmt;

use crate::stream::ChangeRecord;
use crate::Result;

/// Durable identifier of a topic, as returned by resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TopicArn(String);

impl TopicArn {
    pub fn new(arn: impl Into<String>) -> Self {
        Self(arn.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TopicArn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Decides whether and where a record is published.
///
/// `Ok(None)` means there is nothing to publish for this record.
pub trait TopicNamer: Send + Sync {
    fn topic_name(&self, record: &ChangeRecord) -> Result<Option<String>>;
}

/// Produces the message body published for a record.
pub trait MessageExtractor: Send + Sync {
    fn extract_message(&self, record: &ChangeRecord) -> Result<String>;
}

/// Resolves a topic name to its ARN, creating the topic when absent.
///
/// Implementations must be safe to call repeatedly for the same name.
#[async_trait]
pub trait TopicArnFinder: Send + Sync {
    async fn find_topic_arn(&self, topic_name: &str) -> Result<TopicArn>;
}

/// Sends a message to a resolved topic.
///
/// A missing topic must be reported as [`crate::Error::TopicNotFound`].
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, topic_arn: &TopicArn, message: &str) -> Result<()>;
}

impl<F> TopicNamer for F
where
    F: Fn(&ChangeRecord) -> Result<Option<String>> + Send + Sync,
{
    fn topic_name(&self, record: &ChangeRecord) -> Result<Option<String>> {
        self(record)
    }
}

impl<F> MessageExtractor for F
where
    F: Fn(&ChangeRecord) -> Result<String> + Send + Sync,
{
    fn extract_message(&self, record: &ChangeRecord) -> Result<String> {
        self(record)
    }
}

/// Default namer: never publishes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTopic;

impl TopicNamer for NoTopic {
    fn topic_name(&self, _record: &ChangeRecord) -> Result<Option<String>> {
        Ok(None)
    }
}

/// Default extractor: the whole record as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRecord;

impl MessageExtractor for JsonRecord {
    fn extract_message(&self, record: &ChangeRecord) -> Result<String> {
        serde_json::to_string(record).map_err(Into::into)
    }
}
