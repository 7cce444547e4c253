use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::traits::TopicArn;

/// Process-lifetime map from topic name to resolved ARN.
///
/// Entries never expire. A stale entry is removed only when a publish to
/// it fails with a missing topic, so the next lookup re-resolves.
#[derive(Debug, Default)]
pub struct TopicArnCache {
    arns: Mutex<HashMap<String, TopicArn>>,
}

impl TopicArnCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, topic_name: &str) -> Option<TopicArn> {
        self.lock().get(topic_name).cloned()
    }

    /// Stores `topic_arn`, replacing any previous entry for the name.
    pub fn set(&self, topic_name: &str, topic_arn: TopicArn) {
        self.lock().insert(topic_name.to_string(), topic_arn);
    }

    pub fn delete(&self, topic_name: &str) {
        self.lock().remove(topic_name);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic while holding the lock cannot leave the map half-updated.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, TopicArn>> {
        self.arns.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
