use async_trait::async_trait;
use aws_sdk_sns::error::DisplayErrorContext;
use tracing::{debug, instrument, warn};

use super::SnsTopics;
use crate::traits::{TopicArn, TopicArnFinder};
use crate::{Error, Result};

#[async_trait]
impl TopicArnFinder for SnsTopics {
    #[instrument(skip(self), fields(topic = %topic_name))]
    async fn find_topic_arn(&self, topic_name: &str) -> Result<TopicArn> {
        // CreateTopic is idempotent and doubles as the lookup.
        let output = self
            .client
            .create_topic()
            .name(topic_name)
            .send()
            .await
            .map_err(|e| {
                warn!("CreateTopic failed for '{}': {}", topic_name, DisplayErrorContext(&e));
                Error::Resolve {
                    topic: topic_name.to_string(),
                    message: DisplayErrorContext(&e).to_string(),
                }
            })?;

        let arn = output.topic_arn().ok_or_else(|| Error::Resolve {
            topic: topic_name.to_string(),
            message: "CreateTopic returned no ARN".to_string(),
        })?;

        debug!("Resolved topic '{}' to {}", topic_name, arn);
        Ok(TopicArn::new(arn))
    }
}
