use async_trait::async_trait;
use aws_sdk_sns::error::{DisplayErrorContext, SdkError};
use aws_sdk_sns::operation::publish::PublishError;
use std::fmt::Debug;
use tracing::instrument;

use super::SnsTopics;
use crate::traits::{Publisher, TopicArn};
use crate::{Error, Result};

#[async_trait]
impl Publisher for SnsTopics {
    #[instrument(skip(self, message), fields(arn = %topic_arn))]
    async fn publish(&self, topic_arn: &TopicArn, message: &str) -> Result<()> {
        self.client
            .publish()
            .topic_arn(topic_arn.as_str())
            .message(message)
            .send()
            .await
            .map_err(|e| classify(topic_arn, e))?;

        Ok(())
    }
}

/// Maps a failed `Publish` call onto the crate error, keeping a missing
/// topic distinguishable from every other failure.
pub(super) fn classify<R>(topic_arn: &TopicArn, err: SdkError<PublishError, R>) -> Error
where
    R: Debug + Send + Sync + 'static,
{
    let message = DisplayErrorContext(&err).to_string();
    if err.into_service_error().is_not_found_exception() {
        Error::TopicNotFound {
            arn: topic_arn.to_string(),
            message,
        }
    } else {
        Error::Publish { message }
    }
}
