pub mod publisher;
pub mod topic_manager;


use aws_config::BehaviorVersion;
use aws_sdk_sns::Client;
use tracing::info;

use crate::config::SnsConfig;

/// SNS-backed topic resolution and publishing.
///
/// Implements [`crate::TopicArnFinder`] through `CreateTopic`, which
/// returns the existing ARN when the topic already exists, and
/// [`crate::Publisher`] through `Publish`.
#[derive(Debug, Clone)]
pub struct SnsTopics {
    client: Client,
}

impl SnsTopics {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn connect(config: &SnsConfig) -> Self {
        let region = config.region();
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(aws_config::Region::new(region.clone()));

        if let Some(ref endpoint) = config.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }

        let sdk_config = loader.load().await;

        info!(
            region = %region,
            endpoint = ?config.endpoint_url,
            "Connected to AWS SNS"
        );

        Self::new(Client::new(&sdk_config))
    }
}
