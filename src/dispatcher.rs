//! Per-batch dispatch: name, resolve, extract, publish.
//!
//! Records are processed strictly in arrival order. Naming failures skip
//! the record; a publish that finds its topic missing invalidates the
//! cached ARN and is retried exactly once; every other failure aborts the
//! batch. Records already published before an abort stay published.

use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, info_span, warn, Instrument};

use crate::cache::TopicArnCache;
use crate::stream::{Batch, ChangeRecord};
use crate::traits::{
    JsonRecord, MessageExtractor, NoTopic, Publisher, TopicArn, TopicArnFinder, TopicNamer,
};
use crate::{Error, Result};

/// Service name attached to every dispatcher log event.
pub const SERVICE: &str = "stream-fanout";

/// Composes the four roles into the batch pipeline.
///
/// Cheap to clone; clones share the same collaborators and cache.
#[derive(Clone)]
pub struct Dispatcher {
    id: String,
    namer: Arc<dyn TopicNamer>,
    extractor: Arc<dyn MessageExtractor>,
    finder: Arc<dyn TopicArnFinder>,
    publisher: Arc<dyn Publisher>,
    topic_arns: Arc<TopicArnCache>,
}

/// Builder for [`Dispatcher`].
///
/// Without a strategy the dispatcher never publishes and, when a namer is
/// supplied alone, sends whole records as JSON.
#[derive(Default)]
pub struct DispatcherBuilder {
    namer: Option<Arc<dyn TopicNamer>>,
    extractor: Option<Arc<dyn MessageExtractor>>,
    finder: Option<Arc<dyn TopicArnFinder>>,
    publisher: Option<Arc<dyn Publisher>>,
    topic_arns: Option<Arc<TopicArnCache>>,
}

impl DispatcherBuilder {
    /// Installs a strategy that both names topics and extracts messages.
    pub fn strategy<S>(self, strategy: S) -> Self
    where
        S: TopicNamer + MessageExtractor + 'static,
    {
        let strategy = Arc::new(strategy);
        self.topic_namer_arc(strategy.clone())
            .message_extractor_arc(strategy)
    }

    /// Installs a transport that both resolves topics and publishes.
    pub fn transport<T>(self, transport: T) -> Self
    where
        T: TopicArnFinder + Publisher + 'static,
    {
        let transport = Arc::new(transport);
        self.topic_arn_finder_arc(transport.clone())
            .publisher_arc(transport)
    }

    pub fn topic_namer(self, namer: impl TopicNamer + 'static) -> Self {
        self.topic_namer_arc(Arc::new(namer))
    }

    pub fn topic_namer_arc(mut self, namer: Arc<dyn TopicNamer>) -> Self {
        self.namer = Some(namer);
        self
    }

    pub fn message_extractor(self, extractor: impl MessageExtractor + 'static) -> Self {
        self.message_extractor_arc(Arc::new(extractor))
    }

    pub fn message_extractor_arc(mut self, extractor: Arc<dyn MessageExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    pub fn topic_arn_finder(self, finder: impl TopicArnFinder + 'static) -> Self {
        self.topic_arn_finder_arc(Arc::new(finder))
    }

    pub fn topic_arn_finder_arc(mut self, finder: Arc<dyn TopicArnFinder>) -> Self {
        self.finder = Some(finder);
        self
    }

    pub fn publisher(self, publisher: impl Publisher + 'static) -> Self {
        self.publisher_arc(Arc::new(publisher))
    }

    pub fn publisher_arc(mut self, publisher: Arc<dyn Publisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    /// Shares an existing ARN cache instead of creating a fresh one.
    pub fn topic_arns(mut self, topic_arns: Arc<TopicArnCache>) -> Self {
        self.topic_arns = Some(topic_arns);
        self
    }

    pub fn build(self) -> Result<Dispatcher> {
        let finder = self
            .finder
            .ok_or_else(|| Error::Config("dispatcher requires a topic ARN finder".to_string()))?;
        let publisher = self
            .publisher
            .ok_or_else(|| Error::Config("dispatcher requires a publisher".to_string()))?;

        let dispatcher = Dispatcher {
            id: format!("{:x}", Utc::now().timestamp_millis()),
            namer: self.namer.unwrap_or_else(|| Arc::new(NoTopic)),
            extractor: self.extractor.unwrap_or_else(|| Arc::new(JsonRecord)),
            finder,
            publisher,
            topic_arns: self.topic_arns.unwrap_or_default(),
        };

        info!(id = %dispatcher.id, service = SERVICE, "dispatcher started");
        Ok(dispatcher)
    }
}

impl Dispatcher {
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::default()
    }

    pub fn topic_arns(&self) -> &Arc<TopicArnCache> {
        &self.topic_arns
    }

    /// Handles a raw batch document.
    pub async fn handle_json(&self, payload: &[u8]) -> Result<()> {
        self.run(serde_json::from_slice(payload)).await
    }

    /// Handles a batch document already parsed as JSON.
    pub async fn handle_value(&self, payload: serde_json::Value) -> Result<()> {
        self.run(serde_json::from_value(payload)).await
    }

    /// Processes every record of `batch` in order, stopping at the first
    /// fatal error.
    pub async fn dispatch(&self, batch: Batch) -> Result<()> {
        self.run(Ok(batch)).await
    }

    // `batch finished` is logged for every invocation, including batches
    // that fail to decode.
    async fn run(&self, batch: serde_json::Result<Batch>) -> Result<()> {
        let span = info_span!("dispatch", id = %self.id, service = SERVICE);
        async {
            let result = match batch {
                Ok(batch) => {
                    info!(records = batch.records.len(), "batch received");
                    self.dispatch_records(&batch.records).await
                }
                Err(e) => {
                    warn!(error = %e, "failed to decode batch");
                    Err(Error::from(e))
                }
            };
            info!(ok = result.is_ok(), "batch finished");
            result
        }
        .instrument(span)
        .await
    }

    async fn dispatch_records(&self, records: &[ChangeRecord]) -> Result<()> {
        for record in records {
            let topic_name = match self.namer.topic_name(record) {
                Ok(Some(name)) if !name.is_empty() => name,
                Ok(_) => {
                    debug!(event_id = %record.event_id, kind = ?record.event_kind, "no topic for record");
                    continue;
                }
                Err(e) => {
                    warn!(event_id = %record.event_id, error = %e, "failed to name topic, skipping record");
                    continue;
                }
            };

            match self.publish(&topic_name, record).await {
                Err(e) if e.is_topic_not_found() => {
                    warn!(topic = %topic_name, error = %e, "topic not found, re-resolving");
                    self.topic_arns.delete(&topic_name);
                    if let Err(e) = self.publish(&topic_name, record).await {
                        if e.is_topic_not_found() {
                            self.topic_arns.delete(&topic_name);
                        }
                        return Err(e);
                    }
                }
                result => result?,
            }
        }

        Ok(())
    }

    /// Resolves, extracts and publishes a single record.
    pub async fn publish(&self, topic_name: &str, record: &ChangeRecord) -> Result<()> {
        let since = Instant::now();

        let topic_arn = self.resolve(topic_name).await?;

        let message = self.extractor.extract_message(record).map_err(|e| {
            warn!(topic = %topic_name, arn = %topic_arn, error = %e, "failed to extract message");
            e
        })?;

        self.publisher
            .publish(&topic_arn, &message)
            .await
            .map_err(|e| {
                warn!(topic = %topic_name, arn = %topic_arn, error = %e, "failed to publish");
                e
            })?;

        info!(
            topic = %topic_name,
            arn = %topic_arn,
            event_id = %record.event_id,
            elapsed_ms = since.elapsed().as_millis() as u64,
            "published"
        );
        Ok(())
    }

    async fn resolve(&self, topic_name: &str) -> Result<TopicArn> {
        if let Some(arn) = self.topic_arns.get(topic_name) {
            return Ok(arn);
        }

        let since = Instant::now();
        let arn = self.finder.find_topic_arn(topic_name).await.map_err(|e| {
            warn!(topic = %topic_name, error = %e, "failed to resolve topic arn");
            e
        })?;

        self.topic_arns.set(topic_name, arn.clone());
        info!(
            topic = %topic_name,
            arn = %arn,
            elapsed_ms = since.elapsed().as_millis() as u64,
            "resolved topic arn"
        );
        Ok(arn)
    }
}
