#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::{Arc, Mutex};
use stream_fanout::{Error, Publisher, Result, TopicArn, TopicArnFinder};
use tracing_subscriber::fmt::MakeWriter;

pub const ORDERS_STREAM_ARN: &str =
    "arn:aws:dynamodb:us-east-1:123456789012:table/rewards-orders/stream/2016-11-16T20:42:48.104";

/// Finder that hands out a fresh ARN on every call so re-resolution is
/// observable.
#[derive(Default)]
pub struct StubFinder {
    calls: Mutex<Vec<String>>,
    failing: Mutex<Vec<String>>,
}

impl StubFinder {
    pub fn fail_for(&self, topic_name: &str) {
        self.failing.lock().unwrap().push(topic_name.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, topic_name: &str) -> usize {
        self.calls().iter().filter(|n| *n == topic_name).count()
    }
}

#[async_trait]
impl TopicArnFinder for StubFinder {
    async fn find_topic_arn(&self, topic_name: &str) -> Result<TopicArn> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(topic_name.to_string());
        if self.failing.lock().unwrap().iter().any(|n| n == topic_name) {
            return Err(Error::Resolve {
                topic: topic_name.to_string(),
                message: "access denied".to_string(),
            });
        }
        let generation = calls.iter().filter(|n| *n == topic_name).count();
        Ok(TopicArn::new(format!(
            "arn:aws:sns:us-east-1:123456789012:{}:{}",
            topic_name, generation
        )))
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Outcome {
    NotFound,
    Fail,
}

/// Publisher that records every call and fails according to a script of
/// per-topic outcomes, succeeding once the script runs out.
#[derive(Default)]
pub struct StubPublisher {
    published: Mutex<Vec<(TopicArn, String)>>,
    attempts: Mutex<usize>,
    script: Mutex<HashMap<String, VecDeque<Outcome>>>,
}

impl StubPublisher {
    pub fn script(&self, topic_arn_prefix: &str, outcomes: &[Outcome]) {
        self.script
            .lock()
            .unwrap()
            .insert(topic_arn_prefix.to_string(), outcomes.iter().copied().collect());
    }

    pub fn published(&self) -> Vec<(TopicArn, String)> {
        self.published.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

#[async_trait]
impl Publisher for StubPublisher {
    async fn publish(&self, topic_arn: &TopicArn, message: &str) -> Result<()> {
        *self.attempts.lock().unwrap() += 1;

        let outcome = self
            .script
            .lock()
            .unwrap()
            .iter_mut()
            .find(|(prefix, _)| topic_arn.as_str().contains(prefix.as_str()))
            .and_then(|(_, outcomes)| outcomes.pop_front());

        match outcome {
            Some(Outcome::NotFound) => Err(Error::TopicNotFound {
                arn: topic_arn.to_string(),
                message: "Topic does not exist".to_string(),
            }),
            Some(Outcome::Fail) => Err(Error::Publish {
                message: "throttled".to_string(),
            }),
            None => {
                self.published
                    .lock()
                    .unwrap()
                    .push((topic_arn.clone(), message.to_string()));
                Ok(())
            }
        }
    }
}

pub fn record(event_name: &str, new_image: Option<Value>, old_image: Option<Value>) -> Value {
    let mut change = json!({
        "Keys": {"id": {"S": "order-1"}},
        "SequenceNumber": "111",
        "SizeBytes": 26,
        "StreamViewType": "NEW_AND_OLD_IMAGES"
    });
    if let Some(image) = new_image {
        change["NewImage"] = image;
    }
    if let Some(image) = old_image {
        change["OldImage"] = image;
    }

    json!({
        "eventID": "1",
        "eventName": event_name,
        "eventVersion": "1.0",
        "eventSource": "aws:dynamodb",
        "awsRegion": "us-east-1",
        "eventSourceARN": ORDERS_STREAM_ARN,
        "dynamodb": change
    })
}

pub fn batch(records: Vec<Value>) -> Value {
    json!({ "Records": records })
}

/// In-memory sink for formatted log lines.
#[derive(Clone, Default)]
pub struct LogBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl LogBuffer {
    pub fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync {
        tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
