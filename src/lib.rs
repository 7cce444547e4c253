pub mod cache;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod traits;

pub mod sns;
pub mod strategy;
pub mod stream;

pub use cache::TopicArnCache;
pub use config::Config;
pub use dispatcher::{Dispatcher, DispatcherBuilder};
pub use error::{DecodeError, Error, Result};
pub use traits::{JsonRecord, MessageExtractor, NoTopic, Publisher, TopicArn, TopicArnFinder, TopicNamer};
