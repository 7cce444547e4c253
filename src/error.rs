//! Error types and result handling for stream-fanout.
//!
//! This module defines the main error type [`Error`], the record-level
//! [`DecodeError`] raised by naming strategies, and a convenience
//! [`Result`] type alias used throughout the crate.
//!
//! # Example
//!
//! ```rust
//! use stream_fanout::{DecodeError, Error, Result};
//!
//! fn name_topic() -> Result<String> {
//!     Err(DecodeError::EmptyKey { key: "event".to_string() }.into())
//! }
//!
//! match name_topic() {
//!     Ok(name) => println!("topic {}", name),
//!     Err(Error::Decode(e)) => eprintln!("skipping record: {}", e),
//!     Err(e) => eprintln!("fatal: {}", e),
//! }
//! ```

use thiserror::Error;

/// The main error type for stream-fanout operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error, from the settings file, environment, or a
    /// dispatcher built without a required collaborator.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A change record could not be decoded into a topic name or message.
    ///
    /// These are recovered at the record level by the dispatcher.
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// JSON error when reading a batch or encoding a message.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Topic name could not be resolved to an ARN.
    #[error("Failed to resolve topic '{topic}': {message}")]
    Resolve {
        /// Topic name being resolved
        topic: String,
        /// Description of the failure
        message: String,
    },

    /// The topic behind a cached ARN no longer exists.
    ///
    /// This is the only classification the dispatcher retries on.
    #[error("Topic not found: {arn}: {message}")]
    TopicNotFound {
        /// The ARN that was published to
        arn: String,
        /// Description reported by the transport
        message: String,
    },

    /// Publish failure other than a missing topic.
    #[error("Publish error: {message}")]
    Publish {
        /// Description reported by the transport
        message: String,
    },
}

impl Error {
    /// Returns true when a publish failed because the topic is gone.
    pub fn is_topic_not_found(&self) -> bool {
        matches!(self, Error::TopicNotFound { .. })
    }
}

/// Record-level decoding failures raised while naming a topic or
/// extracting a message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The image to decode is absent from the record.
    #[error("item is nil")]
    NilItem,

    /// The encoded attribute is missing from the image.
    #[error("attribute '{key}' not found")]
    EmptyKey { key: String },

    /// The encoded attribute is present but not a string.
    #[error("attribute '{key}' is not a string")]
    EmptyValue { key: String },

    /// The encoded attribute does not match `<version>,<topic>,<message>`.
    #[error("invalid encoding")]
    InvalidEncoding,

    /// The source ARN has no table segment.
    #[error("invalid arn format: '{arn}'")]
    InvalidArn { arn: String },

    /// The image has no state attribute.
    #[error("item has no state attribute '{attribute}'")]
    StateNotFound { attribute: String },

    /// The state attribute is not of string type.
    #[error("state attribute '{attribute}' not of string type")]
    StateNotString { attribute: String },
}

/// A convenient Result type alias for stream-fanout operations.
///
/// This is equivalent to `std::result::Result<T, stream_fanout::Error>`.
pub type Result<T> = std::result::Result<T, Error>;
