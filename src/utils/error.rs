//! The `error` module defines the error types used by the broker core.
//!
//! Transport-level errors (HTTP status mapping) live in
//! [`crate::transport::error`] and are built from these.

use thiserror::Error;

/// Failures surfaced by [`crate::broker::Broker`] operations.
///
/// Delivery problems are deliberately absent: a full or closed mailbox never
/// fails a publish.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BrokerError {
    /// The topic name was empty.
    #[error("Topic not specified")]
    MissingTopic,
}
