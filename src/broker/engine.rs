//! Broker engine
//!
//! This module contains the topic registry and the entry points used by the
//! transport layer:
//! - creating topics lazily on first reference
//! - publishing a message to a topic with a process-wide message id
//! - registering a subscriber's mailbox in a topic
//!
//! Concurrency notes:
//! - The registry has its own lock, independent of any topic's lock. It is
//!   held only for the check-and-insert of a name, so exactly one `Topic` is
//!   ever created per name.
//! - The broker is shared as `Arc<Broker>`; every method takes `&self`.
//! - Topics are never removed.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use bytes::Bytes;
use tracing::debug;

use crate::broker::counter::MessageCounter;
use crate::broker::subscription::Subscription;
use crate::broker::topic::{Delivery, Topic};
use crate::client::Client;
use crate::config::BrokerSettings;
use crate::utils::error::BrokerError;

#[derive(Debug, Default)]
pub struct Broker {
    topics: Mutex<HashMap<String, Arc<Topic>>>,
    counter: MessageCounter,
    settings: BrokerSettings,
}

impl Broker {
    pub fn new(settings: BrokerSettings) -> Self {
        Self {
            topics: Mutex::new(HashMap::new()),
            counter: MessageCounter::new(),
            settings,
        }
    }

    pub fn settings(&self) -> &BrokerSettings {
        &self.settings
    }

    /// Returns the topic called `name`, creating it if it doesn't exist.
    pub fn topic(&self, name: &str) -> Result<Arc<Topic>, BrokerError> {
        if name.is_empty() {
            return Err(BrokerError::MissingTopic);
        }
        let mut created = false;
        let topic = {
            let mut topics = self.topics.lock().unwrap_or_else(PoisonError::into_inner);
            topics
                .entry(name.to_string())
                .or_insert_with(|| {
                    created = true;
                    Arc::new(Topic::new(name))
                })
                .clone()
        };
        if created {
            debug!(topic = name, "created topic");
        }
        Ok(topic)
    }

    #[cfg(test)]
    pub(crate) fn is_registry_locked(&self) -> bool {
        self.topics.try_lock().is_err()
    }

    pub fn topic_count(&self) -> usize {
        self.topics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Last message id handed out across all topics.
    pub fn last_message_id(&self) -> u64 {
        self.counter.current()
    }

    /// Publishes `content` to every current subscriber of `topic`.
    ///
    /// Never fails because of subscriber state: full mailboxes just miss the
    /// event.
    pub fn publish(&self, topic: &str, content: Bytes) -> Result<Delivery, BrokerError> {
        let topic = self.topic(topic)?;
        let delivery = topic.publish(&self.counter, content);
        debug!(
            topic = topic.name(),
            id = delivery.id,
            delivered = delivery.delivered,
            dropped = delivery.dropped,
            published_at = %delivery.published_at,
            "published"
        );
        Ok(delivery)
    }

    /// Registers a new client in `topic` with a mailbox and deadline taken
    /// from the broker settings.
    pub fn subscribe(&self, topic: &str) -> Result<Subscription, BrokerError> {
        let topic = self.topic(topic)?;
        let (client, mailbox) = Client::new(
            self.settings.mailbox_capacity,
            Duration::from_secs(self.settings.subscription_timeout_secs),
        );
        topic.subscribe(client.id.clone(), mailbox);
        Ok(Subscription::new(client, topic))
    }
}
