//! Topic management
//!
//! A `Topic` owns the append-only log of messages published to one name and
//! the set of mailboxes currently subscribed to it. Both live behind a single
//! per-topic lock which is never held across an await point: fan-out only
//! uses `try_send`, so a slow subscriber can't stall a publisher.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use bytes::Bytes;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc::error::TrySendError;
use tracing::debug;

use crate::broker::counter::MessageCounter;
use crate::broker::message::Message;
use crate::client::{ClientId, Mailbox};

/// Outcome of one publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    pub id: u64,
    pub published_at: DateTime<Utc>,
    /// Mailboxes the event was queued into.
    pub delivered: usize,
    /// Subscribers skipped because their mailbox was full or already closed.
    pub dropped: usize,
}

#[derive(Debug, Default)]
struct TopicState {
    log: Vec<Message>,
    subscribers: HashMap<ClientId, Mailbox>,
}

#[derive(Debug)]
pub struct Topic {
    name: String,
    state: Mutex<TopicState>,
}

impl Topic {
    /// Create a new topic with the given name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            state: Mutex::new(TopicState::default()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // Every critical section leaves the state consistent, so a poisoned lock
    // is still safe to use.
    fn lock(&self) -> MutexGuard<'_, TopicState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[cfg(test)]
    pub(crate) fn is_locked(&self) -> bool {
        self.state.try_lock().is_err()
    }

    /// Add a subscriber's mailbox. Re-subscribing an id replaces its mailbox.
    pub fn subscribe(&self, id: ClientId, mailbox: Mailbox) {
        self.lock().subscribers.insert(id, mailbox);
    }

    /// Remove a subscriber. Returns whether it was present.
    pub fn unsubscribe(&self, id: &ClientId) -> bool {
        self.lock().subscribers.remove(id).is_some()
    }

    pub fn is_subscribed(&self, id: &ClientId) -> bool {
        self.lock().subscribers.contains_key(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }

    /// Snapshot of the topic log in publish order.
    pub fn history(&self) -> Vec<Message> {
        self.lock().log.clone()
    }

    /// Stamp `content` with the next id, append it to the log and offer the
    /// formatted event to every subscriber without blocking.
    ///
    /// The id is taken while the topic lock is held, so ids in one topic's
    /// log are strictly increasing even with concurrent publishers.
    pub fn publish(&self, counter: &MessageCounter, content: Bytes) -> Delivery {
        let mut full = Vec::new();
        let mut closed = Vec::new();

        let (id, published_at, delivered) = {
            let mut state = self.lock();

            let message = Message::new(counter.next_id(), content);
            let event = message.to_event();
            let (id, published_at) = (message.id, message.published_at);
            state.log.push(message);

            let mut delivered = 0;
            state.subscribers.retain(|client_id, mailbox| {
                match mailbox.try_send(event.clone()) {
                    Ok(()) => {
                        delivered += 1;
                        true
                    }
                    Err(TrySendError::Full(_)) => {
                        full.push(client_id.clone());
                        true
                    }
                    Err(TrySendError::Closed(_)) => {
                        closed.push(client_id.clone());
                        false
                    }
                }
            });
            (id, published_at, delivered)
        };

        // Logged outside the lock; the subscriber may write synchronously.
        for client in &full {
            debug!(topic = %self.name, %client, id, "mailbox full, dropping event");
        }
        for client in &closed {
            debug!(topic = %self.name, %client, id, "mailbox closed, removed subscriber");
        }

        Delivery {
            id,
            published_at,
            delivered,
            dropped: full.len() + closed.len(),
        }
    }
}
