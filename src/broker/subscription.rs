//! Registration of a client in a topic.
//!
//! A `Subscription` pairs a [`Client`] with the topic it is registered in.
//! Dropping it removes the client from the topic's subscriber set, so
//! cleanup happens exactly once whichever way the connection loop exits.

use std::sync::Arc;

use bytes::Bytes;

use crate::broker::topic::Topic;
use crate::client::Client;

#[derive(Debug)]
pub struct Subscription {
    client: Client,
    topic: Arc<Topic>,
}

impl Subscription {
    pub(crate) fn new(client: Client, topic: Arc<Topic>) -> Self {
        Self { client, topic }
    }

    pub fn topic(&self) -> &Arc<Topic> {
        &self.topic
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut Client {
        &mut self.client
    }

    /// Next event from this subscription's mailbox.
    pub async fn recv(&mut self) -> Option<Bytes> {
        self.client.recv().await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.topic.unsubscribe(&self.client.id);
    }
}
