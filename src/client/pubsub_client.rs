//! Client representation
//!
//! `Client` models one streaming subscriber. It owns the receiving side of a
//! bounded mailbox; the matching [`Mailbox`] sender is what a topic holds in
//! its subscriber set and pushes formatted events into.

use bytes::Bytes;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use uuid::Uuid;

pub type ClientId = String;

/// Sending half of a client's mailbox, held by the topic for fan-out.
pub type Mailbox = mpsc::Sender<Bytes>;

#[derive(Debug)]
pub struct Client {
    pub id: ClientId,
    mailbox: mpsc::Receiver<Bytes>,
    connected_at: Instant,
    deadline: Instant,
    timeout: Duration,
}

impl Client {
    /// Create a new client with an empty mailbox of `capacity` slots and a
    /// deadline `timeout` from now. Returns the client and the mailbox sender.
    ///
    /// A zero `capacity` is raised to one.
    pub fn new(capacity: usize, timeout: Duration) -> (Self, Mailbox) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let connected_at = Instant::now();
        let client = Self {
            id: Uuid::new_v4().to_string(),
            mailbox: rx,
            connected_at,
            deadline: connected_at + timeout,
            timeout,
        };
        (client, tx)
    }

    /// Wait for the next queued event. `None` once every sender is gone.
    pub async fn recv(&mut self) -> Option<Bytes> {
        self.mailbox.recv().await
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn connected_at(&self) -> Instant {
        self.connected_at
    }

    /// Push the deadline to one full timeout from now.
    pub fn extend_deadline(&mut self) {
        self.deadline = Instant::now() + self.timeout;
    }

    /// Whole seconds since the client was created.
    pub fn elapsed_secs(&self) -> u64 {
        self.connected_at.elapsed().as_secs()
    }
}
