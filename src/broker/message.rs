//! Message definitions for the broker
//!
//! `Message` is the record appended to a topic's log on publish. The
//! functions here also produce the two event records written to streaming
//! subscribers:
//!
//! ```text
//! id: <id>\nevent: msg\ndata: <content>\n\n
//! event: timeout\ndata: <seconds>s\n\n
//! ```

use bytes::{BufMut, Bytes, BytesMut};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: u64,
    pub content: Bytes,
    pub published_at: DateTime<Utc>,
}

impl Message {
    pub fn new(id: u64, content: Bytes) -> Self {
        Self {
            id,
            content,
            published_at: Utc::now(),
        }
    }

    /// Format the message as a `msg` event record.
    ///
    /// Content is copied verbatim; it is not split on newlines.
    pub fn to_event(&self) -> Bytes {
        let header = format!("id: {}\nevent: msg\ndata: ", self.id);
        let mut buf = BytesMut::with_capacity(header.len() + self.content.len() + 2);
        buf.put_slice(header.as_bytes());
        buf.put_slice(&self.content);
        buf.put_slice(b"\n\n");
        buf.freeze()
    }
}

/// The record sent right before a subscription is closed on timeout.
pub fn timeout_event(elapsed_secs: u64) -> Bytes {
    Bytes::from(format!("event: timeout\ndata: {elapsed_secs}s\n\n"))
}
