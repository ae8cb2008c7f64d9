//! Streaming subscriber connection handler.
//!
//! Drives one subscription from registration to close:
//!
//! ```text
//! REGISTERING -> STREAMING -> { DELIVERED -> STREAMING | TIMED_OUT | DISCONNECTED } -> CLOSED
//! ```
//!
//! The handler writes event records into `out`, a bounded channel whose
//! receiver feeds the HTTP response body. Each record is sent as its own
//! chunk, so the transport pushes it to the peer as soon as it is written.
//! When the peer goes away the response body is dropped, which closes `out`;
//! that is the disconnect signal.
//!
//! A slot in `out` is reserved before an event is taken from the mailbox, so
//! the handler never holds an event it can't write, and every wait (for a
//! slot or for an event) also watches the deadline and the peer. A peer that
//! stays connected but stops reading is reclaimed at the deadline like any
//! other.
//!
//! Deregistration is done by dropping the [`Subscription`], which happens
//! before `out` is released so the peer never sees end-of-stream while the
//! client is still in the topic's subscriber set.

use bytes::Bytes;
use tokio::sync::mpsc;
use tokio::time::sleep_until;
use tracing::{debug, info};

use crate::broker::Subscription;
use crate::broker::message::timeout_event;

/// Why a subscription ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The deadline passed; a timeout record was written if there was room.
    TimedOut,
    /// The peer closed the connection.
    Disconnected,
    /// The peer went away with a written record still unread.
    WriteFailed,
}

enum Slot<'a> {
    Ready(mpsc::Permit<'a, Bytes>),
    Deadline,
    PeerGone,
}

enum Wake {
    Event(Option<Bytes>),
    Deadline,
    PeerGone,
}

/// Run the delivery/timeout/disconnect loop for `subscription` until it ends.
///
/// With `reset_timeout_on_delivery` the deadline moves forward after every
/// delivered event; otherwise it is fixed at connection start.
pub async fn run_subscription(
    mut subscription: Subscription,
    out: mpsc::Sender<Bytes>,
    reset_timeout_on_delivery: bool,
) -> SessionEnd {
    let end = stream_events(&mut subscription, &out, reset_timeout_on_delivery).await;

    let topic = subscription.topic().name().to_string();
    let client = subscription.client().id.clone();
    let elapsed = subscription.client().elapsed_secs();
    drop(subscription);

    info!(%topic, %client, elapsed_secs = elapsed, reason = ?end, "subscription closed");
    end
}

async fn stream_events(
    subscription: &mut Subscription,
    out: &mpsc::Sender<Bytes>,
    reset_timeout_on_delivery: bool,
) -> SessionEnd {
    loop {
        let deadline = subscription.client().deadline();

        // A full channel means the previous record hasn't been taken yet.
        let unread = out.capacity() == 0;
        let slot = tokio::select! {
            biased;
            _ = out.closed() => Slot::PeerGone,
            _ = sleep_until(deadline) => Slot::Deadline,
            permit = out.reserve() => match permit {
                Ok(permit) => Slot::Ready(permit),
                Err(_) => Slot::PeerGone,
            },
        };
        let permit = match slot {
            Slot::Ready(permit) => permit,
            Slot::Deadline => {
                // Stalled reader: best effort only.
                let record = timeout_event(subscription.client().elapsed_secs());
                if out.try_send(record).is_err() {
                    debug!(client = %subscription.client().id, "no room for timeout record");
                }
                return SessionEnd::TimedOut;
            }
            Slot::PeerGone if unread => return SessionEnd::WriteFailed,
            Slot::PeerGone => return SessionEnd::Disconnected,
        };

        let wake = tokio::select! {
            biased;
            _ = out.closed() => Wake::PeerGone,
            event = subscription.recv() => Wake::Event(event),
            _ = sleep_until(deadline) => Wake::Deadline,
        };

        match wake {
            Wake::Event(Some(event)) => {
                permit.send(event);
                if reset_timeout_on_delivery {
                    subscription.client_mut().extend_deadline();
                }
            }
            Wake::Event(None) => {
                // Every sender for this mailbox is gone.
                debug!(client = %subscription.client().id, "mailbox closed");
                return SessionEnd::Disconnected;
            }
            Wake::Deadline => {
                permit.send(timeout_event(subscription.client().elapsed_secs()));
                return SessionEnd::TimedOut;
            }
            Wake::PeerGone => return SessionEnd::Disconnected,
        }
    }
}
