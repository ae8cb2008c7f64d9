//! The `client` module defines the representation of a subscriber in the
//! pub/sub system.
//!
//! It provides the `Client` struct, which owns the receiving end of one
//! subscriber's bounded mailbox together with its connection deadline.

pub mod pubsub_client;
pub use pubsub_client::{Client, ClientId, Mailbox};
