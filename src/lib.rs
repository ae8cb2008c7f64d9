//! # Infocenter
//!
//! `infocenter` is a minimalist, in-memory, topic-based publish/subscribe
//! server. Publishers `POST` a message to a topic; subscribers hold a
//! streaming `GET` open and receive every later message on that topic as an
//! event record.
//!
//! ## Core Modules
//!
//! - `broker`: topic registry, message ids, per-topic logs and fan-out.
//! - `client`: a subscriber's bounded mailbox and deadline.
//! - `config`: loading and merging server configuration.
//! - `transport`: HTTP endpoints and the streaming subscriber loop.
//! - `utils`: error types and logging setup.

pub mod broker;
pub mod client;
pub mod config;
pub mod transport;
pub mod utils;
