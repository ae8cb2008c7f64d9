//! The `transport` module is responsible for handling network communication
//! with clients over HTTP.
//!
//! It implements the publish and subscribe endpoints, the per-subscriber
//! streaming loop, and the mapping of failures to HTTP responses.

pub mod error;
pub mod http;
pub mod subscriber;
