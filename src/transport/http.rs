//! HTTP transport
//!
//! Exposes the broker over plain HTTP:
//! - `POST /<prefix>/<topic>` publishes the raw request body, replies `204`.
//! - `GET /<prefix>/<topic>` opens an event stream for the topic.
//! - Any other method on a topic route is `405`; a missing topic is `400`.
//!
//! The topic is the whole remainder of the path, so `/<prefix>/a/b` names
//! the topic `a/b`.

use std::convert::Infallible;
use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use axum::routing::get;
use bytes::Bytes;
use futures::stream;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::broker::Broker;
use crate::transport::error::{ApiError, api_internal, api_validation_error};
use crate::transport::subscriber::run_subscription;

/// Records handed to the response body but not yet taken by the transport.
/// Kept at one so the mailbox capacity is what bounds a stalled subscriber.
const STREAM_BUFFER: usize = 1;

#[derive(Clone)]
pub struct AppState {
    pub broker: Arc<Broker>,
}

impl AppState {
    pub fn new(broker: Arc<Broker>) -> Self {
        Self { broker }
    }
}

/// Build the router with topic routes mounted under `route_prefix`.
pub fn router(state: AppState, route_prefix: &str) -> Router {
    let prefix = route_prefix.trim_matches('/');
    Router::new()
        .route(
            &format!("/{prefix}/*topic"),
            get(subscribe_to_topic).post(publish_message),
        )
        .route(
            &format!("/{prefix}"),
            get(missing_topic).post(missing_topic),
        )
        .route(
            &format!("/{prefix}/"),
            get(missing_topic).post(missing_topic),
        )
        .with_state(state)
}

/// Bind `addr` and serve until the future is dropped or the server fails.
///
/// A bind failure is returned to the caller; it is the only fatal error.
pub async fn serve(addr: &str, state: AppState, route_prefix: &str) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state, route_prefix)).await
}

async fn missing_topic() -> ApiError {
    api_validation_error("Topic not specified")
}

async fn publish_message(
    State(state): State<AppState>,
    Path(topic): Path<String>,
    body: Body,
) -> Result<StatusCode, ApiError> {
    if topic.is_empty() {
        return Err(api_validation_error("Topic not specified"));
    }

    let content = match to_bytes(body, state.broker.settings().max_message_bytes).await {
        Ok(content) => content,
        Err(e) => {
            warn!(%topic, "Error reading body: {e}");
            return Err(api_internal("Failed to read message"));
        }
    };

    let delivery = state.broker.publish(&topic, content)?;
    debug!(%topic, id = delivery.id, "message published");
    Ok(StatusCode::NO_CONTENT)
}

async fn subscribe_to_topic(
    State(state): State<AppState>,
    Path(topic): Path<String>,
) -> Result<Response, ApiError> {
    let subscription = state.broker.subscribe(&topic)?;
    let client = subscription.client().id.clone();

    let (tx, rx) = mpsc::channel::<Bytes>(STREAM_BUFFER);
    let events = stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|event| (Ok::<_, Infallible>(event), rx))
    });

    // On failure the subscription is dropped here, before anything could be
    // delivered to it.
    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/event-stream")
        .header(header::CACHE_CONTROL, "no-cache")
        .header(header::CONNECTION, "keep-alive")
        .body(Body::from_stream(events))
        .map_err(|e| {
            warn!(%topic, "Failed to open event stream: {e}");
            api_internal("Streaming unsupported")
        })?;

    info!(%topic, %client, "subscriber connected");
    let reset = state.broker.settings().reset_timeout_on_delivery;
    tokio::spawn(run_subscription(subscription, tx, reset));

    Ok(response)
}
