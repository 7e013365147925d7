//! SSE transport: a server-push stream with a connect event followed by
//! periodic keepalives. Clients cannot send requests over it.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::State,
    response::sse::{Event, Sse},
};
use serde_json::json;

use super::http::ServerState;

/// Logs when the client goes away and axum drops the stream.
struct Subscription;

impl Drop for Subscription {
    fn drop(&mut self) {
        tracing::info!("SSE client disconnected");
    }
}

pub async fn handle_sse(
    State(state): State<Arc<ServerState>>,
) -> Sse<impl futures::Stream<Item = Result<Event, Infallible>>> {
    let interval = state.keepalive_interval;

    let stream = async_stream::stream! {
        let _subscription = Subscription;
        tracing::info!("SSE client subscribed");

        yield Ok(Event::default()
            .event("connect")
            .data(json!({ "type": "connection", "status": "ready" }).to_string()));

        loop {
            tokio::time::sleep(interval).await;
            yield Ok(Event::default()
                .event("keepalive")
                .data(json!({ "type": "keepalive" }).to_string()));
        }
    };

    Sse::new(stream)
}
