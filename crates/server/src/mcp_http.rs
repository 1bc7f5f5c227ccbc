//! The /mcp endpoint: JSON-RPC over HTTP POST and SSE.
//!
//! POST carries one request frame and returns one response frame, either as
//! a JSON body or, when the client sends `Accept: text/event-stream`, as a
//! single `jsonrpc` SSE event. GET opens a keep-alive SSE stream for clients
//! that probe for a server-push channel before POSTing.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::sse::{Event, Sse};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use tokio_stream::wrappers::ReceiverStream;

use crate::state::AppState;

const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(25);

fn wants_event_stream(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|accept| accept.contains("text/event-stream"))
        .unwrap_or(false)
}

/// Handle one JSON-RPC frame. The response shape follows the Accept header;
/// the dispatch itself is identical either way.
pub async fn mcp_post(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(frame): Json<Value>,
) -> Response {
    let response = state.dispatcher.dispatch(frame).await;

    if !wants_event_stream(&headers) {
        return Json(response).into_response();
    }

    let payload = match serde_json::to_string(&response) {
        Ok(p) => p,
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize response frame");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    // Single-shot stream: one jsonrpc event, then the body ends.
    let event = Event::default().event("jsonrpc").data(payload);
    let stream = futures::stream::iter([Ok::<_, Infallible>(event)]);
    Sse::new(stream).into_response()
}

/// SSE handshake: a `ready` event immediately, then `ping` events every
/// 25 seconds. The producer task stops as soon as a send fails, which is
/// how client disconnects are observed.
pub async fn mcp_sse() -> Sse<ReceiverStream<Result<Event, Infallible>>> {
    let (tx, rx) = tokio::sync::mpsc::channel::<Result<Event, Infallible>>(16);

    tokio::spawn(async move {
        if tx
            .send(Ok(Event::default().event("ready").data("{}")))
            .await
            .is_err()
        {
            return;
        }

        let mut ticker = tokio::time::interval(KEEPALIVE_INTERVAL);
        ticker.tick().await; // the first tick completes immediately

        loop {
            ticker.tick().await;
            let ping = json!({"ts": chrono::Utc::now().timestamp_millis()});
            if tx
                .send(Ok(Event::default().event("ping").data(ping.to_string())))
                .await
                .is_err()
            {
                tracing::debug!("sse client disconnected, stopping keep-alive");
                break;
            }
        }
    });

    Sse::new(ReceiverStream::new(rx))
}
