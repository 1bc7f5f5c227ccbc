//! Bearer-token middleware for the /mcp routes.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::state::AppState;

/// Rejects before any JSON-RPC framing: 500 when no token is configured,
/// 401 when the Authorization header is missing or wrong. The dispatcher is
/// only reached by requests that pass.
pub async fn require_bearer(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected) = state.mcp_token.as_deref() else {
        tracing::error!("MCP_TOKEN is not set, rejecting request");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "Server configuration error"})),
        )
            .into_response();
    };

    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|token| token.trim() == expected)
        .unwrap_or(false);

    if !authorized {
        tracing::warn!("unauthorized /mcp request");
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Unauthorized"})),
        )
            .into_response();
    }

    next.run(request).await
}
