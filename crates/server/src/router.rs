//! HTTP router construction.

use std::sync::Arc;

use axum::middleware;
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::state::AppState;
use crate::{api, auth, mcp_http};

/// Assemble routes and middleware. /health stays outside the auth gate;
/// both /mcp methods sit behind it.
pub fn build_router(state: Arc<AppState>) -> Router {
    let mcp = Router::new()
        .route("/mcp", get(mcp_http::mcp_sse).post(mcp_http::mcp_post))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_bearer,
        ));

    Router::new()
        .route("/health", get(api::health))
        .merge(mcp)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
