//! Operational endpoints.

use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Liveness probe. Unauthenticated; does not touch the database.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "shortlinker-mcp",
        version: env!("CARGO_PKG_VERSION"),
    })
}
