//! Error types for the MCP crate.

/// Errors raised by transports and the server read loop. Request-level
/// failures never surface here; the dispatcher turns those into JSON-RPC
/// error frames instead.
#[derive(Debug, thiserror::Error)]
pub enum McpError {
    /// A response frame failed to serialize.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Transport I/O error.
    #[error("Transport error: {0}")]
    Transport(#[from] std::io::Error),
}
