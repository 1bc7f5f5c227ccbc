//! HTTP surface for the shortlinker MCP server.
//!
//! The router exposes `/health` (open) and `/mcp` (bearer-gated JSON-RPC
//! over POST JSON, POST SSE, and GET SSE). The binaries in this crate wire
//! the Postgres store underneath; tests drive the same router with an
//! in-memory store.

pub mod api;
pub mod auth;
pub mod db;
pub mod mcp_http;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
