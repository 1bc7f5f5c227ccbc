//! JSON-RPC 2.0 / MCP protocol layer.
//!
//! - **types**: wire format shared by every transport
//! - **dispatcher**: method routing over a `ToolRegistry`
//! - **transport**: pluggable line transports (stdio, channels)
//! - **server**: the read loop driving a transport
//! - **error**: transport-level errors

pub mod dispatcher;
pub mod error;
pub mod server;
pub mod transport;
pub mod types;

pub use dispatcher::{parse_error_response, Dispatcher};
pub use error::McpError;
pub use server::RpcServer;
pub use transport::{ChannelTransport, McpTransport, StdioTransport};
pub use types::*;
