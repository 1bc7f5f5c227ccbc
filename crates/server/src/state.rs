//! Shared application state.

use shortlinker_mcp::Dispatcher;

/// Built once in the binary and shared through the router.
pub struct AppState {
    pub dispatcher: Dispatcher,
    /// Bearer token required on /mcp. `None` means the deployment is
    /// misconfigured and every /mcp request is answered with HTTP 500.
    pub mcp_token: Option<String>,
}
