//! The transport-driven server loop.
//!
//! Reads frames from an `McpTransport`, routes them through the
//! `Dispatcher`, and writes the responses back. Used by the stdio binary;
//! the HTTP surface calls the dispatcher directly instead.

use serde_json::Value;

use crate::dispatcher::{parse_error_response, Dispatcher};
use crate::error::McpError;
use crate::transport::McpTransport;

pub struct RpcServer {
    dispatcher: Dispatcher,
}

impl RpcServer {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Process frames until the transport closes.
    pub async fn run<T: McpTransport>(&self, transport: &mut T) -> Result<(), McpError> {
        tracing::info!("server loop starting");

        loop {
            let line = match transport.receive().await? {
                Some(line) => line,
                None => {
                    tracing::info!("transport closed, shutting down");
                    break;
                }
            };

            let raw: Value = match serde_json::from_str(&line) {
                Ok(v) => v,
                Err(e) => {
                    tracing::warn!(error = %e, "unparseable frame");
                    let resp = parse_error_response(&e);
                    transport.send(&serde_json::to_string(&resp)?).await?;
                    continue;
                }
            };

            // Frames without an id are notifications; nothing to answer.
            if raw.get("id").is_none() {
                let method = raw.get("method").and_then(Value::as_str).unwrap_or("?");
                tracing::debug!(method = %method, "dropping notification");
                continue;
            }

            let response = self.dispatcher.dispatch(raw).await;
            transport.send(&serde_json::to_string(&response)?).await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::ChannelTransport;
    use crate::types::{error_codes, JsonRpcResponse, RpcId};
    use serde_json::json;
    use shortlinker_store::MemoryLinkStore;
    use shortlinker_tools::link_tool_registry;
    use std::sync::Arc;

    fn spawn_server(transport: ChannelTransport) -> tokio::task::JoinHandle<()> {
        let store = Arc::new(MemoryLinkStore::new());
        let server = RpcServer::new(Dispatcher::new(
            link_tool_registry(store, "https://go4l.ink").unwrap(),
        ));
        tokio::spawn(async move {
            let mut transport = transport;
            server.run(&mut transport).await.unwrap();
        })
    }

    async fn roundtrip(client: &mut ChannelTransport, frame: Value) -> JsonRpcResponse {
        client.send(&frame.to_string()).await.unwrap();
        let line = client.receive().await.unwrap().unwrap();
        serde_json::from_str(&line).unwrap()
    }

    #[tokio::test]
    async fn test_run_answers_requests_until_eof() {
        let (mut client, server_side) = ChannelTransport::pair();
        let handle = spawn_server(server_side);

        let resp = roundtrip(
            &mut client,
            json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"}),
        )
        .await;
        assert!(resp.error.is_none());
        assert_eq!(resp.id, RpcId::Number(1));

        drop(client);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_run_reports_parse_error() {
        let (mut client, server_side) = ChannelTransport::pair();
        let handle = spawn_server(server_side);

        client.send("{not json").await.unwrap();
        let line = client.receive().await.unwrap().unwrap();
        let resp: JsonRpcResponse = serde_json::from_str(&line).unwrap();
        assert_eq!(resp.id, RpcId::Null);
        assert_eq!(resp.error.unwrap().code, error_codes::PARSE_ERROR);

        drop(client);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_run_drops_notifications() {
        let (mut client, server_side) = ChannelTransport::pair();
        let handle = spawn_server(server_side);

        // No id: must produce no reply. The follow-up request's answer being
        // first proves the notification was silently consumed.
        client
            .send(&json!({"jsonrpc": "2.0", "method": "notifications/initialized"}).to_string())
            .await
            .unwrap();

        let resp = roundtrip(
            &mut client,
            json!({"jsonrpc": "2.0", "id": 2, "method": "prompts/list"}),
        )
        .await;
        assert_eq!(resp.id, RpcId::Number(2));

        drop(client);
        handle.await.unwrap();
    }
}
