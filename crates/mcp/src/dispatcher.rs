//! Request dispatch: one raw JSON-RPC frame in, one response frame out.
//!
//! The dispatcher is transport-agnostic and stateless per request; the HTTP
//! handlers and the stdio loop both route through `dispatch`.

use std::sync::Arc;

use serde_json::Value;

use shortlinker_store::StoreError;
use shortlinker_tools::{ToolError, ToolRegistry};

use crate::types::{
    error_codes, CallToolResult, JsonRpcResponse, ListPromptsResult, ListToolsResult, RpcId,
    ToolContent, ToolInfo,
};

/// Routes JSON-RPC methods to the tool registry. Cheap to clone; shared
/// between the HTTP state and spawned tasks.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
}

impl Dispatcher {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    /// Handle one decoded frame. Envelope checks happen here so every
    /// transport reports `-32600` the same way; the id is echoed back, or
    /// `null` when the frame had none.
    pub async fn dispatch(&self, raw: Value) -> JsonRpcResponse {
        let id = raw
            .get("id")
            .cloned()
            .and_then(|v| serde_json::from_value::<RpcId>(v).ok())
            .unwrap_or(RpcId::Null);

        let version_ok = raw.get("jsonrpc").and_then(Value::as_str) == Some("2.0");
        let method = raw.get("method").and_then(Value::as_str);
        let (method, params) = match (version_ok, method) {
            (true, Some(m)) => (m, raw.get("params").cloned().unwrap_or(Value::Null)),
            _ => {
                tracing::warn!("rejecting malformed request envelope");
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_REQUEST,
                    "Invalid Request",
                );
            }
        };

        tracing::debug!(method = %method, "dispatching request");

        match method {
            "tools/list" => self.list_tools(id),
            "tools/call" => self.call_tool(id, params).await,
            "prompts/list" => self.list_prompts(id),
            "prompts/get" => {
                JsonRpcResponse::error(id, error_codes::METHOD_NOT_FOUND, "No prompts")
            }
            other => JsonRpcResponse::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method not found: {other}"),
            ),
        }
    }

    fn list_tools(&self, id: RpcId) -> JsonRpcResponse {
        let tools: Vec<ToolInfo> = self.registry.list().into_iter().map(ToolInfo::from).collect();
        self.to_success(id, ListToolsResult { tools })
    }

    fn list_prompts(&self, id: RpcId) -> JsonRpcResponse {
        self.to_success(id, ListPromptsResult { prompts: vec![] })
    }

    async fn call_tool(&self, id: RpcId, params: Value) -> JsonRpcResponse {
        let name = params
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);

        let tool = match self.registry.get(name) {
            Some(t) => t,
            None => {
                tracing::warn!(tool = %name, "unknown tool requested");
                return JsonRpcResponse::error(
                    id,
                    error_codes::METHOD_NOT_FOUND,
                    format!("Method not found: {name}"),
                );
            }
        };

        match tool.execute(arguments).await {
            Ok(text) => self.to_success(
                id,
                CallToolResult {
                    content: vec![ToolContent::Text { text }],
                    is_error: false,
                },
            ),
            Err(e) => {
                let code = rpc_code_for(&e);
                if code == error_codes::INTERNAL_ERROR {
                    tracing::error!(tool = %name, error = %e, "tool execution failed");
                } else {
                    tracing::debug!(tool = %name, error = %e, "tool rejected request");
                }
                JsonRpcResponse::error(id, code, e.to_string())
            }
        }
    }

    fn to_success<T: serde::Serialize>(&self, id: RpcId, result: T) -> JsonRpcResponse {
        match serde_json::to_value(result) {
            Ok(val) => JsonRpcResponse::success(id, val),
            Err(e) => JsonRpcResponse::error(
                id,
                error_codes::INTERNAL_ERROR,
                format!("JSON serialization error: {e}"),
            ),
        }
    }
}

/// Domain failures (bad arguments, missing rows, duplicate codes) map to the
/// server-defined `-32000`; only genuine store breakage is `-32603`.
fn rpc_code_for(err: &ToolError) -> i64 {
    match err {
        ToolError::InvalidArgs(_) | ToolError::NotFound => error_codes::DOMAIN_ERROR,
        ToolError::Store(StoreError::DuplicateCode(_)) => error_codes::DOMAIN_ERROR,
        ToolError::Store(StoreError::Database(_)) => error_codes::INTERNAL_ERROR,
    }
}

/// Response for a body that never parsed as JSON at all.
pub fn parse_error_response(err: &serde_json::Error) -> JsonRpcResponse {
    JsonRpcResponse::error(
        RpcId::Null,
        error_codes::PARSE_ERROR,
        format!("Parse error: {err}"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use shortlinker_store::{Link, LinkStore, ListFilter, MemoryLinkStore, NewLink};
    use shortlinker_tools::link_tool_registry;

    fn dispatcher() -> Dispatcher {
        let store = Arc::new(MemoryLinkStore::new());
        Dispatcher::new(link_tool_registry(store, "https://go4l.ink").unwrap())
    }

    fn request(id: i64, method: &str, params: Value) -> Value {
        json!({"jsonrpc": "2.0", "id": id, "method": method, "params": params})
    }

    #[tokio::test]
    async fn test_invalid_envelope_wrong_version() {
        let d = dispatcher();
        let resp = d
            .dispatch(json!({"jsonrpc": "1.0", "id": 1, "method": "tools/list"}))
            .await;
        let err = resp.error.unwrap();
        assert_eq!(err.code, error_codes::INVALID_REQUEST);
        assert_eq!(err.message, "Invalid Request");
        assert_eq!(resp.id, RpcId::Number(1));
    }

    #[tokio::test]
    async fn test_invalid_envelope_missing_method_echoes_null_id() {
        let d = dispatcher();
        let resp = d.dispatch(json!({"jsonrpc": "2.0"})).await;
        assert_eq!(resp.error.unwrap().code, error_codes::INVALID_REQUEST);
        assert_eq!(resp.id, RpcId::Null);
    }

    #[tokio::test]
    async fn test_method_not_found() {
        let d = dispatcher();
        let resp = d.dispatch(request(2, "resources/list", Value::Null)).await;
        let err = resp.error.unwrap();
        assert_eq!(err.code, error_codes::METHOD_NOT_FOUND);
        assert_eq!(err.message, "Method not found: resources/list");
    }

    #[tokio::test]
    async fn test_tools_list_returns_five_tools() {
        let d = dispatcher();
        let resp = d.dispatch(request(3, "tools/list", Value::Null)).await;
        assert!(resp.error.is_none());
        let result: ListToolsResult = serde_json::from_value(resp.result.unwrap()).unwrap();
        assert_eq!(result.tools.len(), 5);
        assert_eq!(result.tools[0].name, "create_short_link");
        // Wire format uses camelCase inputSchema.
        let raw = serde_json::to_value(&result.tools[0]).unwrap();
        assert!(raw.get("inputSchema").is_some());
    }

    #[tokio::test]
    async fn test_prompts_list_is_empty() {
        let d = dispatcher();
        let resp = d.dispatch(request(4, "prompts/list", Value::Null)).await;
        let result = resp.result.unwrap();
        assert_eq!(result["prompts"], json!([]));
    }

    #[tokio::test]
    async fn test_prompts_get_not_found() {
        let d = dispatcher();
        let resp = d.dispatch(request(5, "prompts/get", json!({"name": "x"}))).await;
        let err = resp.error.unwrap();
        assert_eq!(err.code, error_codes::METHOD_NOT_FOUND);
        assert_eq!(err.message, "No prompts");
    }

    #[tokio::test]
    async fn test_call_unknown_tool() {
        let d = dispatcher();
        let resp = d
            .dispatch(request(6, "tools/call", json!({"name": "redirect_link"})))
            .await;
        let err = resp.error.unwrap();
        assert_eq!(err.code, error_codes::METHOD_NOT_FOUND);
        assert_eq!(err.message, "Method not found: redirect_link");
    }

    #[tokio::test]
    async fn test_call_create_then_get() {
        let d = dispatcher();
        let resp = d
            .dispatch(request(
                7,
                "tools/call",
                json!({
                    "name": "create_short_link",
                    "arguments": {"long_url": "https://example.com", "short_code": "mylink"}
                }),
            ))
            .await;
        assert!(resp.error.is_none(), "{:?}", resp.error);
        let result: CallToolResult = serde_json::from_value(resp.result.unwrap()).unwrap();
        assert!(!result.is_error);
        let ToolContent::Text { text } = &result.content[0];
        assert_eq!(text, "Created: https://go4l.ink/mylink");

        let resp = d
            .dispatch(request(
                8,
                "tools/call",
                json!({"name": "get_link_info", "arguments": {"short_code": "mylink"}}),
            ))
            .await;
        let result: CallToolResult = serde_json::from_value(resp.result.unwrap()).unwrap();
        let ToolContent::Text { text } = &result.content[0];
        assert_eq!(text, "https://go4l.ink/mylink -> https://example.com (0 clicks)");
    }

    #[tokio::test]
    async fn test_call_validation_error_is_domain_code() {
        let d = dispatcher();
        let resp = d
            .dispatch(request(
                9,
                "tools/call",
                json!({"name": "create_short_link", "arguments": {"long_url": "not a url"}}),
            ))
            .await;
        let err = resp.error.unwrap();
        assert_eq!(err.code, error_codes::DOMAIN_ERROR);
        assert!(err.message.contains("long_url"));
    }

    #[tokio::test]
    async fn test_call_not_found_is_domain_code() {
        let d = dispatcher();
        let resp = d
            .dispatch(request(
                10,
                "tools/call",
                json!({"name": "delete_link", "arguments": {"short_code": "missing"}}),
            ))
            .await;
        let err = resp.error.unwrap();
        assert_eq!(err.code, error_codes::DOMAIN_ERROR);
        assert_eq!(err.message, "Not found");
    }

    #[tokio::test]
    async fn test_call_duplicate_code_is_domain_code() {
        let d = dispatcher();
        let create = |id: i64| {
            request(
                id,
                "tools/call",
                json!({
                    "name": "create_short_link",
                    "arguments": {"long_url": "https://example.com", "short_code": "taken"}
                }),
            )
        };
        d.dispatch(create(11)).await;
        let resp = d.dispatch(create(12)).await;
        let err = resp.error.unwrap();
        assert_eq!(err.code, error_codes::DOMAIN_ERROR);
        assert_eq!(err.message, "Short code already in use: taken");
    }

    /// Fails every operation the way a dead database connection would.
    struct FailingStore;

    #[async_trait]
    impl LinkStore for FailingStore {
        async fn insert(&self, _link: NewLink) -> Result<Link, StoreError> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }

        async fn get(&self, _short_code: &str) -> Result<Option<Link>, StoreError> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }

        async fn list(&self, _filter: &ListFilter) -> Result<Vec<Link>, StoreError> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }

        async fn delete(&self, _short_code: &str) -> Result<bool, StoreError> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }
    }

    #[tokio::test]
    async fn test_call_store_failure_is_internal_error() {
        let d = Dispatcher::new(
            link_tool_registry(Arc::new(FailingStore), "https://go4l.ink").unwrap(),
        );
        let resp = d
            .dispatch(request(14, "tools/call", json!({"name": "list_links"})))
            .await;
        let err = resp.error.unwrap();
        assert_eq!(err.code, error_codes::INTERNAL_ERROR);
        // The store's message is passed through as-is.
        assert_eq!(err.message, sqlx::Error::PoolTimedOut.to_string());
        assert_eq!(resp.id, RpcId::Number(14));
    }

    #[tokio::test]
    async fn test_call_without_arguments_uses_defaults() {
        let d = dispatcher();
        let resp = d
            .dispatch(request(13, "tools/call", json!({"name": "list_links"})))
            .await;
        let result: CallToolResult = serde_json::from_value(resp.result.unwrap()).unwrap();
        let ToolContent::Text { text } = &result.content[0];
        assert_eq!(text, "No links");
    }

    #[test]
    fn test_parse_error_response_shape() {
        let err = serde_json::from_str::<Value>("{nope").unwrap_err();
        let resp = parse_error_response(&err);
        assert_eq!(resp.id, RpcId::Null);
        assert_eq!(resp.error.unwrap().code, error_codes::PARSE_ERROR);
    }
}
