use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use shortlinker_store::StoreError;

/// Describes a tool's interface for MCP clients: name, human description,
/// and a JSON Schema for the expected input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// The extension point all tools implement. Object-safe, Send + Sync, async.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Returns the tool's descriptor (name, description, JSON Schema).
    fn definition(&self) -> ToolDefinition;

    /// Validate the raw arguments and execute, returning the response text.
    async fn execute(&self, args: Value) -> Result<String, ToolError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Arguments failed validation; the message names the offending field.
    #[error("{0}")]
    InvalidArgs(String),

    /// Lookup or delete targeted a short code with no row.
    #[error("Not found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Deserialize tool arguments, treating an absent/null value as `{}`.
pub(crate) fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T, ToolError> {
    let args = if args.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        args
    };
    serde_json::from_value(args).map_err(|e| ToolError::InvalidArgs(e.to_string()))
}
