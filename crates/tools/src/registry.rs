use std::collections::HashMap;
use std::sync::Arc;

use crate::tool::{Tool, ToolDefinition};

/// Immutable mapping from tool name to handler. Built once at startup with
/// the store and config injected; iteration preserves registration order so
/// `tools/list` output is deterministic.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    order: Vec<String>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Register a tool. Returns error if name already registered.
    pub fn register(&mut self, tool: impl Tool + 'static) -> Result<(), RegistryError> {
        let def = tool.definition();
        if self.tools.contains_key(&def.name) {
            return Err(RegistryError::DuplicateName(def.name));
        }
        self.order.push(def.name.clone());
        self.tools.insert(def.name, Arc::new(tool));
        Ok(())
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// All registered descriptors, in registration order.
    pub fn list(&self) -> Vec<ToolDefinition> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|t| t.definition())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Tool with name '{0}' is already registered")]
    DuplicateName(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link_tool_registry;
    use shortlinker_store::MemoryLinkStore;
    use std::sync::Arc;

    struct NoopTool;

    #[async_trait::async_trait]
    impl Tool for NoopTool {
        fn definition(&self) -> ToolDefinition {
            ToolDefinition {
                name: "noop".to_string(),
                description: "Does nothing".to_string(),
                input_schema: serde_json::json!({"type": "object"}),
            }
        }

        async fn execute(
            &self,
            _args: serde_json::Value,
        ) -> Result<String, crate::tool::ToolError> {
            Ok(String::new())
        }
    }

    #[test]
    fn test_register_rejects_duplicate_name() {
        let mut registry = ToolRegistry::new();
        registry.register(NoopTool).unwrap();
        let err = registry.register(NoopTool).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateName(name) if name == "noop"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_link_registry_contents() {
        let store = Arc::new(MemoryLinkStore::new());
        let registry = link_tool_registry(store, "https://go4l.ink").unwrap();

        assert_eq!(registry.len(), 5);
        assert!(registry.get("create_short_link").is_some());
        assert!(registry.get("nonexistent").is_none());

        let names: Vec<String> = registry.list().into_iter().map(|d| d.name).collect();
        assert_eq!(
            names,
            vec![
                "create_short_link",
                "get_link_info",
                "list_links",
                "get_link_stats",
                "delete_link"
            ]
        );
    }
}
