//! Tool layer: the five short-link operations exposed over MCP.
//!
//! Each tool owns its JSON-Schema descriptor and argument validation, and
//! executes against an injected `LinkStore`. The registry is an immutable
//! name → tool mapping built once at startup.

pub mod links;
pub mod registry;
pub mod tool;

pub use links::link_tool_registry;
pub use registry::{RegistryError, ToolRegistry};
pub use tool::{Tool, ToolDefinition, ToolError};
