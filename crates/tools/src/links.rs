//! The five short-link tools.

use std::sync::Arc;

use async_trait::async_trait;
use rand::Rng;
use serde::Deserialize;
use serde_json::{json, Value};

use shortlinker_store::{Link, LinkStore, ListFilter, NewLink};

use crate::registry::{RegistryError, ToolRegistry};
use crate::tool::{parse_args, Tool, ToolDefinition, ToolError};

const GENERATED_CODE_LEN: usize = 7;
const CODE_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

const DEFAULT_LIST_LIMIT: i64 = 20;
const MAX_LIST_LIMIT: i64 = 100;

/// Shared context injected into every link tool.
struct LinkTools {
    store: Arc<dyn LinkStore>,
    base_url: String,
}

impl LinkTools {
    /// One line per link, shared by info, stats, and list output.
    fn format_link(&self, link: &Link) -> String {
        format!(
            "{}/{} -> {} ({} clicks)",
            self.base_url, link.short_code, link.long_url, link.clicks
        )
    }

    async fn lookup(&self, short_code: &str) -> Result<String, ToolError> {
        let link = self
            .store
            .get(short_code)
            .await?
            .ok_or(ToolError::NotFound)?;
        Ok(self.format_link(&link))
    }
}

/// Build the full registry of link tools over the given store.
pub fn link_tool_registry(
    store: Arc<dyn LinkStore>,
    base_url: impl Into<String>,
) -> Result<ToolRegistry, RegistryError> {
    let ctx = Arc::new(LinkTools {
        store,
        base_url: base_url.into(),
    });
    let mut registry = ToolRegistry::new();
    // Registration order is the order clients see in tools/list.
    registry.register(CreateShortLink(ctx.clone()))?;
    registry.register(GetLinkInfo(ctx.clone()))?;
    registry.register(ListLinks(ctx.clone()))?;
    registry.register(GetLinkStats(ctx.clone()))?;
    registry.register(DeleteLink(ctx))?;
    Ok(registry)
}

/// Random 7-character lowercase base-36 code.
fn generate_code() -> String {
    let mut rng = rand::thread_rng();
    (0..GENERATED_CODE_LEN)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// Caller-supplied codes must match `^[A-Za-z0-9_-]{3,20}$`.
fn is_valid_code(code: &str) -> bool {
    (3..=20).contains(&code.len())
        && code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn require_short_code(short_code: String) -> Result<String, ToolError> {
    if short_code.is_empty() {
        return Err(ToolError::InvalidArgs(
            "short_code must not be empty".to_string(),
        ));
    }
    Ok(short_code)
}

// ── create_short_link ───────────────────────────────────────────────

struct CreateShortLink(Arc<LinkTools>);

#[derive(Deserialize)]
struct CreateArgs {
    long_url: String,
    #[serde(default)]
    short_code: Option<String>,
}

#[async_trait]
impl Tool for CreateShortLink {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "create_short_link".to_string(),
            description: "Create a new shortened URL".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "long_url": { "type": "string", "format": "uri" },
                    "short_code": { "type": "string", "pattern": "^[a-zA-Z0-9_-]{3,20}$" }
                },
                "required": ["long_url"]
            }),
        }
    }

    async fn execute(&self, args: Value) -> Result<String, ToolError> {
        let args: CreateArgs = parse_args(args)?;

        if url::Url::parse(&args.long_url).is_err() {
            return Err(ToolError::InvalidArgs(
                "long_url must be an absolute URL".to_string(),
            ));
        }

        let code = match args.short_code {
            Some(code) => {
                if !is_valid_code(&code) {
                    return Err(ToolError::InvalidArgs(
                        "short_code must match ^[a-zA-Z0-9_-]{3,20}$".to_string(),
                    ));
                }
                code
            }
            // No collision retry: 36^7 codes make clashes negligible, and a
            // clash still surfaces as a duplicate-code error from the store.
            None => generate_code(),
        };

        let link = self
            .0
            .store
            .insert(NewLink {
                short_code: code,
                long_url: args.long_url,
            })
            .await?;

        tracing::info!(code = %link.short_code, "short link created");
        Ok(format!("Created: {}/{}", self.0.base_url, link.short_code))
    }
}

// ── get_link_info ───────────────────────────────────────────────────

struct GetLinkInfo(Arc<LinkTools>);

#[derive(Deserialize)]
struct CodeArgs {
    short_code: String,
}

#[async_trait]
impl Tool for GetLinkInfo {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "get_link_info".to_string(),
            description: "Get information about a shortened link".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": { "short_code": { "type": "string" } },
                "required": ["short_code"]
            }),
        }
    }

    async fn execute(&self, args: Value) -> Result<String, ToolError> {
        let args: CodeArgs = parse_args(args)?;
        let code = require_short_code(args.short_code)?;
        self.0.lookup(&code).await
    }
}

// ── list_links ──────────────────────────────────────────────────────

struct ListLinks(Arc<LinkTools>);

#[derive(Deserialize)]
struct ListArgs {
    #[serde(default)]
    limit: Option<i64>,
    #[serde(default)]
    search: Option<String>,
}

#[async_trait]
impl Tool for ListLinks {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "list_links".to_string(),
            description: "List all shortened links with statistics".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "limit": { "type": "number", "default": 20, "minimum": 1, "maximum": 100 },
                    "search": { "type": "string" }
                }
            }),
        }
    }

    async fn execute(&self, args: Value) -> Result<String, ToolError> {
        let args: ListArgs = parse_args(args)?;
        let limit = args.limit.unwrap_or(DEFAULT_LIST_LIMIT);
        if !(1..=MAX_LIST_LIMIT).contains(&limit) {
            return Err(ToolError::InvalidArgs(
                "limit must be between 1 and 100".to_string(),
            ));
        }

        let links = self
            .0
            .store
            .list(&ListFilter {
                limit,
                search: args.search,
            })
            .await?;

        if links.is_empty() {
            return Ok("No links".to_string());
        }
        Ok(links
            .iter()
            .map(|l| self.0.format_link(l))
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

// ── get_link_stats ──────────────────────────────────────────────────

/// Alias of `get_link_info`: same contract, same output.
struct GetLinkStats(Arc<LinkTools>);

#[async_trait]
impl Tool for GetLinkStats {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "get_link_stats".to_string(),
            description: "Get detailed statistics for a shortened link".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": { "short_code": { "type": "string" } },
                "required": ["short_code"]
            }),
        }
    }

    async fn execute(&self, args: Value) -> Result<String, ToolError> {
        let args: CodeArgs = parse_args(args)?;
        let code = require_short_code(args.short_code)?;
        self.0.lookup(&code).await
    }
}

// ── delete_link ─────────────────────────────────────────────────────

struct DeleteLink(Arc<LinkTools>);

#[async_trait]
impl Tool for DeleteLink {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "delete_link".to_string(),
            description: "Delete a shortened link".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": { "short_code": { "type": "string" } },
                "required": ["short_code"]
            }),
        }
    }

    async fn execute(&self, args: Value) -> Result<String, ToolError> {
        let args: CodeArgs = parse_args(args)?;
        let code = require_short_code(args.short_code)?;
        let deleted = self.0.store.delete(&code).await?;
        if !deleted {
            return Err(ToolError::NotFound);
        }
        tracing::info!(code = %code, "short link deleted");
        Ok(format!("Deleted {}", code))
    }
}
