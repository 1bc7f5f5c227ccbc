use std::env;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

fn env_u16(key: &str, default: u16) -> u16 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_u32(key: &str, default: u32) -> u32 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub postgres: PostgresConfig,
    pub mcp: McpConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig::from_env(),
            postgres: PostgresConfig::from_env(),
            mcp: McpConfig::from_env(),
        }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!(
            "  server:    host={}, port={}",
            self.server.host,
            self.server.port
        );
        tracing::info!("  postgres:  configured={}", self.postgres.url.is_some());
        tracing::info!(
            "  mcp:       token_set={}, base_url={}",
            self.mcp.token.is_some(),
            self.mcp.server_url
        );
    }
}

// ── Server ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    fn from_env() -> Self {
        Self {
            host: env_or("HOST", "0.0.0.0"),
            port: env_u16("PORT", 3001),
        }
    }
}

// ── PostgreSQL ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostgresConfig {
    pub url: Option<String>,
    pub max_connections: u32,
}

impl PostgresConfig {
    fn from_env() -> Self {
        Self {
            url: env_opt("DATABASE_URL"),
            max_connections: env_u32("PG_MAX_CONNECTIONS", 10),
        }
    }

    /// Connection string, falling back to a local default for development.
    pub fn connection_string(&self) -> String {
        self.url
            .clone()
            .unwrap_or_else(|| "postgres://postgres:@localhost:5432/shortlinker".to_string())
    }

    pub fn is_configured(&self) -> bool {
        self.url.is_some()
    }
}

// ── MCP ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpConfig {
    /// Shared bearer secret. When unset every /mcp request fails with 500.
    pub token: Option<String>,
    /// Base URL used to render short-link display strings.
    pub server_url: String,
}

impl McpConfig {
    fn from_env() -> Self {
        Self {
            token: env_opt("MCP_TOKEN"),
            server_url: env_or("SHORTLINKER_URL", "https://go4l.ink"),
        }
    }
}
