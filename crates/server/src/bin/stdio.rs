//! Stdio server binary: newline-delimited JSON-RPC over stdin/stdout.
//!
//! Logs go to stderr; stdout is reserved for protocol frames.

use std::sync::Arc;

use shortlinker_core::Config;
use shortlinker_mcp::{Dispatcher, RpcServer, StdioTransport};
use shortlinker_server::db;
use shortlinker_store::{LinkStore, PgLinkStore};
use shortlinker_tools::link_tool_registry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    shortlinker_core::config::load_dotenv();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = Config::from_env();

    let pool = db::init_pool(&config.postgres)?;
    db::run_migrations(&pool).await;

    let store: Arc<dyn LinkStore> = Arc::new(PgLinkStore::new(pool));
    let registry = link_tool_registry(store, config.mcp.server_url.clone())?;
    let server = RpcServer::new(Dispatcher::new(registry));

    let mut transport = StdioTransport::new();
    server.run(&mut transport).await?;

    Ok(())
}
