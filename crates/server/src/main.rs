//! HTTP server binary: Postgres-backed MCP endpoint plus health probe.

use std::sync::Arc;

use tracing::{info, warn};

use shortlinker_core::Config;
use shortlinker_mcp::Dispatcher;
use shortlinker_server::{build_router, db, AppState};
use shortlinker_store::{LinkStore, PgLinkStore};
use shortlinker_tools::link_tool_registry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    shortlinker_core::config::load_dotenv();
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let config = Config::from_env();
    config.log_summary();

    if !config.postgres.is_configured() {
        warn!("DATABASE_URL is not set, using the local development default");
    }
    if config.mcp.token.is_none() {
        warn!("MCP_TOKEN is not set, all /mcp requests will be rejected");
    }

    let pool = db::init_pool(&config.postgres)?;
    db::run_migrations(&pool).await;

    let store: Arc<dyn LinkStore> = Arc::new(PgLinkStore::new(pool));
    let registry = link_tool_registry(store, config.mcp.server_url.clone())?;
    let state = Arc::new(AppState {
        dispatcher: Dispatcher::new(registry),
        mcp_token: config.mcp.token.clone(),
    });

    let app = build_router(state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
