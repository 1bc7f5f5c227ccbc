//! Postgres pool setup and migrations.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use shortlinker_core::config::PostgresConfig;

/// Lazy pool: connections are established on first use, so the server can
/// start before the database is reachable.
pub fn init_pool(config: &PostgresConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect_lazy(&config.connection_string())
}

/// Apply pending migrations. Failure is logged rather than fatal; requests
/// will surface store errors until the database comes back.
pub async fn run_migrations(pool: &PgPool) {
    match sqlx::migrate!("../../migrations").run(pool).await {
        Ok(()) => tracing::info!("database migrations up to date"),
        Err(e) => tracing::warn!(error = %e, "skipping migrations, database unavailable"),
    }
}
