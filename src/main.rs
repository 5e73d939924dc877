use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use carefull_api::config::AppConfig;
use carefull_api::database::{DatabaseManager, PgStore};
use carefull_api::identity::HostedIdentity;
use carefull_api::server;
use carefull_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, IDENTITY_URL, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env();
    tracing::info!("Starting CareFull API in {:?} mode", config.environment);

    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("Failed to connect to the database")?;
    let identity = HostedIdentity::new(&config.identity).context("Identity service is not configured")?;

    let port = config.server.port;
    let state = AppState::new(config, Arc::new(PgStore::new(pool)), Arc::new(identity));

    server::serve(state, port)
        .await
        .with_context(|| format!("Server on port {} stopped", port))
}
