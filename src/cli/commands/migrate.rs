use anyhow::Context;
use serde_json::json;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::database::DatabaseManager;

pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("Failed to connect to DATABASE_URL")?;

    DatabaseManager::migrate(&pool)
        .await
        .context("Failed to apply migrations")?;

    output_success(
        output_format,
        "Migrations applied",
        Some(json!({ "environment": format!("{:?}", config.environment) })),
    )
}
