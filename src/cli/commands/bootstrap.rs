use anyhow::Context;
use clap::Args;
use serde_json::json;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::database::{DatabaseManager, PgStore};
use crate::identity::HostedIdentity;
use crate::services::UserService;

#[derive(Args, Debug)]
pub struct BootstrapArgs {
    #[arg(long, help = "Email address of the first admin")]
    pub email: String,

    #[arg(long, help = "Full name of the first admin")]
    pub name: String,

    #[arg(long, help = "Temporary password; omit to sign in through a password reset")]
    pub password: Option<String>,
}

/// Provision a new family by creating its first admin
pub async fn handle(args: BootstrapArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let config = AppConfig::from_env();

    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("Failed to connect to DATABASE_URL")?;
    let store = PgStore::new(pool);
    let identity = HostedIdentity::new(&config.identity).context("Identity service is not configured")?;

    let profile = UserService::new(&store, &identity)
        .bootstrap(&args.email, &args.name, args.password)
        .await
        .context("Failed to create the first admin")?;

    output_success(
        output_format,
        "Family created",
        Some(json!({
            "user_id": profile.user_id,
            "family_id": profile.family_id,
            "email": profile.email,
            "full_name": profile.full_name,
        })),
    )
}
