pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "carefull")]
#[command(about = "CareFull CLI - Operator tasks for the CareFull IQ API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Apply database migrations to DATABASE_URL")]
    Migrate,

    #[command(about = "Create the first admin of a new family")]
    Bootstrap(commands::bootstrap::BootstrapArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Migrate => commands::migrate::handle(output_format).await,
        Commands::Bootstrap(args) => commands::bootstrap::handle(args, output_format).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bootstrap_with_global_json_flag() {
        let cli = Cli::try_parse_from([
            "carefull",
            "bootstrap",
            "--email",
            "owner@example.com",
            "--name",
            "Olive Owner",
            "--json",
        ])
        .unwrap();

        assert_eq!(OutputFormat::from_cli(&cli), OutputFormat::Json);
        match cli.command {
            Commands::Bootstrap(args) => {
                assert_eq!(args.email, "owner@example.com");
                assert_eq!(args.name, "Olive Owner");
                assert!(args.password.is_none());
            }
            Commands::Migrate => panic!("expected bootstrap"),
        }
    }

    #[test]
    fn bootstrap_requires_email() {
        assert!(Cli::try_parse_from(["carefull", "bootstrap", "--name", "Olive"]).is_err());
    }

    #[test]
    fn migrate_defaults_to_text_output() {
        let cli = Cli::try_parse_from(["carefull", "migrate"]).unwrap();
        assert_eq!(OutputFormat::from_cli(&cli), OutputFormat::Text);
    }
}
