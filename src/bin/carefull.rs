use clap::Parser;
use carefull_api::cli::{
    utils::{init_logging, output_error},
    Cli, OutputFormat,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let cli = Cli::parse();
    let output_format = OutputFormat::from_cli(&cli);

    if let Err(e) = carefull_api::cli::run(cli).await {
        match std::env::var("CLI_VERBOSE").as_deref() {
            Ok("true") | Ok("1") => output_error(output_format, &format!("{e:?}")),
            _ => output_error(output_format, &format!("{e:#}")),
        }
        std::process::exit(1);
    }

    Ok(())
}
