use std::path::Path;

use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(output_format: OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(target), Some(Value::Object(extra))) = (response.as_object_mut(), data) {
                target.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
            if let Some(Value::Object(fields)) = data {
                for (key, value) in fields {
                    match value {
                        Value::String(text) => println!("  {}: {}", key, text),
                        other => println!("  {}: {}", key, other),
                    }
                }
            }
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(output_format: OutputFormat, message: &str) {
    match output_format {
        OutputFormat::Json => {
            let response = json!({
                "success": false,
                "error": message
            });
            println!("{}", response);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
}

/// Install the stderr subscriber for the CLI
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(load_log_filter(None, "warn"))
        .with_writer(std::io::stderr)
        .init();
}

/// Loads `env_file` (or `.env`) first so RUST_LOG set there is honored
fn load_log_filter(env_file: Option<&Path>, default: &str) -> EnvFilter {
    let _ = match env_file {
        Some(path) => dotenvy::from_path(path),
        None => dotenvy::dotenv().map(|_| ()),
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    // Single test: RUST_LOG is process-wide
    #[test]
    fn log_level_comes_from_env_file() {
        std::env::remove_var("RUST_LOG");
        let absent = std::env::temp_dir().join(format!("carefull-{}.absent", uuid::Uuid::new_v4()));
        assert_eq!(load_log_filter(Some(&absent), "warn").max_level_hint(), Some(LevelFilter::WARN));

        let path = std::env::temp_dir().join(format!("carefull-{}.env", uuid::Uuid::new_v4()));
        std::fs::write(&path, "RUST_LOG=debug\n").unwrap();
        let filter = load_log_filter(Some(&path), "warn");
        std::env::remove_var("RUST_LOG");
        let _ = std::fs::remove_file(&path);

        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }
}
