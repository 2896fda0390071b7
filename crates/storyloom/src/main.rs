//! Storyloom CLI binary.
//!
//! A line-based chat front end for the co-pilot: type to talk, slash
//! commands to inspect and edit the session.

use clap::Parser;
use storyloom::{ObservabilityConfig, init_observability};

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, run_chat};

    // Pick up GEMINI_API_KEY from .env when present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    let _guard = init_observability(
        &ObservabilityConfig::new("storyloom")
            .with_log_level(log_level)
            .with_json_logs(cli.json_logs)
            .with_span_export(cli.trace_spans),
    )
    .map_err(|e| e as Box<dyn std::error::Error>)?;

    match cli.command {
        Commands::Chat { script, config } => {
            run_chat(script.as_deref(), config.as_deref()).await?;
        }
    }

    Ok(())
}
