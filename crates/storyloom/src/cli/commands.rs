//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Storyloom - a writing co-pilot that edits your script as you chat
#[derive(Parser, Debug)]
#[command(name = "storyloom")]
#[command(about = "A writing co-pilot that edits your script as you chat", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit log lines as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Export tracing spans to stdout (requires the `observability` feature)
    #[arg(long, global = true)]
    pub trace_spans: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Chat with the co-pilot over a script
    Chat {
        /// Script file to start from
        #[arg(long)]
        script: Option<PathBuf>,

        /// Configuration file (defaults to the layered storyloom.toml lookup)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_arguments() {
        let cli = Cli::parse_from([
            "storyloom",
            "chat",
            "--script",
            "fox.txt",
            "--config",
            "custom.toml",
            "-v",
        ]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Chat { script, config } => {
                assert_eq!(script, Some(PathBuf::from("fox.txt")));
                assert_eq!(config, Some(PathBuf::from("custom.toml")));
            }
        }
    }

    #[test]
    fn test_chat_without_arguments() {
        let cli = Cli::parse_from(["storyloom", "chat"]);
        assert!(!cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Chat {
                script: None,
                config: None
            }
        ));
    }
}
