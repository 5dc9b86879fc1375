//! CLI argument definitions

use crate::commands::account::AccountCommands;
use crate::commands::chutes::ChutesCommands;
use crate::commands::images::ImagesCommands;
use crate::output::OutputFormat;
use clap::{Parser, Subcommand};

/// Debug CLI for the Chutes GPU-serving platform.
#[derive(Debug, Parser)]
#[command(name = "chutes", version, about, long_about = None)]
pub struct Cli {
    /// API base URL
    #[arg(long, global = true, env = "CHUTES_API_BASE_URL")]
    pub api_url: Option<String>,

    /// API key (prefer the CHUTES_API_KEY environment variable)
    #[arg(long, global = true, env = "CHUTES_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Output format
    #[arg(long, short, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level command groups
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage deployed chutes
    Chutes(ChutesCommands),
    /// Inspect container images
    Images(ImagesCommands),
    /// Inspect the authenticated account
    Account(AccountCommands),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_list_chutes() {
        let cli = Cli::try_parse_from(["chutes", "chutes", "list"]).unwrap();
        assert!(matches!(cli.command, Commands::Chutes(_)));
        assert_eq!(cli.output, OutputFormat::Table);
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::try_parse_from([
            "chutes",
            "--api-url",
            "https://staging.chutes.ai",
            "--output",
            "json",
            "images",
            "list",
        ])
        .unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("https://staging.chutes.ai"));
        assert_eq!(cli.output, OutputFormat::Json);
    }
}
