//! CLI execution context

use crate::cli::Cli;
use crate::output::OutputFormat;
use anyhow::{Context as _, Result};
use chutes_sdk::{ChutesApiClient, ChutesConfig, DEFAULT_BASE_URL};

/// Execution context for CLI commands
pub struct Context {
    /// Configured API client
    pub client: ChutesApiClient,

    /// Output format
    pub output: OutputFormat,
}

impl Context {
    /// Build a context from CLI arguments.
    ///
    /// Resolution order for each setting: flag, then environment (clap
    /// fills flags from `CHUTES_API_KEY` / `CHUTES_API_BASE_URL`), then
    /// default.
    pub fn new(cli: &Cli) -> Result<Self> {
        let api_key = cli
            .api_key
            .clone()
            .context("no API key: pass --api-key or set CHUTES_API_KEY")?;

        let base_url = cli
            .api_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let config = ChutesConfig::new(api_key).with_base_url(base_url);
        let client = ChutesApiClient::new(config).context("invalid configuration")?;

        Ok(Self {
            client,
            output: cli.output,
        })
    }
}
