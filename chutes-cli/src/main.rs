//! Debug CLI for the Chutes platform

mod cli;
mod commands;
mod context;
mod output;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use context::Context;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("chutes_sdk=debug,chutes=debug"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }

    let ctx = Context::new(&cli)?;
    commands::execute(&ctx, cli.command).await
}
