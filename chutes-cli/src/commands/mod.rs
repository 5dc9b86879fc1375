//! Command implementations

pub mod account;
pub mod chutes;
pub mod images;

use crate::cli::Commands;
use crate::context::Context;
use anyhow::Result;

/// Dispatch the parsed top-level command.
pub async fn execute(ctx: &Context, command: Commands) -> Result<()> {
    match command {
        Commands::Chutes(cmd) => chutes::execute(ctx, cmd).await,
        Commands::Images(cmd) => images::execute(ctx, cmd).await,
        Commands::Account(cmd) => account::execute(ctx, cmd).await,
    }
}
