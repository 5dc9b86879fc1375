//! Image commands

use crate::context::Context;
use crate::output::{print_images, print_json};
use anyhow::Result;
use clap::{Args, Subcommand};

/// Image commands
#[derive(Debug, Args)]
pub struct ImagesCommands {
    #[command(subcommand)]
    pub command: ImagesSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum ImagesSubcommand {
    /// List available images
    List,

    /// Get image details
    Get {
        /// Image ID
        id: String,
    },
}

/// Execute image commands
pub async fn execute(ctx: &Context, cmd: ImagesCommands) -> Result<()> {
    match cmd.command {
        ImagesSubcommand::List => {
            let images = ctx.client.images().list().await?;
            print_images(ctx.output, &images)
        }
        ImagesSubcommand::Get { id } => {
            let image = ctx.client.images().get(&id).await?;
            print_json(&image)
        }
    }
}
