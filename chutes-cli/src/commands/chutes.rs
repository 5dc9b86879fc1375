//! Chute management commands

use crate::context::Context;
use crate::output::{print_chute, print_chutes, print_cords, print_json};
use anyhow::{Context as _, Result};
use chutes_sdk::DeployChuteRequest;
use clap::{Args, Subcommand};
use colored::Colorize;
use serde_json::Value;

/// Chute management commands
#[derive(Debug, Args)]
pub struct ChutesCommands {
    #[command(subcommand)]
    pub command: ChutesSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum ChutesSubcommand {
    /// List deployed chutes
    List,

    /// Get chute details
    Get {
        /// Chute ID
        id: String,
    },

    /// Deploy a new chute
    Deploy {
        /// Chute name
        #[arg(short, long)]
        name: String,

        /// Image to deploy from
        #[arg(short, long)]
        image: String,

        /// Make the chute publicly invocable
        #[arg(long)]
        public: bool,

        /// Deployment configuration as JSON
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Delete a chute
    Delete {
        /// Chute ID
        id: String,

        /// Skip the confirmation requirement
        #[arg(long)]
        yes: bool,
    },

    /// List the cords a chute exposes
    Cords {
        /// Chute ID
        id: String,
    },

    /// Invoke a cord
    Invoke {
        /// Chute ID
        id: String,

        /// Cord name
        cord: String,

        /// Arguments as JSON
        #[arg(short, long)]
        args: Option<String>,
    },
}

/// Execute chute commands
pub async fn execute(ctx: &Context, cmd: ChutesCommands) -> Result<()> {
    match cmd.command {
        ChutesSubcommand::List => list(ctx).await,
        ChutesSubcommand::Get { id } => get(ctx, &id).await,
        ChutesSubcommand::Deploy {
            name,
            image,
            public,
            config,
        } => deploy(ctx, &name, &image, public, config).await,
        ChutesSubcommand::Delete { id, yes } => delete(ctx, &id, yes).await,
        ChutesSubcommand::Cords { id } => cords(ctx, &id).await,
        ChutesSubcommand::Invoke { id, cord, args } => invoke(ctx, &id, &cord, args).await,
    }
}

async fn list(ctx: &Context) -> Result<()> {
    let chutes = ctx.client.chutes().list().await?;
    print_chutes(ctx.output, &chutes)
}

async fn get(ctx: &Context, id: &str) -> Result<()> {
    let chute = ctx.client.chutes().get(id).await?;
    print_chute(ctx.output, &chute)
}

async fn deploy(
    ctx: &Context,
    name: &str,
    image: &str,
    public: bool,
    config: Option<String>,
) -> Result<()> {
    let mut request = DeployChuteRequest::new(name, image).with_public(public);
    if let Some(config) = config {
        let config: Value =
            serde_json::from_str(&config).context("--config is not valid JSON")?;
        request = request.with_config(config);
    }

    let chute = ctx.client.chutes().deploy(request).await?;
    println!("{} {}", "Deployed".green().bold(), chute.name);
    print_chute(ctx.output, &chute)
}

async fn delete(ctx: &Context, id: &str, yes: bool) -> Result<()> {
    if !yes {
        anyhow::bail!("refusing to delete chute {id} without --yes");
    }
    ctx.client.chutes().remove(id).await?;
    println!("{} chute {id}", "Deleted".red().bold());
    Ok(())
}

async fn cords(ctx: &Context, id: &str) -> Result<()> {
    let cords = ctx.client.chutes().cords(id).await?;
    print_cords(ctx.output, &cords)
}

async fn invoke(ctx: &Context, id: &str, cord: &str, args: Option<String>) -> Result<()> {
    let args: Value = match args {
        Some(raw) => serde_json::from_str(&raw).context("--args is not valid JSON")?,
        None => Value::Null,
    };

    let result = ctx.client.chutes().invoke_cord(id, cord, args).await?;
    print_json(&result)
}
