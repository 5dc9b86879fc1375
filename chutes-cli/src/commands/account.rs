//! Account commands

use crate::context::Context;
use crate::output::{print_account, print_deposit};
use anyhow::Result;
use clap::{Args, Subcommand};

/// Account commands
#[derive(Debug, Args)]
pub struct AccountCommands {
    #[command(subcommand)]
    pub command: AccountSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum AccountSubcommand {
    /// Show the authenticated account
    Me,

    /// Show developer deposit details
    Deposit,
}

/// Execute account commands
pub async fn execute(ctx: &Context, cmd: AccountCommands) -> Result<()> {
    match cmd.command {
        AccountSubcommand::Me => {
            let account = ctx.client.account().me().await?;
            print_account(ctx.output, &account)
        }
        AccountSubcommand::Deposit => {
            let deposit = ctx.client.account().developer_deposit().await?;
            print_deposit(ctx.output, &deposit)
        }
    }
}
