//! Output formatting for CLI

use anyhow::Result;
use chutes_sdk::{Account, Chute, Cord, DepositInfo, Image};
use clap::ValueEnum;
use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, Color, Table};
use serde::Serialize;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Print a serializable value as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Build a styled table with the given headers.
pub fn styled_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.apply_modifier(UTF8_ROUND_CORNERS);
    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h).fg(Color::Cyan))
            .collect::<Vec<_>>(),
    );
    table
}

/// Render a chute status with a color cue.
pub fn status_text(status: Option<&str>) -> String {
    match status {
        Some("ready") | Some("running") => status.unwrap_or_default().green().to_string(),
        Some("pending") | Some("building") => status.unwrap_or_default().yellow().to_string(),
        Some("failed") | Some("error") => status.unwrap_or_default().red().to_string(),
        Some(other) => other.to_string(),
        None => "unknown".dimmed().to_string(),
    }
}

/// Print a list of chutes.
pub fn print_chutes(format: OutputFormat, chutes: &[Chute]) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(&chutes),
        OutputFormat::Table => {
            if chutes.is_empty() {
                println!("{}", "No chutes found.".dimmed());
                return Ok(());
            }
            let mut table = styled_table(&["ID", "NAME", "STATUS", "PUBLIC", "IMAGE"]);
            for chute in chutes {
                table.add_row(vec![
                    chute.id.clone(),
                    chute.name.clone(),
                    status_text(chute.status.as_deref()),
                    chute.public.to_string(),
                    chute.image.clone().unwrap_or_default(),
                ]);
            }
            println!("{table}");
            Ok(())
        }
    }
}

/// Print one chute.
pub fn print_chute(format: OutputFormat, chute: &Chute) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(chute),
        OutputFormat::Table => {
            println!("{} {}", "Chute:".bold(), chute.name);
            println!("  id:     {}", chute.id);
            println!("  status: {}", status_text(chute.status.as_deref()));
            println!("  public: {}", chute.public);
            if let Some(image) = &chute.image {
                println!("  image:  {image}");
            }
            if let Some(created_at) = &chute.created_at {
                println!("  created: {created_at}");
            }
            Ok(())
        }
    }
}

/// Print a list of cords.
pub fn print_cords(format: OutputFormat, cords: &[Cord]) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(&cords),
        OutputFormat::Table => {
            if cords.is_empty() {
                println!("{}", "No cords exposed.".dimmed());
                return Ok(());
            }
            let mut table = styled_table(&["NAME", "PUBLIC", "DESCRIPTION"]);
            for cord in cords {
                table.add_row(vec![
                    cord.name.clone(),
                    cord.public.to_string(),
                    cord.description.clone().unwrap_or_default(),
                ]);
            }
            println!("{table}");
            Ok(())
        }
    }
}

/// Print a list of images.
pub fn print_images(format: OutputFormat, images: &[Image]) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(&images),
        OutputFormat::Table => {
            if images.is_empty() {
                println!("{}", "No images found.".dimmed());
                return Ok(());
            }
            let mut table = styled_table(&["ID", "NAME", "TAG", "PUBLIC"]);
            for image in images {
                table.add_row(vec![
                    image.id.clone(),
                    image.name.clone(),
                    image.tag.clone().unwrap_or_default(),
                    image.public.to_string(),
                ]);
            }
            println!("{table}");
            Ok(())
        }
    }
}

/// Print the authenticated account.
pub fn print_account(format: OutputFormat, account: &Account) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(account),
        OutputFormat::Table => {
            println!("{} {}", "Account:".bold(), account.username);
            if let Some(user_id) = &account.user_id {
                println!("  id:      {user_id}");
            }
            if let Some(balance) = account.balance_usd {
                println!("  balance: ${balance:.2}");
            }
            Ok(())
        }
    }
}

/// Print deposit details.
pub fn print_deposit(format: OutputFormat, deposit: &DepositInfo) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(deposit),
        OutputFormat::Table => {
            if let Some(address) = &deposit.address {
                println!("{} {address}", "Deposit address:".bold());
            }
            if let Some(minimum) = deposit.minimum_usd {
                println!("Minimum deposit: ${minimum:.2}");
            }
            if let Some(instructions) = &deposit.instructions {
                println!("{instructions}");
            }
            Ok(())
        }
    }
}
