//! dosecal - medication reminders on Google Calendar.
//!
//! Reads a structured medication schedule (JSON) and creates one calendar
//! event per dose occurrence, batched against the Google Calendar API. Can
//! later bulk-delete everything it created.

mod commands;
mod config;
mod google;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dosecal")]
#[command(about = "Turn a medication schedule into Google Calendar reminders")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect a Google account
    Auth,
    /// Create reminder events from a medication schedule file
    Create {
        /// JSON file with an array of medication records
        file: PathBuf,
    },
    /// Delete all reminder events dosecal created
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Auth => commands::auth::run().await,
        Commands::Create { file } => commands::create::run(&file).await,
        Commands::Clear => commands::clear::run().await,
    }
}
