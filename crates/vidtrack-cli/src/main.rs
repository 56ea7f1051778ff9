//! VidTrack CLI - quota-aware YouTube video tracking
//!
//! A command-line interface for searching videos, fetching channel updates
//! and inspecting YouTube Data API quota usage.

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "vidtrack")]
#[command(author, version, about = "Quota-aware YouTube video tracking CLI", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format: table (default) or json
    #[arg(long, global = true, default_value = "table")]
    format: output::OutputFormat,

    /// Suppress progress messages
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Override config file path (or set VIDTRACK_CONFIG env var)
    #[arg(long, env = "VIDTRACK_CONFIG", global = true)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for videos by topic
    Search {
        /// Search query
        query: String,

        /// Only include videos published in the last N days
        #[arg(long)]
        since_days: Option<i64>,

        /// Maximum number of results (1-50)
        #[arg(long)]
        max: Option<u32>,
    },

    /// Fetch full details for video ids
    Videos {
        /// Video ids (space or comma separated)
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Fetch videos for tracked channels
    Channel {
        #[command(subcommand)]
        action: commands::channel::ChannelAction,
    },

    /// Inspect quota usage and cost estimates
    Quota {
        #[command(subcommand)]
        action: commands::quota::QuotaAction,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    // Propagate the config override so core picks it up
    if let Some(config_path) = &cli.config {
        std::env::set_var("VIDTRACK_CONFIG", config_path);
    }

    let settings = vidtrack_core::YouTubeSettings::load()?;

    // Create context for commands
    let ctx = commands::Context {
        settings,
        format: cli.format,
        quiet: cli.quiet,
    };

    // Execute command
    match cli.command {
        Commands::Search {
            query,
            since_days,
            max,
        } => commands::search::execute(&ctx, &query, since_days, max).await,
        Commands::Videos { ids } => commands::videos::execute(&ctx, &ids).await,
        Commands::Channel { action } => commands::channel::execute(&ctx, action).await,
        Commands::Quota { action } => commands::quota::execute(&ctx, action).await,
    }
}
