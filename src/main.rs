use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use banana_quest::config::Config;

mod cli;

#[derive(Parser)]
#[command(name = "banana-quest")]
#[command(about = "Banana Quest game backend - puzzles, ranks and achievements")]
#[command(version)]
struct Cli {
    /// Path to the config file (defaults to ~/.banana-quest/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Interface to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,
    },

    /// Write a default config file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },

    /// Print the current standings
    Leaderboard {
        /// Number of players to show
        #[arg(long)]
        limit: Option<usize>,

        /// Only show players holding this rank
        #[arg(long)]
        rank: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    match cli.command {
        Some(Commands::Init { force }) => {
            cli::init::init_command(cli.config.as_deref(), force)?;
        }
        Some(Commands::Leaderboard { limit, rank }) => {
            let config = Config::load(cli.config.as_deref())?;
            cli::leaderboard::leaderboard_command(&config, limit, rank)?;
        }
        Some(Commands::Serve { host, port }) => {
            let config = Config::load(cli.config.as_deref())?;
            cli::serve::serve_command(config, host, port)?;
        }
        None => {
            // Default: run the server
            let config = Config::load(cli.config.as_deref())?;
            cli::serve::serve_command(config, None, None)?;
        }
    }

    Ok(())
}
