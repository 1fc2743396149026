//! TILEMERGE CLI - Command-line interface
//!
//! Commands:
//! - play: interactive game, one key per input line
//! - run: apply a scripted move sequence and report every step

mod play;
mod run_cmd;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tilemerge_core::GameConfig;

#[derive(Parser)]
#[command(name = "tilemerge")]
#[command(about = "Tile-merging puzzle for the terminal")]
struct Cli {
    /// Random seed (overrides the config file)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// JSON config file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play interactively (arrow names or u/d/l/r, restart/return to restart, q to quit)
    Play,
    /// Apply a scripted move sequence
    Run(run_cmd::RunArgs),
}

fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref(), cli.seed)?;

    match cli.command {
        Commands::Play => play::run(&config),
        Commands::Run(args) => run_cmd::run(args, &config),
    }
}

/// Log to stderr so stdout only carries the board
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Read the config file if one was given, then apply command-line overrides
fn load_config(path: Option<&Path>, seed: Option<u64>) -> Result<GameConfig> {
    let mut config = match path {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => GameConfig::default(),
    };

    if let Some(seed) = seed {
        config.seed = Some(seed);
    }

    tracing::debug!(?config, "Loaded configuration");
    Ok(config)
}
