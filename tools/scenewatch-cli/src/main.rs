//! Scenewatch CLI — automatic OBS profile switching driven by displays.
//!
//! Usage:
//!   scenewatch watch [OPTIONS]   Watch for display changes and apply presets
//!   scenewatch displays          List currently connected displays
//!   scenewatch check [OPTIONS]   Validate a configuration file

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "scenewatch",
    about = "Automatic OBS profile and scene-collection switching driven by display configuration",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Watch for display changes and apply presets
    Watch {
        /// Path to the TOML configuration file
        #[arg(short, long, default_value = "config.toml")]
        config: PathBuf,

        /// Match presets but do not run any obws command
        #[arg(short, long)]
        dry_run: bool,

        /// Name or path of the obws CLI binary
        #[arg(long, default_value = scenewatch_engine::DEFAULT_OBWS_PROGRAM)]
        obws_bin: PathBuf,
    },

    /// List currently connected displays as JSON
    Displays,

    /// Validate a configuration file and print its presets
    Check {
        /// Path to the TOML configuration file
        #[arg(short, long, default_value = "config.toml")]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    scenewatch_common::logging::init_logging(log_level, false);

    match cli.command {
        Commands::Watch {
            config,
            dry_run,
            obws_bin,
        } => commands::watch::run(config, dry_run, obws_bin).await,
        Commands::Displays => commands::displays::run(),
        Commands::Check { config } => commands::check::run(config),
    }
}
