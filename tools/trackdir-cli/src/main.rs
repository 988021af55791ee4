//! TrackDir CLI — Command-line interface for direction changes on tracked points.
//!
//! Usage:
//!   trackdir apply <PATH> --direction <DIR>   Change tracking direction of the selection
//!   trackdir info <PATH>                      Show scene information
//!   trackdir validate <PATH>                  Check a scene snapshot for consistency
//!   trackdir init <NAME>                      Create a demo scene snapshot

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "trackdir",
    about = "Tracking-direction editing with keyframe-role reconciliation",
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
    /// Change the tracking direction of the selected points in a scene
    Apply {
        /// Path to the scene snapshot (scene.json)
        path: PathBuf,

        /// Target direction: forward, backward, or bidirectional
        #[arg(short, long)]
        direction: String,

        /// Comma-separated point ids overriding the stored selection
        #[arg(short, long)]
        points: Option<String>,

        /// Classify and report without writing anything
        #[arg(long)]
        dry_run: bool,

        /// Skip the scene backup before saving
        #[arg(long)]
        no_backup: bool,
    },

    /// Show scene information
    Info {
        /// Path to the scene snapshot
        path: PathBuf,
    },

    /// Check a scene snapshot for consistency
    Validate {
        /// Path to the scene snapshot
        path: PathBuf,
    },

    /// Create a demo scene snapshot
    Init {
        /// Scene name
        name: String,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Frame count for the demo camera
        #[arg(long, default_value = "24")]
        frames: u32,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    trackdir_common::logging::init_logging(&trackdir_common::config::LoggingConfig {
        level: log_level.to_string(),
        json: false,
        file: None,
    });

    match cli.command {
        Commands::Apply {
            path,
            direction,
            points,
            dry_run,
            no_backup,
        } => commands::apply::run(path, direction, points, dry_run, no_backup),
        Commands::Info { path } => commands::info::run(path),
        Commands::Validate { path } => commands::validate::run(path),
        Commands::Init {
            name,
            output,
            frames,
        } => commands::init::run(name, output, frames),
    }
}
