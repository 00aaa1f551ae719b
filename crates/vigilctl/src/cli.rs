//! Command-line interface definition

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vigilctl")]
#[command(about = "Vigil - SSH fleet health at a glance", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the fleet config (default: ~/.config/vigil/fleet.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Poll every host once and render the fleet report
    Status {
        /// Per-host timeout in seconds (overrides config)
        #[arg(long)]
        timeout: Option<u64>,

        /// Probe command to run (overrides config)
        #[arg(long)]
        probe: Option<String>,

        /// Emit the raw report as JSON instead of tables
        #[arg(long)]
        json: bool,
    },

    /// Poll repeatedly and redraw a dashboard
    Watch {
        /// Seconds between polls
        #[arg(long, default_value_t = 60)]
        interval: u64,
    },

    /// List the configured fleet
    Hosts {
        /// Merge ssh aliases found in ~/.zshrc into the config
        #[arg(long)]
        import_zshrc: bool,
    },
}
