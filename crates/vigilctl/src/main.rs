//! Vigil Control - CLI for the SSH fleet-health poller
//!
//! Polls every configured host over SSH with one shared password and
//! renders a per-host health report.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use vigilctl::cli::{Cli, Commands};
use vigilctl::commands;

#[tokio::main]
async fn main() -> Result<()> {
    // Quiet by default; RUST_LOG=debug surfaces per-probe tracing on stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Status {
            timeout,
            probe,
            json,
        } => {
            let healthy = commands::status::run(cli.config, timeout, probe, json).await?;
            if !healthy {
                // Scripting affordance: any unhealthy host fails the call
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Watch { interval } => commands::watch::run(cli.config, interval).await,
        Commands::Hosts { import_zshrc } => commands::hosts::run(cli.config, import_zshrc).await,
    }
}
