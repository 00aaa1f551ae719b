//! Watch command - the refreshing dashboard loop
//!
//! Prompts for the password once, then polls and redraws until
//! interrupted. Ctrl-C ends the process between or during polls.

use anyhow::{bail, Context, Result};
use chrono::Local;
use console::Term;
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use vigil_common::poller::poll;
use vigil_common::ssh::SshTransport;
use vigil_common::ProbeCommand;

use crate::display;
use crate::prompt;

pub async fn run(config_path: Option<PathBuf>, interval_secs: u64) -> Result<()> {
    let (path, config) = super::load_config(config_path)?;
    if config.hosts.is_empty() {
        bail!("no hosts configured in {}", path.display());
    }
    if interval_secs == 0 {
        bail!("watch interval must be at least 1 second");
    }

    let credential = prompt::acquire_credential()?;
    let command = ProbeCommand::new(config.probe.clone());
    let per_host_timeout = config.per_host_timeout();
    let transport = Arc::new(SshTransport::new());
    let term = Term::stdout();
    let use_color = console::colors_enabled();

    loop {
        let report = poll(
            Arc::clone(&transport),
            &config.hosts,
            &credential,
            &command,
            per_host_timeout,
        )
        .await
        .context("fleet poll could not be scheduled")?;

        term.clear_screen().ok();
        let stamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        if use_color {
            println!("{}", "Vigil - Fleet Dashboard".bold());
            println!("{}", format!("Last updated: {stamp}").dimmed());
        } else {
            println!("Vigil - Fleet Dashboard");
            println!("Last updated: {stamp}");
        }
        println!();
        print!("{}", display::render_report(&report, &config.hosts, use_color));

        tokio::time::sleep(Duration::from_secs(interval_secs)).await;
    }
}
