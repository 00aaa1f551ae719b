//! Status command - poll the fleet once and render the report

use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use vigil_common::poller::poll;
use vigil_common::ssh::SshTransport;
use vigil_common::ProbeCommand;

use crate::display;
use crate::prompt;

/// Returns whether the whole fleet is healthy; the caller maps that to
/// the process exit code.
pub async fn run(
    config_path: Option<PathBuf>,
    timeout_override: Option<u64>,
    probe_override: Option<String>,
    json: bool,
) -> Result<bool> {
    let (path, config) = super::load_config(config_path)?;
    if config.hosts.is_empty() {
        bail!(
            "no hosts configured in {} (try `vigilctl hosts --import-zshrc` or add [[hosts]] entries)",
            path.display()
        );
    }

    let credential = prompt::acquire_credential()?;
    let command = ProbeCommand::new(probe_override.unwrap_or_else(|| config.probe.clone()));
    let per_host_timeout = Duration::from_secs(timeout_override.unwrap_or(config.per_host_timeout_secs));

    let spinner = polling_spinner(config.hosts.len(), json);
    let report = poll(
        Arc::new(SshTransport::new()),
        &config.hosts,
        &credential,
        &command,
        per_host_timeout,
    )
    .await
    .context("fleet poll could not be scheduled")?;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let use_color = console::colors_enabled();
        print!("{}", display::render_report(&report, &config.hosts, use_color));
    }
    Ok(report.all_healthy())
}

fn polling_spinner(host_count: usize, json: bool) -> Option<ProgressBar> {
    if json || !console::Term::stderr().is_term() {
        return None;
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").expect("static spinner template"),
    );
    spinner.set_message(format!("Polling {} hosts...", host_count));
    spinner.enable_steady_tick(Duration::from_millis(100));
    Some(spinner)
}
