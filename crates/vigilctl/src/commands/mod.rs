//! Command modules for vigilctl
//!
//! - status: one-shot fleet poll and report
//! - watch: the refreshing dashboard loop
//! - hosts: fleet listing and zshrc alias import

pub mod hosts;
pub mod status;
pub mod watch;

use anyhow::{Context, Result};
use std::path::PathBuf;
use vigil_common::config::FleetConfig;

/// Explicit --config wins; otherwise ~/.config/vigil/fleet.toml.
pub fn resolve_config_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path),
        None => FleetConfig::default_path().context("cannot locate config directory"),
    }
}

pub fn load_config(explicit: Option<PathBuf>) -> Result<(PathBuf, FleetConfig)> {
    let path = resolve_config_path(explicit)?;
    let config = FleetConfig::load(&path)
        .with_context(|| format!("failed to load fleet config from {}", path.display()))?;
    Ok((path, config))
}
