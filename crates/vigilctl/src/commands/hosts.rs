//! Hosts command - list the configured fleet, import zshrc ssh aliases

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use vigil_common::config::import_ssh_aliases;

pub async fn run(config_path: Option<PathBuf>, import_zshrc: bool) -> Result<()> {
    let (path, mut config) = super::load_config(config_path)?;

    if import_zshrc {
        let zshrc = dirs::home_dir()
            .context("cannot locate home directory")?
            .join(".zshrc");
        let text = std::fs::read_to_string(&zshrc)
            .with_context(|| format!("cannot read {}", zshrc.display()))?;
        let imported = import_ssh_aliases(&text);
        let added = config.merge_hosts(imported);
        config
            .save(&path)
            .with_context(|| format!("cannot save {}", path.display()))?;
        println!("Imported {} new host(s) into {}", added, path.display());
    }

    if config.hosts.is_empty() {
        println!("No hosts configured in {}", path.display());
        return Ok(());
    }

    println!("{} ({} hosts)", path.display().to_string().bold(), config.hosts.len());
    for host in &config.hosts {
        println!(
            "  {:<20} {}@{}",
            host.id,
            host.username,
            host.address()
        );
    }
    Ok(())
}
