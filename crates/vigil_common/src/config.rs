//! Fleet configuration
//!
//! Configuration lives in ~/.config/vigil/fleet.toml:
//!
//! ```toml
//! per_host_timeout_secs = 5
//! probe = "df -h"
//!
//! [[hosts]]
//! id = "gpu-box"
//! host = "10.0.0.2"
//! port = 22
//! username = "ubuntu"
//! ```
//!
//! Hosts can also be imported from ssh aliases in ~/.zshrc, the format the
//! fleet was originally maintained in.

use crate::fleet::HostDescriptor;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

const CONFIG_DIR: &str = "vigil";
const CONFIG_FILE: &str = "fleet.toml";

fn default_timeout_secs() -> u64 {
    5
}

fn default_probe() -> String {
    "df -h".to_string()
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("host entry {index} has an empty id")]
    EmptyHostId { index: usize },

    #[error("duplicate host id '{0}' in config")]
    DuplicateHostId(String),

    #[error("could not determine config directory")]
    NoConfigDir,

    #[error("cannot serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// The fleet as configured on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetConfig {
    /// Per-host connect+exec budget in seconds
    #[serde(default = "default_timeout_secs")]
    pub per_host_timeout_secs: u64,

    /// Diagnostic command run on every host
    #[serde(default = "default_probe")]
    pub probe: String,

    #[serde(default)]
    pub hosts: Vec<HostDescriptor>,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            per_host_timeout_secs: default_timeout_secs(),
            probe: default_probe(),
            hosts: Vec::new(),
        }
    }
}

impl FleetConfig {
    /// ~/.config/vigil/fleet.toml (XDG config dir).
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load from the given path; a missing file yields the defaults so a
    /// first run can still `hosts --import-zshrc` into place.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let text = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, text).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn per_host_timeout(&self) -> Duration {
        Duration::from_secs(self.per_host_timeout_secs)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for (index, host) in self.hosts.iter().enumerate() {
            if host.id.trim().is_empty() {
                return Err(ConfigError::EmptyHostId { index });
            }
            if !seen.insert(host.id.as_str()) {
                return Err(ConfigError::DuplicateHostId(host.id.clone()));
            }
        }
        Ok(())
    }

    /// Merge imported hosts, skipping ids already present. Returns how
    /// many were actually added.
    pub fn merge_hosts(&mut self, imported: Vec<HostDescriptor>) -> usize {
        let existing: HashSet<String> = self.hosts.iter().map(|h| h.id.clone()).collect();
        let mut added = 0;
        for host in imported {
            if !existing.contains(&host.id) {
                self.hosts.push(host);
                added += 1;
            }
        }
        added
    }
}

/// Extract fleet hosts from `ssh -P <port> <user>@<host>` aliases in a
/// zshrc-style file. The host id is the target address; ids collide only
/// if the same address is aliased twice, in which case the first wins.
pub fn import_ssh_aliases(text: &str) -> Vec<HostDescriptor> {
    // Same shape the aliases were written in: ssh -P 2222 ubuntu@10.0.0.2
    let pattern = Regex::new(r"ssh -P (\d+) (\w+)@([\w\.\-]+)").expect("valid regex");
    let mut seen = HashSet::new();
    let mut hosts = Vec::new();
    for captures in pattern.captures_iter(text) {
        let port: u16 = match captures[1].parse() {
            Ok(port) => port,
            Err(_) => continue,
        };
        let username = captures[2].to_string();
        let address = captures[3].to_string();
        if seen.insert(address.clone()) {
            hosts.push(HostDescriptor::new(address.clone(), address, port, username));
        }
    }
    info!(found = hosts.len(), "scanned ssh aliases");
    hosts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_fields_missing() {
        let config: FleetConfig = toml::from_str("").unwrap();
        assert_eq!(config.per_host_timeout_secs, 5);
        assert_eq!(config.probe, "df -h");
        assert!(config.hosts.is_empty());
    }

    #[test]
    fn load_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fleet.toml");

        let mut config = FleetConfig::default();
        config.hosts.push(HostDescriptor::new("a", "10.0.0.1", 22, "root"));
        config.save(&path).unwrap();

        let loaded = FleetConfig::load(&path).unwrap();
        assert_eq!(loaded.hosts.len(), 1);
        assert_eq!(loaded.hosts[0].id, "a");
        assert_eq!(loaded.per_host_timeout_secs, 5);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = FleetConfig::load(&dir.path().join("nope.toml")).unwrap();
        assert!(config.hosts.is_empty());
    }

    #[test]
    fn duplicate_host_ids_rejected_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fleet.toml");
        fs::write(
            &path,
            r#"
[[hosts]]
id = "a"
host = "10.0.0.1"
username = "root"

[[hosts]]
id = "a"
host = "10.0.0.2"
username = "root"
"#,
        )
        .unwrap();
        assert!(matches!(
            FleetConfig::load(&path),
            Err(ConfigError::DuplicateHostId(id)) if id == "a"
        ));
    }

    #[test]
    fn imports_ssh_aliases_from_zshrc_text() {
        let zshrc = r#"
alias work="ssh -P 2222 dev@192.168.1.50"
alias gpu="ssh -P 22 ubuntu@10.0.0.2"
alias notssh="echo hello"
"#;
        let hosts = import_ssh_aliases(zshrc);
        assert_eq!(hosts.len(), 2);
        assert_eq!(hosts[0].host, "192.168.1.50");
        assert_eq!(hosts[0].port, 2222);
        assert_eq!(hosts[0].username, "dev");
        assert_eq!(hosts[1].port, 22);
    }

    #[test]
    fn duplicate_alias_addresses_keep_first() {
        let zshrc = "ssh -P 22 a@10.0.0.1\nssh -P 2222 b@10.0.0.1\n";
        let hosts = import_ssh_aliases(zshrc);
        assert_eq!(hosts.len(), 1);
        assert_eq!(hosts[0].username, "a");
    }

    #[test]
    fn merge_skips_existing_ids() {
        let mut config = FleetConfig::default();
        config.hosts.push(HostDescriptor::new("10.0.0.1", "10.0.0.1", 22, "a"));
        let added = config.merge_hosts(vec![
            HostDescriptor::new("10.0.0.1", "10.0.0.1", 22, "b"),
            HostDescriptor::new("10.0.0.2", "10.0.0.2", 22, "c"),
        ]);
        assert_eq!(added, 1);
        assert_eq!(config.hosts.len(), 2);
    }
}
