//! Fleet model - the inputs to one poll run
//!
//! A fleet is a set of host descriptors plus one shared credential and one
//! probe command. All three are immutable once a run starts.

use serde::{Deserialize, Serialize};
use std::fmt;

fn default_port() -> u16 {
    22
}

/// One remote target in the fleet.
///
/// `id` must be unique within a poll run; the report is keyed by it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostDescriptor {
    /// Display/report key, e.g. "gpu-box" or "10.0.0.2"
    pub id: String,
    /// Hostname or IP address
    pub host: String,
    /// SSH port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Login identity for this host
    pub username: String,
}

impl HostDescriptor {
    pub fn new(
        id: impl Into<String>,
        host: impl Into<String>,
        port: u16,
        username: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            host: host.into(),
            port,
            username: username.into(),
        }
    }

    /// "host:port" form for connect calls and log lines.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Display for HostDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}@{}:{})", self.id, self.username, self.host, self.port)
    }
}

/// The shared password applied to every host in a run.
///
/// Run-scoped by design: the tool authenticates the whole fleet with one
/// secret, matching the source setup it monitors. Never serialized, never
/// logged - Debug and Display both redact.
#[derive(Clone)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// The raw secret, for handing to the transport only.
    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

/// One diagnostic command executed remotely on every host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeCommand(String);

impl ProbeCommand {
    pub fn new(command: impl Into<String>) -> Self {
        Self(command.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProbeCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProbeCommand {
    fn from(command: &str) -> Self {
        Self::new(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_address_includes_port() {
        let host = HostDescriptor::new("web-1", "192.168.1.10", 2222, "deploy");
        assert_eq!(host.address(), "192.168.1.10:2222");
        assert_eq!(host.to_string(), "web-1 (deploy@192.168.1.10:2222)");
    }

    #[test]
    fn descriptor_port_defaults_to_22() {
        let host: HostDescriptor =
            toml::from_str("id = \"a\"\nhost = \"10.0.0.1\"\nusername = \"root\"").unwrap();
        assert_eq!(host.port, 22);
    }

    #[test]
    fn credential_never_leaks_via_debug_or_display() {
        let cred = Credential::new("hunter2");
        assert_eq!(format!("{:?}", cred), "Credential(<redacted>)");
        assert_eq!(format!("{}", cred), "<redacted>");
        assert_eq!(cred.secret(), "hunter2");
    }
}
