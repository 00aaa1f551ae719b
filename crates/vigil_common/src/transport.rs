//! Transport seam - the opaque SSH capability the poller depends on
//!
//! The poller never speaks the SSH protocol itself. It asks a [`Transport`]
//! for an authenticated session and runs one command on it. Production uses
//! [`crate::ssh::SshTransport`]; tests substitute a scripted mock.

use crate::fleet::{Credential, HostDescriptor, ProbeCommand};
use std::future::Future;
use thiserror::Error;

/// Why a session could not be established.
///
/// `AuthRejected` is kept distinct from network failure: the report must
/// never conflate "host down" with "wrong password".
#[derive(Debug, Error)]
pub enum ConnectError {
    /// Credential rejected by a reachable, listening host
    #[error("authentication rejected for {username}@{address}")]
    AuthRejected { username: String, address: String },

    /// Unreachable, refused, resolution failure
    #[error("cannot reach {address}: {reason}")]
    Unreachable { address: String, reason: String },

    /// TCP established but the SSH handshake failed
    #[error("handshake with {address} failed: {reason}")]
    Handshake { address: String, reason: String },
}

/// Failure while running the probe on an established session.
#[derive(Debug, Error)]
#[error("remote command failed: {reason}")]
pub struct SessionError {
    pub reason: String,
    /// Whatever output was captured before the failure
    pub partial_output: Option<String>,
}

/// Captured result of one remote command execution.
#[derive(Debug, Clone)]
pub struct ProbeOutput {
    /// None when the channel closed without reporting an exit status
    pub exit_status: Option<u32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProbeOutput {
    /// stdout if non-empty, else stderr. What the report stores.
    pub fn text(&self) -> &str {
        if self.stdout.is_empty() {
            &self.stderr
        } else {
            &self.stdout
        }
    }
}

/// An authenticated remote session capable of running one probe.
pub trait ProbeSession: Send {
    fn run(
        &mut self,
        command: &ProbeCommand,
    ) -> impl Future<Output = Result<ProbeOutput, SessionError>> + Send;

    /// Best-effort teardown; errors are not interesting to the caller.
    fn close(self) -> impl Future<Output = ()> + Send;
}

/// Factory for authenticated sessions, one per host per run.
pub trait Transport: Send + Sync {
    type Session: ProbeSession;

    fn connect(
        &self,
        host: &HostDescriptor,
        credential: &Credential,
    ) -> impl Future<Output = Result<Self::Session, ConnectError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_output_text_falls_back_to_stderr() {
        let out = ProbeOutput {
            exit_status: Some(1),
            stdout: String::new(),
            stderr: "df: /mnt: no such file".to_string(),
        };
        assert_eq!(out.text(), "df: /mnt: no such file");
    }

    #[test]
    fn connect_error_messages_name_the_address() {
        let err = ConnectError::Unreachable {
            address: "10.0.0.9:22".to_string(),
            reason: "connection refused".to_string(),
        };
        assert!(err.to_string().contains("10.0.0.9:22"));
    }
}
