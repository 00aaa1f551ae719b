//! Production transport backed by russh
//!
//! Password authentication, one exec channel per probe, stdout/stderr and
//! exit-status capture. Host keys are accepted without verification - the
//! tool monitors a personally-administered fleet and mirrors the trust
//! model of the setup it replaced. Do not point it at hosts you do not own.

use crate::fleet::{Credential, HostDescriptor, ProbeCommand};
use crate::transport::{ConnectError, ProbeOutput, ProbeSession, SessionError, Transport};
use async_trait::async_trait;
use russh::client;
use russh::{ChannelMsg, Disconnect};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Accepts any server host key (paramiko AutoAddPolicy equivalent).
struct AcceptingHandler;

#[async_trait]
impl client::Handler for AcceptingHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        _server_public_key: &russh_keys::key::PublicKey,
    ) -> Result<bool, Self::Error> {
        Ok(true)
    }
}

/// SSH transport shared by every probe task in a run.
#[derive(Clone)]
pub struct SshTransport {
    config: Arc<client::Config>,
}

impl SshTransport {
    pub fn new() -> Self {
        let config = client::Config {
            inactivity_timeout: Some(Duration::from_secs(30)),
            ..Default::default()
        };
        Self {
            config: Arc::new(config),
        }
    }
}

impl Default for SshTransport {
    fn default() -> Self {
        Self::new()
    }
}

/// One authenticated session; runs exactly one probe then disconnects.
pub struct SshProbeSession {
    handle: client::Handle<AcceptingHandler>,
}

impl Transport for SshTransport {
    type Session = SshProbeSession;

    async fn connect(
        &self,
        host: &HostDescriptor,
        credential: &Credential,
    ) -> Result<Self::Session, ConnectError> {
        let address = host.address();

        debug!(%address, "opening ssh connection");
        let mut handle = client::connect(
            Arc::clone(&self.config),
            (host.host.clone(), host.port),
            AcceptingHandler,
        )
        .await
        .map_err(|err| ConnectError::Unreachable {
            address: address.clone(),
            reason: err.to_string(),
        })?;

        let authenticated = handle
            .authenticate_password(host.username.clone(), credential.secret().to_string())
            .await
            .map_err(|err| ConnectError::Handshake {
                address: address.clone(),
                reason: err.to_string(),
            })?;

        if !authenticated {
            return Err(ConnectError::AuthRejected {
                username: host.username.clone(),
                address,
            });
        }

        debug!(%address, "ssh session authenticated");
        Ok(SshProbeSession { handle })
    }
}

impl ProbeSession for SshProbeSession {
    async fn run(&mut self, command: &ProbeCommand) -> Result<ProbeOutput, SessionError> {
        let mut channel = self
            .handle
            .channel_open_session()
            .await
            .map_err(|err| SessionError {
                reason: format!("failed to open channel: {err}"),
                partial_output: None,
            })?;

        channel
            .exec(true, command.as_str())
            .await
            .map_err(|err| SessionError {
                reason: format!("failed to start command: {err}"),
                partial_output: None,
            })?;

        let mut stdout: Vec<u8> = Vec::new();
        let mut stderr: Vec<u8> = Vec::new();
        let mut exit_status = None;

        loop {
            let Some(msg) = channel.wait().await else {
                break;
            };
            match msg {
                ChannelMsg::Data { ref data } => stdout.extend_from_slice(data),
                ChannelMsg::ExtendedData { ref data, ext: 1 } => stderr.extend_from_slice(data),
                ChannelMsg::ExitStatus { exit_status: code } => {
                    // The channel still delivers Eof/Close after this;
                    // keep draining until it shuts.
                    exit_status = Some(code);
                }
                _ => {}
            }
        }

        Ok(ProbeOutput {
            exit_status,
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
        })
    }

    async fn close(self) {
        let mut handle = self.handle;
        let _ = handle
            .disconnect(Disconnect::ByApplication, "", "English")
            .await;
    }
}
