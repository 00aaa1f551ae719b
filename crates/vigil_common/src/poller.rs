//! Fleet poller - concurrent probe fan-out with per-host deadlines
//!
//! One tokio task per host, each with its own independent timeout. A slow
//! or dead host costs the run at most `per_host_timeout`; it never delays
//! siblings. The returned report accounts for every requested host exactly
//! once - per-host failures are data, not errors.

use crate::fleet::{Credential, HostDescriptor, ProbeCommand};
use crate::report::{FleetReport, HostResult, ProbeStatus};
use crate::transport::{ConnectError, ProbeSession, Transport};
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Precondition violations - the only way `poll` itself fails.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PollError {
    #[error("host list is empty")]
    EmptyFleet,

    #[error("per-host timeout must be greater than zero")]
    ZeroTimeout,

    #[error("duplicate host id '{0}' in fleet")]
    DuplicateHostId(String),
}

/// Probe every host concurrently with the shared credential and return a
/// complete report.
///
/// Guarantees `report.results` holds exactly one entry per input host,
/// whatever happens to the individual probes. Only precondition violations
/// (empty fleet, zero timeout, duplicate ids) fail the call itself.
pub async fn poll<T>(
    transport: Arc<T>,
    hosts: &[HostDescriptor],
    credential: &Credential,
    command: &ProbeCommand,
    per_host_timeout: Duration,
) -> Result<FleetReport, PollError>
where
    T: Transport + 'static,
    T::Session: 'static,
{
    if hosts.is_empty() {
        return Err(PollError::EmptyFleet);
    }
    if per_host_timeout.is_zero() {
        return Err(PollError::ZeroTimeout);
    }
    let mut seen = HashSet::new();
    for host in hosts {
        if !seen.insert(host.id.as_str()) {
            return Err(PollError::DuplicateHostId(host.id.clone()));
        }
    }

    let run_id = Uuid::new_v4();
    let started_at = Utc::now();
    info!(
        %run_id,
        hosts = hosts.len(),
        timeout_secs = per_host_timeout.as_secs_f64(),
        "polling fleet"
    );

    let mut tasks = JoinSet::new();
    for host in hosts {
        let transport = Arc::clone(&transport);
        let host = host.clone();
        let credential = credential.clone();
        let command = command.clone();
        tasks.spawn(async move {
            probe_host(transport.as_ref(), &host, &credential, &command, per_host_timeout).await
        });
    }

    let mut results: HashMap<String, HostResult> = HashMap::with_capacity(hosts.len());
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(result) => {
                debug!(host = %result.host_id, status = result.status.label(), "probe finished");
                results.insert(result.host_id.clone(), result);
            }
            Err(err) => {
                // Identified and backfilled below; completeness must hold.
                warn!("probe task failed to join: {err}");
            }
        }
    }

    // A panicked task loses its identity at the join boundary. Every
    // requested host still gets exactly one entry.
    for host in hosts {
        if !results.contains_key(&host.id) {
            results.insert(
                host.id.clone(),
                HostResult::new(
                    host.id.clone(),
                    ProbeStatus::ConnectFailure,
                    Some("probe task aborted before producing a result".to_string()),
                    Duration::ZERO,
                ),
            );
        }
    }

    let report = FleetReport {
        run_id,
        started_at,
        completed_at: Utc::now(),
        results,
    };
    info!(
        %run_id,
        healthy = report.healthy_count(),
        unhealthy = report.unhealthy_count(),
        "fleet poll complete"
    );
    Ok(report)
}

/// Probe one host under its own deadline. Timing out drops the in-flight
/// connect/exec future; siblings are untouched.
async fn probe_host<T: Transport>(
    transport: &T,
    host: &HostDescriptor,
    credential: &Credential,
    command: &ProbeCommand,
    budget: Duration,
) -> HostResult {
    let started = Instant::now();
    match tokio::time::timeout(budget, attempt_probe(transport, host, credential, command)).await {
        Ok((status, output)) => HostResult::new(host.id.clone(), status, output, started.elapsed()),
        Err(_) => {
            debug!(host = %host.id, "per-host budget elapsed, cancelling probe");
            HostResult::new(host.id.clone(), ProbeStatus::Timeout, None, started.elapsed())
        }
    }
}

/// Connect, authenticate, run the probe, map every failure to its status.
async fn attempt_probe<T: Transport>(
    transport: &T,
    host: &HostDescriptor,
    credential: &Credential,
    command: &ProbeCommand,
) -> (ProbeStatus, Option<String>) {
    let mut session = match transport.connect(host, credential).await {
        Ok(session) => session,
        Err(ConnectError::AuthRejected { .. }) => {
            return (ProbeStatus::AuthFailure, None);
        }
        Err(err) => {
            return (ProbeStatus::ConnectFailure, Some(err.to_string()));
        }
    };

    let outcome = match session.run(command).await {
        Ok(output) => match output.exit_status {
            Some(0) => (ProbeStatus::Success, Some(output.text().to_string())),
            Some(code) => (
                ProbeStatus::CommandError,
                Some(format!("exit status {}: {}", code, output.text())),
            ),
            None => (
                ProbeStatus::CommandError,
                Some(format!(
                    "channel closed without exit status: {}",
                    output.text()
                )),
            ),
        },
        Err(err) => {
            let detail = err.partial_output.unwrap_or(err.reason);
            (ProbeStatus::CommandError, Some(detail))
        }
    };

    session.close().await;
    outcome
}
