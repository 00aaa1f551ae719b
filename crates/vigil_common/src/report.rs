//! Poll outcomes - per-host results and the aggregated fleet report

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use uuid::Uuid;

/// Outcome category for one probed host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeStatus {
    /// Session established, command ran, exit status 0
    Success,
    /// Remote host rejected the shared credential
    AuthFailure,
    /// Network unreachable, refused, resolution failure, or handshake error
    ConnectFailure,
    /// Per-host budget elapsed before connect+exec completed
    Timeout,
    /// Session established but the command failed or returned abnormally
    CommandError,
}

impl ProbeStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, ProbeStatus::Success)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProbeStatus::Success => "OK",
            ProbeStatus::AuthFailure => "AUTH FAILED",
            ProbeStatus::ConnectFailure => "UNREACHABLE",
            ProbeStatus::Timeout => "TIMEOUT",
            ProbeStatus::CommandError => "COMMAND ERROR",
        }
    }
}

/// Outcome of probing one host. Created exactly once per host per run,
/// immutable afterwards, owned by the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostResult {
    /// Back-reference to HostDescriptor.id
    pub host_id: String,
    pub status: ProbeStatus,
    /// Captured text: probe output on Success, partial output or error
    /// detail on CommandError/ConnectFailure, None on Timeout
    pub output: Option<String>,
    /// Elapsed from connection attempt to completion or failure
    pub latency: Duration,
}

impl HostResult {
    pub fn new(
        host_id: impl Into<String>,
        status: ProbeStatus,
        output: Option<String>,
        latency: Duration,
    ) -> Self {
        Self {
            host_id: host_id.into(),
            status,
            output,
            latency,
        }
    }
}

/// Aggregate of one poll run: exactly one entry per requested host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    /// Keyed by HostDescriptor.id; the poller never drops a host
    pub results: HashMap<String, HostResult>,
}

impl FleetReport {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn healthy_count(&self) -> usize {
        self.results
            .values()
            .filter(|r| r.status.is_healthy())
            .count()
    }

    pub fn unhealthy_count(&self) -> usize {
        self.len() - self.healthy_count()
    }

    pub fn all_healthy(&self) -> bool {
        self.unhealthy_count() == 0
    }

    /// Wall-clock duration of the whole run.
    pub fn elapsed(&self) -> Duration {
        (self.completed_at - self.started_at)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }

    /// Results sorted by host id, for stable display. Ordering is a
    /// rendering concern; the mapping itself is unordered.
    pub fn sorted_results(&self) -> Vec<&HostResult> {
        let mut results: Vec<&HostResult> = self.results.values().collect();
        results.sort_by(|a, b| a.host_id.cmp(&b.host_id));
        results
    }
}
