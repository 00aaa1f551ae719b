//! Vigil Common - Shared types and the fleet poller engine
//!
//! Everything the CLI needs that is not terminal rendering lives here:
//! the fleet data model, the probe transport seam, the concurrent poller,
//! configuration loading, and probe-output parsing.

pub mod config;
pub mod diagnostics;
pub mod fleet;
pub mod poller;
pub mod report;
pub mod ssh;
pub mod transport;

pub use fleet::{Credential, HostDescriptor, ProbeCommand};
pub use poller::{poll, PollError};
pub use report::{FleetReport, HostResult, ProbeStatus};
