// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Top-level daemon error, mapped to the stable exit codes in spec §6.

use grace_core::{Fault, FaultKind};
use thiserror::Error;

use crate::env::EnvError;

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("configuration error: {0}")]
    Config(#[from] EnvError),
    #[error("boot did not complete within the configured timeout")]
    BootTimeout,
    #[error("tier-1 kernel failed during boot: {0}")]
    Tier1Failure(String),
    #[error("journal is corrupt at startup: {0}")]
    JournalCorrupt(String),
    #[error("route manifest is invalid: {0}")]
    RouteManifestInvalid(String),
    #[error("unrecoverable panic: {0}")]
    UnrecoverablePanic(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<grace_journal::JournalError> for DaemonError {
    fn from(err: grace_journal::JournalError) -> Self {
        DaemonError::JournalCorrupt(err.to_string())
    }
}

impl From<grace_mesh::MeshError> for DaemonError {
    fn from(err: grace_mesh::MeshError) -> Self {
        DaemonError::RouteManifestInvalid(err.to_string())
    }
}

impl From<grace_control::ControlError> for DaemonError {
    fn from(err: grace_control::ControlError) -> Self {
        match err {
            grace_control::ControlError::BootTimeout(_) => DaemonError::BootTimeout,
            grace_control::ControlError::Tier1BootFailure(name) => DaemonError::Tier1Failure(name),
            other => DaemonError::UnrecoverablePanic(other.to_string()),
        }
    }
}

/// Used by the administrative surface (spec §7): every failed request gets
/// a `{reason_code, reason_text}` pair rather than a bare error string.
impl From<&DaemonError> for Fault {
    fn from(err: &DaemonError) -> Self {
        match err {
            DaemonError::Config(_) => Fault::new(FaultKind::Programmer, "daemon.config_invalid", err.to_string()),
            DaemonError::BootTimeout => Fault::integrity("daemon.boot_timeout", err.to_string()),
            DaemonError::Tier1Failure(_) => Fault::integrity("daemon.tier1_failure", err.to_string()),
            DaemonError::JournalCorrupt(_) => Fault::integrity("daemon.journal_corrupt", err.to_string()),
            DaemonError::RouteManifestInvalid(_) => {
                Fault::new(FaultKind::Programmer, "daemon.route_manifest_invalid", err.to_string())
            }
            DaemonError::UnrecoverablePanic(_) => Fault::integrity("daemon.unrecoverable", err.to_string()),
            DaemonError::Io(_) => Fault::operational("daemon.io_error", err.to_string()),
        }
    }
}

impl From<DaemonError> for Fault {
    fn from(err: DaemonError) -> Self {
        Fault::from(&err)
    }
}

impl DaemonError {
    /// Stable exit code (spec §6 "Exit codes"). 0 is reserved for a clean
    /// shutdown and is never produced by an error path.
    pub fn exit_code(&self) -> i32 {
        match self {
            DaemonError::BootTimeout => 10,
            DaemonError::Tier1Failure(_) => 20,
            DaemonError::JournalCorrupt(_) => 30,
            DaemonError::RouteManifestInvalid(_) => 40,
            DaemonError::UnrecoverablePanic(_) => 50,
            DaemonError::Config(_) | DaemonError::Io(_) => 50,
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
