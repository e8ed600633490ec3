// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use grace_core::{Fault, FaultKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MeshError {
    #[error("route manifest at {path} is invalid: {detail}")]
    InvalidManifest { path: String, detail: String },
    #[error("no route matches source '{source}' event type '{event_type}'")]
    NoRoute { source: String, event_type: String },
    #[error("target '{0}' has no registered subscriber")]
    UnknownTarget(String),
    #[error("validator '{0}' rejected the event: {1}")]
    ValidatorRejected(String, String),
    #[error("dispatch queue for '{target}' is full")]
    TargetBusy { target: String },
    #[error("mesh is shutting down")]
    ShuttingDown,
}

impl From<&MeshError> for Fault {
    fn from(err: &MeshError) -> Self {
        match err {
            MeshError::InvalidManifest { .. } => {
                Fault::new(FaultKind::Integrity, "mesh.invalid_manifest", err.to_string())
            }
            MeshError::NoRoute { .. } | MeshError::UnknownTarget(_) => {
                Fault::new(FaultKind::Programmer, "mesh.no_route", err.to_string())
            }
            MeshError::ValidatorRejected(..) => Fault::policy("mesh.validator_rejected", err.to_string()),
            MeshError::TargetBusy { .. } => Fault::transient("mesh.target_busy", err.to_string()),
            MeshError::ShuttingDown => Fault::transient("mesh.shutting_down", err.to_string()),
        }
    }
}

impl From<MeshError> for Fault {
    fn from(err: MeshError) -> Self {
        Fault::from(&err)
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
