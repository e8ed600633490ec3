// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use grace_core::{Fault, FaultKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImmuneError {
    #[error("no playbook matched anomaly ({anomaly_type:?}, {severity:?}) on '{resource}'")]
    NoPlaybookMatched { anomaly_type: String, severity: String, resource: String },
    #[error("remediation action '{action}' on '{resource}' missed its deadline")]
    ActionTimeout { action: String, resource: String },
    #[error("kernel '{0}' is within its post-escalation cooldown window")]
    CooldownActive(String),
    #[error("kernel '{name}' re-registered within cooldown under fingerprint {fingerprint}")]
    CooldownViolation { name: String, fingerprint: String },
    #[error("journalling immune-kernel activity failed: {0}")]
    JournalFailed(#[from] grace_journal::JournalError),
}

impl From<&ImmuneError> for Fault {
    fn from(err: &ImmuneError) -> Self {
        match err {
            ImmuneError::NoPlaybookMatched { .. } => {
                Fault::new(FaultKind::Operational, "immune.no_playbook", err.to_string())
            }
            ImmuneError::ActionTimeout { .. } => Fault::transient("immune.action_timeout", err.to_string()),
            ImmuneError::CooldownActive(_) => Fault::policy("immune.cooldown_active", err.to_string()),
            ImmuneError::CooldownViolation { .. } => {
                Fault::new(FaultKind::Programmer, "immune.cooldown_violation", err.to_string())
            }
            ImmuneError::JournalFailed(inner) => inner.into(),
        }
    }
}

impl From<ImmuneError> for Fault {
    fn from(err: ImmuneError) -> Self {
        Fault::from(&err)
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
