// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remediation playbooks: named, ordered action sequences selected by
//! `(anomaly_type, severity, resource_pattern)` (spec §4.7, glossary
//! "Playbook"). Stored as versioned, read-mostly data through the same
//! copy-on-write generation shape as the governance policy store (spec §5:
//! "Policy, rule, and playbook stores: read-mostly with copy-on-write
//! generations").

use std::sync::Arc;

use grace_core::{Anomaly, AnomalyType, Pattern, Severity};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Fixed remediation action vocabulary (spec §4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RemediationAction {
    Restart,
    Scale,
    Rollback,
    OpenCircuitBreaker,
    Quarantine,
    RotateCredential,
    NotifyParliament,
}

impl RemediationAction {
    pub fn as_str(self) -> &'static str {
        match self {
            RemediationAction::Restart => "restart",
            RemediationAction::Scale => "scale",
            RemediationAction::Rollback => "rollback",
            RemediationAction::OpenCircuitBreaker => "open-circuit-breaker",
            RemediationAction::Quarantine => "quarantine",
            RemediationAction::RotateCredential => "rotate-credential",
            RemediationAction::NotifyParliament => "notify-parliament",
        }
    }
}

/// A named, ordered remediation sequence (spec §4.7).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playbook {
    pub name: String,
    pub anomaly_type: AnomalyType,
    pub min_severity: Severity,
    pub resource_pattern: Pattern,
    pub actions: Vec<RemediationAction>,
}

impl Playbook {
    pub fn new(
        name: impl Into<String>,
        anomaly_type: AnomalyType,
        min_severity: Severity,
        resource_pattern: impl Into<Pattern>,
        actions: Vec<RemediationAction>,
    ) -> Self {
        Self { name: name.into(), anomaly_type, min_severity, resource_pattern: resource_pattern.into(), actions }
    }

    fn matches(&self, anomaly: &Anomaly) -> bool {
        self.anomaly_type == anomaly.anomaly_type
            && anomaly.severity >= self.min_severity
            && self.resource_pattern.matches(anomaly.affected_resource.as_str())
    }
}

struct PlaybookGeneration {
    version: u64,
    playbooks: Vec<Playbook>,
}

/// Holds the live generation of registered playbooks. Matching is a linear
/// scan in declaration order, same as the mesh's route table before
/// compilation — the playbook catalogue is expected to stay small (tens,
/// not thousands, of entries).
pub struct PlaybookStore {
    current: RwLock<Arc<PlaybookGeneration>>,
}

impl PlaybookStore {
    pub fn new(playbooks: Vec<Playbook>) -> Self {
        Self { current: RwLock::new(Arc::new(PlaybookGeneration { version: 1, playbooks })) }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn version(&self) -> u64 {
        self.current.read().version
    }

    /// Register (or replace, by name) a playbook, bumping the generation.
    /// Used both for operator-curated playbooks loaded at boot and for
    /// playbooks synthesized from a confirmed fix (spec §4.7 step 5).
    pub fn register(&self, playbook: Playbook) {
        let mut generation = (**self.current.read()).clone_data();
        generation.playbooks.retain(|p| p.name != playbook.name);
        generation.playbooks.push(playbook);
        generation.version += 1;
        *self.current.write() = Arc::new(generation);
    }

    /// First playbook matching `(anomaly_type, severity >= min_severity,
    /// resource_pattern)`, in declaration order (spec §4.7 "Select a
    /// remediation playbook by matching...").
    pub fn select(&self, anomaly: &Anomaly) -> Option<Playbook> {
        self.current.read().playbooks.iter().find(|p| p.matches(anomaly)).cloned()
    }
}

impl PlaybookGeneration {
    fn clone_data(&self) -> PlaybookGeneration {
        PlaybookGeneration { version: self.version, playbooks: self.playbooks.clone() }
    }
}

#[cfg(test)]
#[path = "playbook_tests.rs"]
mod tests;
