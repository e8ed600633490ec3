// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Executes a playbook's actions in order, each under its own deadline and
//! idempotency key, journalling every attempt (spec §4.7: "Execute actions
//! with per-action deadlines and idempotency keys; each action is
//! journalled").
//!
//! What an action actually *does* (restart a kernel, scale a pool, rotate
//! a credential...) is outside this crate's concern — [`ActionExecutor`]
//! is the seam the daemon wires to the control plane and other
//! collaborators, the same way `grace-governance`'s `VoterPool` and
//! `SignatureVerifier` stay pluggable.

use std::time::Duration;

use async_trait::async_trait;
use grace_core::ComponentId;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::playbook::{Playbook, RemediationAction};

/// Default per-action deadline (spec §4.7 "per-action deadlines").
pub const DEFAULT_ACTION_DEADLINE: Duration = Duration::from_secs(5);

/// Derives a stable idempotency key for one `(resource, action, nonce)`
/// triple, so retried delivery of the same anomaly doesn't double-apply a
/// remediation action.
pub fn idempotency_key(resource: &ComponentId, action: RemediationAction, nonce: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(resource.as_str().as_bytes());
    hasher.update([0u8]);
    hasher.update(action.as_str().as_bytes());
    hasher.update([0u8]);
    hasher.update(nonce.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Outcome of a single action attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionOutcome {
    Succeeded,
    Failed,
    TimedOut,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionAttempt {
    pub action: RemediationAction,
    pub idempotency_key: String,
    pub outcome: ActionOutcome,
    pub detail: String,
}

/// Full result of running one playbook against one resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemediationOutcome {
    pub playbook_name: String,
    pub resource: ComponentId,
    pub attempts: Vec<ActionAttempt>,
    pub success: bool,
}

/// What a remediation action actually does. Implementations live with
/// whatever collaborator can carry them out (the control plane for
/// restart/quarantine, a credential broker for rotate-credential, etc.).
#[async_trait]
pub trait ActionExecutor: Send + Sync {
    async fn execute(&self, action: RemediationAction, resource: &ComponentId) -> Result<(), String>;
}

/// Runs every action in `playbook.actions`, in order, against `resource`,
/// under `deadline` each. Does not abort early on a failed action — later
/// actions in a playbook (e.g. `notify-parliament` after a failed
/// `restart`) are expected to run regardless, since they often exist
/// precisely to handle the earlier action's failure.
pub async fn run(
    playbook: &Playbook,
    resource: ComponentId,
    nonce: &str,
    executor: &dyn ActionExecutor,
    deadline: Duration,
) -> RemediationOutcome {
    let mut attempts = Vec::with_capacity(playbook.actions.len());
    let mut success = true;

    for action in &playbook.actions {
        let key = idempotency_key(&resource, *action, nonce);
        let attempt = match tokio::time::timeout(deadline, executor.execute(*action, &resource)).await {
            Ok(Ok(())) => ActionAttempt {
                action: *action,
                idempotency_key: key,
                outcome: ActionOutcome::Succeeded,
                detail: "completed".to_string(),
            },
            Ok(Err(reason)) => {
                success = false;
                ActionAttempt { action: *action, idempotency_key: key, outcome: ActionOutcome::Failed, detail: reason }
            }
            Err(_) => {
                success = false;
                ActionAttempt {
                    action: *action,
                    idempotency_key: key,
                    outcome: ActionOutcome::TimedOut,
                    detail: format!("missed {:?} deadline", deadline),
                }
            }
        };
        attempts.push(attempt);
    }

    RemediationOutcome { playbook_name: playbook.name.clone(), resource, attempts, success }
}

#[cfg(test)]
#[path = "remediation_tests.rs"]
mod tests;
