// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Kernel-failure escalation (spec §4.7, fired by `kernel.restart.exhausted`):
//! halt retries, capture diagnostics, choose a tier-appropriate recovery
//! strategy, hand off to a repair agent, and enforce the post-escalation
//! cooldown.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use grace_core::{Clock, ComponentId, Event, Priority, Tier, Timestamp};
use grace_journal::JournalWriter;
use grace_mesh::Mesh;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::ImmuneError;
use crate::playbook::{Playbook, PlaybookStore};

const ESCALATION_SOURCE: &str = "immune.escalation";
/// Default cooldown window after an escalation (spec §4.7 "Cooldown").
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(600);

/// Caller-supplied inputs for the diagnostics bundle — the immune crate
/// has no access to log storage or resource metrics of its own; the
/// daemon gathers these from the control plane and other collaborators
/// before calling [`EscalationHandler::escalate`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticInput {
    pub last_error: Option<String>,
    pub recent_log_lines: Vec<String>,
    pub resource_state: serde_json::Value,
    pub last_known_good_snapshot: Option<String>,
}

/// The bundle written to the journal (spec §4.7 step 2).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticBundle {
    pub kernel: ComponentId,
    pub tier: Tier,
    pub last_error: Option<String>,
    pub recent_log_lines: Vec<String>,
    pub resource_state: serde_json::Value,
    pub last_known_good_snapshot: Option<String>,
}

/// Which recovery path was chosen, by tier (spec §4.7 step 3).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecoveryStrategy {
    /// Tier-1 with an available replica: fail over to it.
    ReplicaFailover { replica: ComponentId },
    /// Tier-1 with no replica: restore from last-known-good snapshot and
    /// retry once under a fresh restart budget.
    RestoreSnapshotAndRetry { snapshot_ref: String },
    /// Tier-2+: move to `quarantined`, enable degraded mode for the
    /// affected capabilities.
    Quarantine,
    /// Tier-1 with neither a replica nor a snapshot: nothing left to try
    /// automatically; the system enters safe mode (spec §4.4).
    NoRecoveryAvailable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscalationOutcome {
    pub kernel: ComponentId,
    pub strategy: RecoveryStrategy,
    /// Journal sequence where the diagnostic bundle was recorded.
    pub diagnostic_sequence: u64,
    pub repair_task_id: String,
}

/// Runs the escalation workflow and tracks per-fingerprint cooldowns.
pub struct EscalationHandler<C: Clock> {
    journal: JournalWriter,
    mesh: Arc<Mesh>,
    playbooks: Arc<PlaybookStore>,
    cooldowns: RwLock<HashMap<String, u64>>,
    cooldown_window: Duration,
    clock: C,
    origin: Instant,
}

impl<C: Clock> EscalationHandler<C> {
    pub fn new(journal: JournalWriter, mesh: Arc<Mesh>, playbooks: Arc<PlaybookStore>, clock: C) -> Self {
        Self {
            journal,
            mesh,
            playbooks,
            cooldowns: RwLock::new(HashMap::new()),
            cooldown_window: DEFAULT_COOLDOWN,
            origin: Instant::now(),
            clock,
        }
    }

    pub fn with_cooldown_window(mut self, window: Duration) -> Self {
        self.cooldown_window = window;
        self
    }

    pub fn playbooks(&self) -> &Arc<PlaybookStore> {
        &self.playbooks
    }

    /// Run the full workflow for a kernel that just exhausted its restart
    /// budget. `replica` is the name of a healthy standby for a tier-1
    /// kernel, if one exists.
    pub async fn escalate(
        &self,
        kernel: ComponentId,
        tier: Tier,
        capability_fingerprint: String,
        diagnostics: DiagnosticInput,
        replica: Option<ComponentId>,
    ) -> Result<EscalationOutcome, ImmuneError> {
        // Step 1: halt retries. The control plane has already stopped
        // scheduling restarts by the time `kernel.restart.exhausted` fires
        // (grace-control's supervision loop never retries past the budget);
        // this call starting is itself the "halt" acknowledgement.

        // Step 2: capture diagnostics.
        let bundle = DiagnosticBundle {
            kernel: kernel.clone(),
            tier,
            last_error: diagnostics.last_error,
            recent_log_lines: diagnostics.recent_log_lines,
            resource_state: diagnostics.resource_state,
            last_known_good_snapshot: diagnostics.last_known_good_snapshot.clone(),
        };
        let bundle_payload = serde_json::to_value(&bundle).unwrap_or(serde_json::Value::Null);
        let bundle_event = self.build_event("immune.diagnostic.captured", bundle_payload, Priority::High);
        let bundle_entry = self.journal.submit(bundle_event.clone()).await?;
        let _ = self.mesh.publish(bundle_event).await;

        // Step 3: choose recovery strategy by tier.
        let strategy = if tier.is_critical() {
            match (replica, diagnostics.last_known_good_snapshot) {
                (Some(replica), _) => RecoveryStrategy::ReplicaFailover { replica },
                (None, Some(snapshot_ref)) => RecoveryStrategy::RestoreSnapshotAndRetry { snapshot_ref },
                (None, None) => RecoveryStrategy::NoRecoveryAvailable,
            }
        } else {
            RecoveryStrategy::Quarantine
        };

        // Step 4: hand off for repair.
        let repair_task_id = format!("repair-{}-{}", kernel.as_str(), bundle_entry.sequence);
        let repair_payload = serde_json::json!({
            "repair_task_id": repair_task_id,
            "kernel": kernel.as_str(),
            "tier": tier.0,
            "strategy": strategy,
            "diagnostic_sequence": bundle_entry.sequence,
        });
        let repair_event = self.build_event("repair.task.created", repair_payload, Priority::High);
        self.journal.submit(repair_event.clone()).await?;
        let _ = self.mesh.publish(repair_event).await;

        // Cooldown: this kernel (by capability fingerprint) cannot be
        // retried until the window elapses.
        let cooldown_until = self.clock.epoch_ms() + self.cooldown_window.as_millis() as u64;
        self.cooldowns.write().insert(capability_fingerprint, cooldown_until);

        tracing::warn!(%kernel, ?strategy, "kernel escalated to failure handler");

        Ok(EscalationOutcome {
            kernel,
            strategy,
            diagnostic_sequence: bundle_entry.sequence,
            repair_task_id,
        })
    }

    /// Reject a registration whose capability fingerprint is still within
    /// an active cooldown (spec §4.7 "violating this by re-registering
    /// under a new name is detectable via stable capability fingerprints
    /// and is rejected").
    pub fn check_registration(&self, name: &str, capability_fingerprint: &str) -> Result<(), ImmuneError> {
        let now = self.clock.epoch_ms();
        let cooldowns = self.cooldowns.read();
        match cooldowns.get(capability_fingerprint) {
            Some(until) if *until > now => Err(ImmuneError::CooldownViolation {
                name: name.to_string(),
                fingerprint: capability_fingerprint.to_string(),
            }),
            _ => Ok(()),
        }
    }

    /// Step 5: on a confirmed fix, synthesize a playbook from its steps and
    /// register it, so the same failure no longer reaches escalation.
    pub fn register_confirmed_fix(&self, playbook: Playbook) {
        tracing::info!(playbook = %playbook.name, "registering playbook synthesized from confirmed fix");
        self.playbooks.register(playbook);
    }

    fn build_event(&self, event_type: &str, payload: serde_json::Value, priority: Priority) -> Event {
        Event::new(event_type, ESCALATION_SOURCE, Timestamp::capture(&self.clock, self.origin), priority, payload)
    }
}

#[cfg(test)]
#[path = "escalation_tests.rs"]
mod tests;
