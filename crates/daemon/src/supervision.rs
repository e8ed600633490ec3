// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Drives the ongoing supervision tick (spec §4.4) after boot: a
//! heartbeat/restart sweep via [`grace_control::KernelHost::supervise_once`],
//! then handing every kernel that exhausted its restart budget to
//! [`grace_immune::EscalationHandler`]. `supervise_once` stops short of
//! quarantining a tier-2+ kernel after escalation decides to — that
//! transition happens here, once the chosen [`RecoveryStrategy`] is known.

use std::sync::Arc;
use std::time::Duration;

use grace_core::{ComponentId, KernelState};
use grace_immune::{DiagnosticInput, RecoveryStrategy};

use crate::context::CoreContext;

/// Default interval between supervision ticks (spec §4.4).
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(5);

/// Run supervision ticks on `interval` until the returned task is aborted.
pub fn spawn(context: Arc<CoreContext>, interval: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            tick_once(&context).await;
        }
    })
}

async fn tick_once(context: &CoreContext) {
    let exhausted = context.host.supervise_once().await;
    for name in exhausted {
        handle_exhausted(context, &name).await;
    }
}

async fn handle_exhausted(context: &CoreContext, name: &ComponentId) {
    let Some(record) = context.host.registry.get(name.as_str()) else { return };
    let fingerprint = record.descriptor.capability_fingerprint();
    let diagnostics = DiagnosticInput {
        last_error: None,
        recent_log_lines: Vec::new(),
        resource_state: serde_json::Value::Null,
        last_known_good_snapshot: None,
    };

    let outcome = context
        .escalation
        .escalate(name.clone(), record.descriptor.tier, fingerprint, diagnostics, None)
        .await;

    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(err) => {
            tracing::error!(%name, %err, "escalation failed to run for exhausted kernel");
            return;
        }
    };

    match &outcome.strategy {
        RecoveryStrategy::Quarantine => {
            if let Err(err) = context.host.registry.transition(name.as_str(), KernelState::Quarantined) {
                tracing::warn!(%name, %err, "could not quarantine kernel after escalation");
            }
            context.host.degraded_mode.disable(name.clone());
        }
        RecoveryStrategy::NoRecoveryAvailable => {
            tracing::error!(%name, "tier-1 kernel exhausted recovery options, core enters safe mode");
        }
        RecoveryStrategy::ReplicaFailover { .. } | RecoveryStrategy::RestoreSnapshotAndRetry { .. } => {
            tracing::warn!(%name, strategy = ?outcome.strategy, "tier-1 recovery strategy chosen, repair handoff recorded");
        }
    }
}

#[cfg(test)]
#[path = "supervision_tests.rs"]
mod tests;
