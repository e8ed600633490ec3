// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;
use std::time::Duration;

use grace_core::{ComponentId, FakeClock, Tier};
use grace_mesh::Mesh;

use super::*;

fn handler() -> EscalationHandler<FakeClock> {
    let store = Arc::new(grace_journal::InMemoryJournalStore::new());
    let journal = grace_journal::JournalWriter::spawn(store, 64);
    let mesh = Arc::new(Mesh::new(Arc::new(grace_mesh::RouteTable::empty()), grace_mesh::ValidatorRegistry::new()));
    EscalationHandler::new(journal, mesh, Arc::new(PlaybookStore::empty()), FakeClock::new())
        .with_cooldown_window(Duration::from_millis(500))
}

fn diagnostics(snapshot: Option<&str>) -> DiagnosticInput {
    DiagnosticInput {
        last_error: Some("panic in handle()".to_string()),
        recent_log_lines: vec!["line1".to_string(), "line2".to_string()],
        resource_state: serde_json::json!({ "cpu_pct": 97 }),
        last_known_good_snapshot: snapshot.map(|s| s.to_string()),
    }
}

#[tokio::test]
async fn tier1_with_replica_fails_over() {
    let handler = handler();
    let outcome = handler
        .escalate(
            ComponentId::new("journal"),
            Tier::CRITICAL,
            "fp-journal".to_string(),
            diagnostics(None),
            Some(ComponentId::new("journal-replica")),
        )
        .await
        .unwrap();

    assert!(matches!(outcome.strategy, RecoveryStrategy::ReplicaFailover { .. }));
}

#[tokio::test]
async fn tier1_without_replica_restores_snapshot() {
    let handler = handler();
    let outcome = handler
        .escalate(ComponentId::new("mesh"), Tier::CRITICAL, "fp-mesh".to_string(), diagnostics(Some("snap-1")), None)
        .await
        .unwrap();

    assert!(matches!(outcome.strategy, RecoveryStrategy::RestoreSnapshotAndRetry { .. }));
}

#[tokio::test]
async fn tier1_with_nothing_available_has_no_recovery() {
    let handler = handler();
    let outcome = handler
        .escalate(ComponentId::new("control"), Tier::CRITICAL, "fp-control".to_string(), diagnostics(None), None)
        .await
        .unwrap();

    assert!(matches!(outcome.strategy, RecoveryStrategy::NoRecoveryAvailable));
}

#[tokio::test]
async fn tier2_kernel_is_quarantined() {
    let handler = handler();
    let outcome = handler
        .escalate(ComponentId::new("agent_x"), Tier(2), "fp-agent-x".to_string(), diagnostics(None), None)
        .await
        .unwrap();

    assert!(matches!(outcome.strategy, RecoveryStrategy::Quarantine));
}

#[tokio::test]
async fn escalation_starts_a_cooldown_rejecting_same_fingerprint() {
    let handler = handler();
    handler
        .escalate(ComponentId::new("agent_x"), Tier(2), "fp-agent-x".to_string(), diagnostics(None), None)
        .await
        .unwrap();

    let err = handler.check_registration("agent_x_v2", "fp-agent-x").unwrap_err();
    assert!(matches!(err, ImmuneError::CooldownViolation { .. }));

    // A different fingerprint is unaffected.
    assert!(handler.check_registration("agent_y", "fp-agent-y").is_ok());
}

#[tokio::test]
async fn diagnostic_bundle_and_repair_task_are_journalled() {
    let handler = handler();
    let outcome = handler
        .escalate(ComponentId::new("agent_x"), Tier(2), "fp-agent-x".to_string(), diagnostics(None), None)
        .await
        .unwrap();

    assert!(!outcome.repair_task_id.is_empty());
    assert!(outcome.repair_task_id.contains("agent_x"));
}

#[test]
fn register_confirmed_fix_adds_a_selectable_playbook() {
    let handler = handler();
    handler.register_confirmed_fix(Playbook::new(
        "confirmed-fix-agent-x",
        grace_core::AnomalyType::Behavioural,
        grace_core::Severity::High,
        "agent_x",
        vec![crate::playbook::RemediationAction::Restart],
    ));

    let anomaly = grace_core::Anomaly::new(
        grace_core::AnomalyType::Behavioural,
        grace_core::Severity::High,
        "agent_x",
        "detector",
        0.9,
    );
    assert!(handler.playbooks().select(&anomaly).is_some());
}
