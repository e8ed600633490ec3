// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use grace_core::{Anomaly, AnomalyType, Severity};

use super::*;

fn anomaly(anomaly_type: AnomalyType, severity: Severity, resource: &str) -> Anomaly {
    Anomaly::new(anomaly_type, severity, resource, "test-detector", 0.9)
}

#[test]
fn selects_first_matching_playbook_in_declaration_order() {
    let store = PlaybookStore::new(vec![
        Playbook::new(
            "restart-agents",
            AnomalyType::Performance,
            Severity::Medium,
            "agent_*",
            vec![RemediationAction::Restart],
        ),
        Playbook::new(
            "restart-anything",
            AnomalyType::Performance,
            Severity::Medium,
            "*",
            vec![RemediationAction::Scale],
        ),
    ]);

    let matched = store.select(&anomaly(AnomalyType::Performance, Severity::High, "agent_x")).unwrap();
    assert_eq!(matched.name, "restart-agents");
}

#[test]
fn severity_below_floor_does_not_match() {
    let store = PlaybookStore::new(vec![Playbook::new(
        "critical-only",
        AnomalyType::Security,
        Severity::Critical,
        "*",
        vec![RemediationAction::Quarantine],
    )]);

    assert!(store.select(&anomaly(AnomalyType::Security, Severity::High, "svc")).is_none());
    assert!(store.select(&anomaly(AnomalyType::Security, Severity::Critical, "svc")).is_some());
}

#[test]
fn wrong_anomaly_type_does_not_match() {
    let store = PlaybookStore::new(vec![Playbook::new(
        "resource-only",
        AnomalyType::Resource,
        Severity::Low,
        "*",
        vec![RemediationAction::Scale],
    )]);

    assert!(store.select(&anomaly(AnomalyType::Behavioural, Severity::Critical, "svc")).is_none());
}

#[test]
fn register_replaces_by_name_and_bumps_generation() {
    let store = PlaybookStore::new(vec![Playbook::new(
        "p1",
        AnomalyType::System,
        Severity::Low,
        "*",
        vec![RemediationAction::Restart],
    )]);
    assert_eq!(store.version(), 1);

    store.register(Playbook::new(
        "p1",
        AnomalyType::System,
        Severity::Low,
        "*",
        vec![RemediationAction::Scale, RemediationAction::NotifyParliament],
    ));

    assert_eq!(store.version(), 2);
    let matched = store.select(&anomaly(AnomalyType::System, Severity::Low, "svc")).unwrap();
    assert_eq!(matched.actions, vec![RemediationAction::Scale, RemediationAction::NotifyParliament]);
}

#[test]
fn empty_store_matches_nothing() {
    let store = PlaybookStore::empty();
    assert!(store.select(&anomaly(AnomalyType::Performance, Severity::Critical, "svc")).is_none());
}
