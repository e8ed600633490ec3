// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use grace_core::{Anomaly, AnomalyType, ComponentId, FakeClock, Severity};
use grace_mesh::Mesh;

use super::*;
use crate::playbook::{Playbook, RemediationAction};
use crate::trust::{DEFAULT_TRUST, TRUST_DECREMENT, TRUST_INCREMENT};

struct AlwaysSucceed;

#[async_trait::async_trait]
impl crate::remediation::ActionExecutor for AlwaysSucceed {
    async fn execute(&self, _action: RemediationAction, _resource: &ComponentId) -> Result<(), String> {
        Ok(())
    }
}

struct AlwaysFail;

#[async_trait::async_trait]
impl crate::remediation::ActionExecutor for AlwaysFail {
    async fn execute(&self, _action: RemediationAction, _resource: &ComponentId) -> Result<(), String> {
        Err("simulated failure".to_string())
    }
}

fn kernel_with(
    playbooks: Vec<Playbook>,
    executor: Arc<dyn crate::remediation::ActionExecutor>,
) -> ImmuneKernel<FakeClock> {
    let store = Arc::new(grace_journal::InMemoryJournalStore::new());
    let journal = grace_journal::JournalWriter::spawn(store, 64);
    let mesh = Arc::new(Mesh::new(Arc::new(grace_mesh::RouteTable::empty()), grace_mesh::ValidatorRegistry::new()));
    ImmuneKernel::new(Arc::new(PlaybookStore::new(playbooks)), Arc::new(TrustStore::new()), executor, journal, mesh, FakeClock::new())
}

fn anomaly() -> Anomaly {
    Anomaly::new(AnomalyType::Resource, Severity::High, "agent_x", "cpu-detector", 0.8)
}

#[tokio::test]
async fn successful_remediation_raises_trust_score() {
    let kernel = kernel_with(
        vec![Playbook::new("restart-it", AnomalyType::Resource, Severity::Low, "*", vec![RemediationAction::Restart])],
        Arc::new(AlwaysSucceed),
    );

    let response = kernel.ingest(anomaly(), None).await.unwrap();
    assert!(response.remediation.success);
    assert_eq!(response.trust_score_after, DEFAULT_TRUST + TRUST_INCREMENT);
    assert_eq!(kernel.trust().score(&ComponentId::new("agent_x")), response.trust_score_after);
}

#[tokio::test]
async fn failed_remediation_lowers_trust_score() {
    let kernel = kernel_with(
        vec![Playbook::new("restart-it", AnomalyType::Resource, Severity::Low, "*", vec![RemediationAction::Restart])],
        Arc::new(AlwaysFail),
    );

    let response = kernel.ingest(anomaly(), None).await.unwrap();
    assert!(!response.remediation.success);
    assert_eq!(response.trust_score_after, DEFAULT_TRUST - TRUST_DECREMENT);
}

#[tokio::test]
async fn no_matching_playbook_still_journals_the_anomaly() {
    let kernel = kernel_with(Vec::new(), Arc::new(AlwaysSucceed));

    let err = kernel.ingest(anomaly(), None).await.unwrap_err();
    assert!(matches!(err, ImmuneError::NoPlaybookMatched { .. }));
}

#[tokio::test]
async fn correlation_id_is_threaded_through_as_the_remediation_nonce() {
    let kernel = kernel_with(
        vec![Playbook::new("restart-it", AnomalyType::Resource, Severity::Low, "*", vec![RemediationAction::Restart])],
        Arc::new(AlwaysSucceed),
    );
    let correlation_id = grace_core::CorrelationId::new();

    let response = kernel.ingest(anomaly(), Some(correlation_id)).await.unwrap();
    let expected_key = crate::remediation::idempotency_key(
        &ComponentId::new("agent_x"),
        RemediationAction::Restart,
        &correlation_id.to_string(),
    );
    assert_eq!(response.remediation.attempts[0].idempotency_key, expected_key);
}

#[test]
fn severity_priority_maps_critical_to_critical_priority() {
    assert_eq!(severity_priority(Severity::Critical), grace_core::Priority::Critical);
    assert_eq!(severity_priority(Severity::High), grace_core::Priority::High);
    assert_eq!(severity_priority(Severity::Medium), grace_core::Priority::Normal);
    assert_eq!(severity_priority(Severity::Low), grace_core::Priority::Low);
}
