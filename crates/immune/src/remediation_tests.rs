// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use grace_core::{AnomalyType, ComponentId, Severity};

use super::*;

struct AlwaysSucceed;

#[async_trait::async_trait]
impl ActionExecutor for AlwaysSucceed {
    async fn execute(&self, _action: RemediationAction, _resource: &ComponentId) -> Result<(), String> {
        Ok(())
    }
}

struct AlwaysFail;

#[async_trait::async_trait]
impl ActionExecutor for AlwaysFail {
    async fn execute(&self, _action: RemediationAction, _resource: &ComponentId) -> Result<(), String> {
        Err("simulated failure".to_string())
    }
}

struct NeverReturns;

#[async_trait::async_trait]
impl ActionExecutor for NeverReturns {
    async fn execute(&self, _action: RemediationAction, _resource: &ComponentId) -> Result<(), String> {
        std::future::pending::<()>().await;
        unreachable!()
    }
}

struct CountingExecutor(AtomicUsize);

#[async_trait::async_trait]
impl ActionExecutor for CountingExecutor {
    async fn execute(&self, _action: RemediationAction, _resource: &ComponentId) -> Result<(), String> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn playbook(actions: Vec<RemediationAction>) -> Playbook {
    Playbook::new("test", AnomalyType::Performance, Severity::Low, "*", actions)
}

#[tokio::test]
async fn all_actions_succeed() {
    let pb = playbook(vec![RemediationAction::Restart, RemediationAction::NotifyParliament]);
    let outcome =
        run(&pb, ComponentId::new("agent_x"), "nonce-1", &AlwaysSucceed, Duration::from_millis(100)).await;

    assert!(outcome.success);
    assert_eq!(outcome.attempts.len(), 2);
    assert!(outcome.attempts.iter().all(|a| a.outcome == ActionOutcome::Succeeded));
}

#[tokio::test]
async fn later_actions_still_run_after_an_earlier_failure() {
    let pb = playbook(vec![RemediationAction::Restart, RemediationAction::NotifyParliament]);
    let executor = CountingExecutor(AtomicUsize::new(0));
    // AlwaysFail used first to assert overall failure, then confirm via
    // a counting executor that both actions were attempted.
    let outcome = run(&pb, ComponentId::new("agent_x"), "nonce-1", &AlwaysFail, Duration::from_millis(100)).await;
    assert!(!outcome.success);
    assert_eq!(outcome.attempts.len(), 2);

    run(&pb, ComponentId::new("agent_x"), "nonce-1", &executor, Duration::from_millis(100)).await;
    assert_eq!(executor.0.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn action_exceeding_deadline_is_recorded_as_timed_out() {
    let pb = playbook(vec![RemediationAction::Restart]);
    let outcome =
        run(&pb, ComponentId::new("agent_x"), "nonce-1", &NeverReturns, Duration::from_millis(10)).await;

    assert!(!outcome.success);
    assert_eq!(outcome.attempts[0].outcome, ActionOutcome::TimedOut);
}

#[test]
fn idempotency_key_is_stable_for_same_inputs() {
    let resource = ComponentId::new("agent_x");
    let a = idempotency_key(&resource, RemediationAction::Restart, "anomaly-1");
    let b = idempotency_key(&resource, RemediationAction::Restart, "anomaly-1");
    let c = idempotency_key(&resource, RemediationAction::Restart, "anomaly-2");
    assert_eq!(a, b);
    assert_ne!(a, c);
}
