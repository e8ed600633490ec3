// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;
use std::time::Duration;

use grace_core::{KernelDescriptor, KernelState, Tier};

use super::*;
use crate::fixtures::{test_context, FakeKernel};

#[tokio::test]
async fn boots_tier1_then_tier2_and_reports_all_ready() {
    let registry = KernelRegistry::new();
    let ctx = test_context();

    let journal = FakeKernel::new(KernelDescriptor::new("journal", Tier(1)));
    let mesh = FakeKernel::new(KernelDescriptor::new("mesh", Tier(1)));
    let agent = FakeKernel::new(KernelDescriptor::new("agent_x", Tier(2)));

    let fleet: Vec<Arc<dyn Kernel>> = vec![journal, mesh, agent];
    let report = run_boot(&registry, &ctx, fleet, DEFAULT_TIER1_MAX_RESTARTS, Duration::from_secs(5))
        .await
        .unwrap();

    assert_eq!(report.ready.len(), 3);
    assert!(report.failed.is_empty());
    assert_eq!(registry.get("journal").unwrap().state, KernelState::Ready);
    assert_eq!(registry.get("agent_x").unwrap().state, KernelState::Ready);
}

#[tokio::test]
async fn tier1_failure_aborts_boot() {
    let registry = KernelRegistry::new();
    let ctx = test_context();

    let journal = FakeKernel::new(KernelDescriptor::new("journal", Tier(1))).fail_initialise(10);
    let fleet: Vec<Arc<dyn Kernel>> = vec![journal];

    let err = run_boot(&registry, &ctx, fleet, 2, Duration::from_secs(5)).await.unwrap_err();
    assert!(matches!(err, ControlError::Tier1BootFailure(_)));
    assert_eq!(registry.get("journal").unwrap().state, KernelState::Failed);
}

#[tokio::test]
async fn tier1_retries_within_budget_then_succeeds() {
    let registry = KernelRegistry::new();
    let ctx = test_context();

    let journal = FakeKernel::new(KernelDescriptor::new("journal", Tier(1))).fail_initialise(2);
    let fleet: Vec<Arc<dyn Kernel>> = vec![journal];

    let report = run_boot(&registry, &ctx, fleet, 3, Duration::from_secs(5)).await.unwrap();
    assert_eq!(report.ready, vec![grace_core::ComponentId::new("journal")]);
}

#[tokio::test]
async fn tier2_failure_does_not_abort_boot() {
    let registry = KernelRegistry::new();
    let ctx = test_context();

    let journal = FakeKernel::new(KernelDescriptor::new("journal", Tier(1)));
    let broken_agent = FakeKernel::new(KernelDescriptor::new("broken", Tier(2))).fail_initialise(99);
    let fleet: Vec<Arc<dyn Kernel>> = vec![journal, broken_agent];

    let report = run_boot(&registry, &ctx, fleet, 3, Duration::from_secs(5)).await.unwrap();
    assert_eq!(report.ready, vec![grace_core::ComponentId::new("journal")]);
    assert_eq!(report.failed, vec![grace_core::ComponentId::new("broken")]);
}
