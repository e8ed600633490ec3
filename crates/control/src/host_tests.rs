// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use grace_core::{Budgets, FakeClock, KernelDescriptor, KernelState, Tier};

use super::*;
use crate::fixtures::{test_context, FakeKernel};

#[tokio::test]
async fn register_start_list_round_trip() {
    let host = KernelHost::new(test_context(), FakeClock::new());
    let kernel = FakeKernel::new(KernelDescriptor::new("agent_x", Tier(2)));
    host.register(kernel, false).unwrap();
    host.start("agent_x").await.unwrap();

    let records = host.list();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].state, KernelState::Ready);
}

#[tokio::test]
async fn stop_calls_drain() {
    let host = KernelHost::new(test_context(), FakeClock::new());
    let kernel = FakeKernel::new(KernelDescriptor::new("agent_x", Tier(2)));
    host.register(kernel.clone(), false).unwrap();
    host.start("agent_x").await.unwrap();
    host.stop("agent_x").await.unwrap();
    assert_eq!(kernel.drain_calls.load(std::sync::atomic::Ordering::SeqCst), 1);
}

#[tokio::test]
async fn restart_increments_restart_count_and_rejoins_ready() {
    let host = KernelHost::new(test_context(), FakeClock::new());
    let kernel = FakeKernel::new(KernelDescriptor::new("agent_x", Tier(2)));
    host.register(kernel, false).unwrap();
    host.start("agent_x").await.unwrap();
    host.restart("agent_x", "manual restart").await.unwrap();
    assert_eq!(host.registry.get("agent_x").unwrap().restart_count, 1);
    assert_eq!(host.registry.get("agent_x").unwrap().state, KernelState::Ready);
}

#[tokio::test]
async fn unresponsive_heartbeats_degrade_then_fail() {
    let host = KernelHost::new(test_context(), FakeClock::new()).with_heartbeat_interval(Duration::from_secs(10));
    let kernel = FakeKernel::new(KernelDescriptor::new("agent_x", Tier(2)));
    *kernel.heartbeat_alive.lock() = false;
    host.register(kernel, false).unwrap();
    host.start("agent_x").await.unwrap();

    host.heartbeat_round().await;
    assert_eq!(host.registry.get("agent_x").unwrap().state, KernelState::Ready);
    host.heartbeat_round().await;
    assert_eq!(host.registry.get("agent_x").unwrap().state, KernelState::Degraded);
    host.heartbeat_round().await;
    assert_eq!(host.registry.get("agent_x").unwrap().state, KernelState::Failed);
}

#[tokio::test]
async fn supervise_once_restarts_a_failed_kernel_within_budget() {
    let host = KernelHost::new(test_context(), FakeClock::new())
        .with_backoff(Duration::from_millis(1), Duration::from_millis(5));
    let mut descriptor = KernelDescriptor::new("agent_x", Tier(2));
    descriptor.budgets = Budgets { max_restarts: 2, ..Budgets::default() };
    let kernel = FakeKernel::new(descriptor);
    host.register(kernel, false).unwrap();
    host.start("agent_x").await.unwrap();
    host.registry.transition("agent_x", KernelState::Degraded).unwrap();
    host.registry.transition("agent_x", KernelState::Failed).unwrap();

    let exhausted = host.supervise_once().await;
    assert!(exhausted.is_empty());

    // The restart now runs on its own spawned task rather than inline, so
    // give it a moment to complete before asserting on its outcome.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(host.registry.get("agent_x").unwrap().restart_count, 1);
    assert_eq!(host.registry.get("agent_x").unwrap().state, KernelState::Ready);
}

#[tokio::test]
async fn supervise_once_escalates_exhausted_kernel_exactly_once() {
    let host = KernelHost::new(test_context(), FakeClock::new())
        .with_backoff(Duration::from_millis(1), Duration::from_millis(5));
    let mut descriptor = KernelDescriptor::new("agent_x", Tier(2));
    descriptor.budgets = Budgets { max_restarts: 0, ..Budgets::default() };
    let kernel = FakeKernel::new(descriptor);
    host.register(kernel, false).unwrap();
    host.start("agent_x").await.unwrap();
    host.registry.transition("agent_x", KernelState::Degraded).unwrap();
    host.registry.transition("agent_x", KernelState::Failed).unwrap();

    let exhausted = host.supervise_once().await;
    assert_eq!(exhausted, vec![grace_core::ComponentId::new("agent_x")]);

    // A second tick must not attempt another restart: the kernel is still
    // `Failed` with its budget already exhausted, so it is reported again
    // (the daemon is responsible for quarantining it so it drops out of
    // future ticks), never silently retried past its budget.
    let exhausted_again = host.supervise_once().await;
    assert_eq!(exhausted_again, vec![grace_core::ComponentId::new("agent_x")]);
    assert_eq!(host.registry.get("agent_x").unwrap().restart_count, 0);
}
