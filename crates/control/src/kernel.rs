// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The uniform component contract every hosted kernel implements — spec §4.2.
//!
//! `initialise`/`handle`/`heartbeat`/`drain` mirror the spec's verbs
//! exactly. `handle` returns `(emitted_events, new_state)` rather than
//! raising across the mesh, per the redesign note in spec §9: unexpected
//! faults still propagate, but as a typed [`ControlError`] the host turns
//! into an event, never as a raw panic crossing a kernel boundary.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use grace_core::{Event, KernelDescriptor, KernelState};

use crate::error::ControlError;

/// Handles passed to every kernel at `initialise`, per spec §9's "core
/// context" redesign note: no hidden globals, every kernel receives
/// exactly the handles it needs to do its job and nothing else.
#[derive(Clone)]
pub struct KernelContext {
    pub journal: grace_journal::JournalWriter,
    pub mesh: Arc<grace_mesh::Mesh>,
}

/// Outcome of a single `handle()` call.
#[derive(Debug, Clone)]
pub struct HandleOutcome {
    pub emitted: Vec<Event>,
    pub new_state: Option<KernelState>,
}

impl HandleOutcome {
    pub fn none() -> Self {
        Self { emitted: Vec::new(), new_state: None }
    }

    pub fn emit(events: Vec<Event>) -> Self {
        Self { emitted: events, new_state: None }
    }

    pub fn transition(new_state: KernelState) -> Self {
        Self { emitted: Vec::new(), new_state: Some(new_state) }
    }
}

/// Liveness report returned from a `heartbeat()` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeartbeatStatus {
    Alive,
    Unresponsive,
}

/// The uniform contract every hosted kernel satisfies (spec §4.2).
///
/// `handle` must not block the mesh longer than the kernel's declared
/// `handle_latency_ms` budget (default 200ms) — the host enforces this
/// with a timeout and reports a budget overrun as [`ControlError::HandleBudgetExceeded`]
/// rather than letting a slow kernel stall the dispatcher.
#[async_trait]
pub trait Kernel: Send + Sync {
    fn descriptor(&self) -> &KernelDescriptor;

    /// Idempotent. May subscribe to event types via `ctx.mesh`. Must
    /// publish `kernel.ready` itself on success — the host does not do
    /// this on the kernel's behalf, since readiness may depend on work
    /// only the kernel can observe (e.g. a warm cache).
    async fn initialise(&self, ctx: &KernelContext) -> Result<(), ControlError>;

    /// Single-entry handler. Long work must be offloaded to a queue the
    /// kernel owns internally; `handle` itself returns quickly.
    async fn handle(&self, event: Event) -> Result<HandleOutcome, ControlError>;

    /// Called by the control plane's supervision loop at a fixed cadence.
    async fn heartbeat(&self) -> HeartbeatStatus;

    /// Refuse new work, finish in-flight, publish `kernel.drained`.
    async fn drain(&self) -> Result<(), ControlError>;

    /// Required for tier-1 kernels participating in snapshot recovery;
    /// optional otherwise.
    async fn snapshot(&self) -> Option<Vec<u8>> {
        None
    }

    async fn restore(&self, _blob: &[u8]) -> Result<(), ControlError> {
        Ok(())
    }
}

/// Run `kernel.handle(event)` but fail it if it doesn't resolve within the
/// kernel's declared handle-latency budget.
pub async fn handle_with_budget(
    kernel: &dyn Kernel,
    event: Event,
) -> Result<HandleOutcome, ControlError> {
    let budget = Duration::from_millis(kernel.descriptor().budgets.handle_latency_ms);
    match tokio::time::timeout(budget, kernel.handle(event)).await {
        Ok(result) => result,
        Err(_) => Err(ControlError::HandleBudgetExceeded {
            name: kernel.descriptor().name.to_string(),
            budget_ms: kernel.descriptor().budgets.handle_latency_ms,
        }),
    }
}

#[cfg(test)]
#[path = "kernel_tests.rs"]
mod tests;
