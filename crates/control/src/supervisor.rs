// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Supervision loop — spec §4.4.
//!
//! One tick does three things, in order: mark expired heartbeats
//! degraded/failed, compute and schedule restarts for failed kernels still
//! within budget, and hand exhausted kernels to the failure handler. The
//! tick itself is plain, synchronous decision logic over a
//! [`KernelRegistry`] snapshot — the actual restart/heartbeat I/O is done
//! by the caller ([`crate::host::KernelHost`]) so this module stays
//! testable without a real kernel.

use std::time::Duration;

use grace_core::{Clock, KernelRecord, KernelState};

use crate::registry::KernelRegistry;

/// Default per-kernel heartbeat cadence (spec §4.2).
pub const DEFAULT_HEARTBEAT_INTERVAL_SECS: u64 = 10;
/// Missed heartbeats before a kernel is marked `degraded` (spec §4.2).
pub const DEGRADED_AFTER_MISSES: u32 = 2;
/// Missed heartbeats before a kernel is marked `failed` (spec §4.2).
pub const FAILED_AFTER_MISSES: u32 = 3;
/// Default supervision tick interval (spec §4.4).
pub const DEFAULT_TICK_INTERVAL_SECS: u64 = 5;

/// Exponential backoff with a cap, per spec §4.4: `base * 2^restart_count`.
pub fn restart_backoff(base: Duration, restart_count: u32, cap: Duration) -> Duration {
    let factor = 1u64.checked_shl(restart_count.min(32)).unwrap_or(u64::MAX);
    base.checked_mul(factor as u32).unwrap_or(cap).min(cap)
}

/// What the supervisor decided to do with one kernel this tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupervisionAction {
    /// No action needed this tick.
    None,
    /// Heartbeat deadline missed; transition to the given state.
    MarkDegraded,
    MarkFailed,
    /// The kernel is failed and within budget: restart after `backoff`.
    ScheduleRestart { backoff: Duration },
    /// The kernel has exhausted `max_restarts`; hand off to the failure handler.
    Exhausted,
}

/// Decide what a single kernel record needs this tick, given the current
/// wall clock and its heartbeat deadline.
pub fn decide(record: &KernelRecord, now_epoch_ms: u64, restart_base: Duration, restart_cap: Duration) -> SupervisionAction {
    match record.state {
        KernelState::Failed => {
            if record.restart_budget_exhausted() {
                SupervisionAction::Exhausted
            } else {
                SupervisionAction::ScheduleRestart {
                    backoff: restart_backoff(restart_base, record.restart_count, restart_cap),
                }
            }
        }
        KernelState::Ready | KernelState::Degraded => {
            if now_epoch_ms < record.heartbeat_deadline_epoch_ms {
                return SupervisionAction::None;
            }
            let misses = record.missed_heartbeats + 1;
            if misses >= FAILED_AFTER_MISSES {
                SupervisionAction::MarkFailed
            } else if misses >= DEGRADED_AFTER_MISSES {
                SupervisionAction::MarkDegraded
            } else {
                SupervisionAction::None
            }
        }
        _ => SupervisionAction::None,
    }
}

/// Run one supervision tick over every registered kernel, returning the
/// action decided for each. Pure with respect to the registry: callers
/// apply state transitions themselves via [`KernelRegistry`] so the
/// decision and its I/O consequences stay separately testable.
pub fn tick(
    registry: &KernelRegistry,
    clock: &impl Clock,
    restart_base: Duration,
    restart_cap: Duration,
) -> Vec<(grace_core::ComponentId, SupervisionAction)> {
    let now_epoch_ms = clock.epoch_ms();
    registry
        .snapshot()
        .into_iter()
        .map(|record| {
            let action = decide(&record, now_epoch_ms, restart_base, restart_cap);
            (record.descriptor.name.clone(), action)
        })
        .collect()
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
