// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Boot sequencer — spec §4.2 "Boot order" / §4.4 "Boot sequence".
//!
//! Tier-1 kernels boot sequentially, in the dependency order each declares;
//! tier-2+ kernels boot in parallel (bounded by a concurrency cap) only
//! once every tier-1 kernel is `Ready`. The whole sequence is bounded by
//! `CORE_BOOT_TIMEOUT_SECONDS` (default 30s); exceeding it is an
//! [`ControlError::BootTimeout`], which the daemon escalates to the
//! failure handler rather than limping into a half-booted state.

use std::sync::Arc;
use std::time::Duration;

use futures_lite_shim::join_bounded;
use grace_core::{ComponentId, Tier};

use crate::error::ControlError;
use crate::kernel::{Kernel, KernelContext};
use crate::registry::KernelRegistry;

pub const DEFAULT_BOOT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_TIER2_CONCURRENCY: usize = 8;
pub const DEFAULT_TIER1_MAX_RESTARTS: u32 = 3;

/// Outcome of booting the whole fleet.
#[derive(Debug, Clone)]
pub struct BootReport {
    pub ready: Vec<ComponentId>,
    pub failed: Vec<ComponentId>,
}

/// Bring up every kernel in `fleet`, tier-1 first and sequentially, then
/// tier-2+ in parallel, bounded by `timeout`.
pub async fn run_boot(
    registry: &KernelRegistry,
    ctx: &KernelContext,
    fleet: Vec<Arc<dyn Kernel>>,
    tier1_max_restarts: u32,
    timeout: Duration,
) -> Result<BootReport, ControlError> {
    match tokio::time::timeout(timeout, boot_fleet(registry, ctx, fleet, tier1_max_restarts)).await {
        Ok(result) => result,
        Err(_) => Err(ControlError::BootTimeout(timeout.as_secs())),
    }
}

async fn boot_fleet(
    registry: &KernelRegistry,
    ctx: &KernelContext,
    fleet: Vec<Arc<dyn Kernel>>,
    tier1_max_restarts: u32,
) -> Result<BootReport, ControlError> {
    let (tier1, tier2plus): (Vec<_>, Vec<_>) =
        fleet.into_iter().partition(|k| k.descriptor().tier.is_critical());

    let mut ready = Vec::new();
    let mut failed = Vec::new();

    for kernel in tier1 {
        let name = kernel.descriptor().name.clone();
        register_and_mark_initialising(registry, kernel.as_ref())?;
        match boot_one_with_retries(kernel.as_ref(), ctx, tier1_max_restarts).await {
            Ok(()) => {
                registry.transition(name.as_str(), grace_core::KernelState::Ready)?;
                ready.push(name);
            }
            Err(_) => {
                registry.transition(name.as_str(), grace_core::KernelState::Failed)?;
                return Err(ControlError::Tier1BootFailure(name.to_string()));
            }
        }
    }

    let boot_one = |kernel: Arc<dyn Kernel>, ctx: KernelContext| async move {
        let name = kernel.descriptor().name.clone();
        let outcome = kernel.initialise(&ctx).await;
        (name, outcome)
    };

    let results = join_bounded(
        tier2plus.into_iter().map(|k| boot_one(k, ctx.clone())),
        DEFAULT_TIER2_CONCURRENCY,
    )
    .await;

    for (name, outcome) in results {
        match outcome {
            Ok(()) => {
                registry.transition(name.as_str(), grace_core::KernelState::Ready).ok();
                ready.push(name);
            }
            Err(_) => {
                registry.transition(name.as_str(), grace_core::KernelState::Failed).ok();
                failed.push(name);
            }
        }
    }

    Ok(BootReport { ready, failed })
}

fn register_and_mark_initialising(registry: &KernelRegistry, kernel: &dyn Kernel) -> Result<(), ControlError> {
    let descriptor = kernel.descriptor().clone();
    let name = descriptor.name.clone();
    if registry.get(name.as_str()).is_none() {
        registry.register(descriptor, 0, false)?;
    }
    registry.force_state(name.as_str(), grace_core::KernelState::Initialising)
}

async fn boot_one_with_retries(
    kernel: &dyn Kernel,
    ctx: &KernelContext,
    max_restarts: u32,
) -> Result<(), ControlError> {
    let mut attempts = 0;
    loop {
        match kernel.initialise(ctx).await {
            Ok(()) => return Ok(()),
            Err(err) => {
                attempts += 1;
                if attempts > max_restarts {
                    return Err(err);
                }
            }
        }
    }
}

/// Register and bring up tier-2+ kernels concurrently but bounded, without
/// pulling in a whole async-runtime-agnostic futures crate for one helper.
mod futures_lite_shim {
    use std::future::Future;

    pub async fn join_bounded<I, Fut, T>(iter: I, limit: usize) -> Vec<T>
    where
        I: IntoIterator<Item = Fut>,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        use tokio::task::JoinSet;

        let mut pending: Vec<Fut> = iter.into_iter().collect();
        let mut set = JoinSet::new();
        let mut results = Vec::with_capacity(pending.len());

        // Prime up to `limit` tasks, then top up as each one finishes.
        let initial = pending.len().min(limit.max(1));
        for fut in pending.drain(..initial) {
            set.spawn(fut);
        }
        let mut remaining = pending;

        while let Some(joined) = set.join_next().await {
            if let Ok(result) = joined {
                results.push(result);
            }
            if let Some(next) = remaining.pop() {
                set.spawn(next);
            }
        }

        results
    }
}

#[cfg(test)]
#[path = "boot_tests.rs"]
mod tests;
