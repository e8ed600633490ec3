// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! [`KernelHost`]: the public `register/start/stop/restart/list` surface
//! (spec §4.2) plus the supervision loop that drives restarts and
//! escalation (spec §4.4). This is where the host turns a
//! [`supervisor::SupervisionAction`] decision into the actual calls on a
//! kernel and the journalled events the rest of the system observes.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use grace_core::{ComponentId, Event, KernelState, Priority, Timestamp};
use parking_lot::RwLock;

use crate::error::ControlError;
use crate::kernel::{handle_with_budget, HeartbeatStatus, Kernel, KernelContext};
use crate::registry::KernelRegistry;
use crate::supervisor::{self, SupervisionAction};

/// A system-wide flag set of kernels the mesh should treat as
/// sink-to-audit only (spec §4.4 "Degradation policy").
#[derive(Default)]
pub struct DegradedMode {
    disabled_kernels: RwLock<std::collections::HashSet<ComponentId>>,
}

impl DegradedMode {
    pub fn disable(&self, name: ComponentId) {
        self.disabled_kernels.write().insert(name);
    }

    pub fn enable(&self, name: &ComponentId) {
        self.disabled_kernels.write().remove(name);
    }

    pub fn is_disabled(&self, name: &ComponentId) -> bool {
        self.disabled_kernels.read().contains(name)
    }

    pub fn snapshot(&self) -> Vec<ComponentId> {
        self.disabled_kernels.read().iter().cloned().collect()
    }
}

/// Hosts and supervises every kernel behind the uniform contract. Owns the
/// only mutable view of kernel lifecycle state (spec §3.2 "Ownership").
pub struct KernelHost<C: grace_core::Clock> {
    pub registry: Arc<KernelRegistry>,
    pub degraded_mode: Arc<DegradedMode>,
    ctx: KernelContext,
    kernels: Arc<RwLock<HashMap<ComponentId, Arc<dyn Kernel>>>>,
    clock: C,
    origin: std::time::Instant,
    restart_base: Duration,
    restart_cap: Duration,
    heartbeat_interval: Duration,
}

impl<C: grace_core::Clock> KernelHost<C> {
    pub fn new(ctx: KernelContext, clock: C) -> Self {
        Self {
            registry: Arc::new(KernelRegistry::new()),
            degraded_mode: Arc::new(DegradedMode::default()),
            ctx,
            kernels: Arc::new(RwLock::new(HashMap::new())),
            clock,
            origin: std::time::Instant::now(),
            restart_base: Duration::from_secs(1),
            restart_cap: Duration::from_secs(300),
            heartbeat_interval: Duration::from_secs(supervisor::DEFAULT_HEARTBEAT_INTERVAL_SECS),
        }
    }

    pub fn with_backoff(mut self, base: Duration, cap: Duration) -> Self {
        self.restart_base = base;
        self.restart_cap = cap;
        self
    }

    pub fn with_heartbeat_interval(mut self, interval: Duration) -> Self {
        self.heartbeat_interval = interval;
        self
    }

    /// Register a kernel descriptor + implementation. Per spec §4.2,
    /// `register` is boot-only unless `from_meta_kernel` is set.
    pub fn register(
        &self,
        kernel: Arc<dyn Kernel>,
        from_meta_kernel: bool,
    ) -> Result<(), ControlError> {
        let descriptor = kernel.descriptor().clone();
        let name = descriptor.name.clone();
        let deadline = self.clock.epoch_ms() + self.heartbeat_interval.as_millis() as u64;
        self.registry.register(descriptor, deadline, from_meta_kernel)?;
        self.kernels.write().insert(name, kernel);
        Ok(())
    }

    /// Finish registering kernels; subsequent `register` calls require
    /// `from_meta_kernel = true`.
    pub fn close_boot_window(&self) {
        self.registry.close_boot_window();
    }

    pub fn list(&self) -> Vec<grace_core::KernelRecord> {
        self.registry.snapshot()
    }

    pub async fn start(&self, name: &str) -> Result<(), ControlError> {
        let kernel = self.kernel(name)?;
        self.registry.force_state(name, KernelState::Initialising)?;
        match kernel.initialise(&self.ctx).await {
            Ok(()) => {
                self.registry.transition(name, KernelState::Ready)?;
                self.publish_best_effort(name, "kernel.ready", serde_json::Value::Null).await;
                Ok(())
            }
            Err(err) => {
                self.registry.transition(name, KernelState::Failed)?;
                Err(err)
            }
        }
    }

    pub async fn stop(&self, name: &str) -> Result<(), ControlError> {
        let kernel = self.kernel(name)?;
        kernel.drain().await?;
        self.publish_best_effort(name, "kernel.drained", serde_json::Value::Null).await;
        Ok(())
    }

    /// Restart outside the supervision loop's own bookkeeping — used for
    /// manual/administrative restarts. Bumps `restart_count` the same way
    /// an automatic restart would.
    pub async fn restart(&self, name: &str, reason: &str) -> Result<(), ControlError> {
        let kernel = self.kernel(name)?;
        let _ = kernel.drain().await;
        self.registry.record_restart(name, self.clock.epoch_ms())?;
        self.journal_event(name, "kernel.restart.initiated", serde_json::json!({ "reason": reason })).await;
        match kernel.initialise(&self.ctx).await {
            Ok(()) => {
                self.registry.transition(name, KernelState::Ready)?;
                self.journal_event(name, "kernel.restart.success", serde_json::Value::Null).await;
                Ok(())
            }
            Err(err) => {
                self.registry.transition(name, KernelState::Failed)?;
                Err(err)
            }
        }
    }

    /// Dispatch one event to a kernel, honoring its declared handle-latency
    /// budget.
    pub async fn handle(&self, name: &str, event: Event) -> Result<(), ControlError> {
        let kernel = self.kernel(name)?;
        let outcome = handle_with_budget(kernel.as_ref(), event).await?;
        if let Some(state) = outcome.new_state {
            self.registry.transition(name, state)?;
        }
        for emitted in outcome.emitted {
            let _ = self.ctx.mesh.publish(emitted).await;
        }
        Ok(())
    }

    /// Call every ready/degraded kernel's `heartbeat()`, updating the
    /// registry's miss counters and transitioning degraded/failed on
    /// repeated misses (spec §4.2).
    pub async fn heartbeat_round(&self) {
        let names: Vec<ComponentId> = self
            .registry
            .snapshot()
            .into_iter()
            .filter(|r| matches!(r.state, KernelState::Ready | KernelState::Degraded))
            .map(|r| r.descriptor.name)
            .collect();

        for name in names {
            let Some(kernel) = self.kernels.read().get(&name).cloned() else { continue };
            let status = kernel.heartbeat().await;
            match status {
                HeartbeatStatus::Alive => {
                    let next_deadline = self.clock.epoch_ms() + self.heartbeat_interval.as_millis() as u64;
                    let _ = self.registry.reset_heartbeat(name.as_str(), next_deadline);
                }
                HeartbeatStatus::Unresponsive => {
                    let misses = self.registry.record_heartbeat_miss(name.as_str()).unwrap_or(0);
                    if misses >= supervisor::FAILED_AFTER_MISSES {
                        let _ = self.registry.transition(name.as_str(), KernelState::Failed);
                    } else if misses >= supervisor::DEGRADED_AFTER_MISSES {
                        let _ = self.registry.transition(name.as_str(), KernelState::Degraded);
                    }
                }
            }
        }
    }

    /// One supervision tick (spec §4.4): heartbeat sweep, then restart
    /// scheduling / escalation for failed kernels. Returns the names handed
    /// to the failure handler this tick (restart budget exhausted).
    ///
    /// A kernel scheduled for restart runs its backoff-then-restart on its
    /// own spawned task (spec §5: "each kernel runs on its own scheduling
    /// unit") rather than sleeping inline here — with the tick firing every
    /// few seconds across the whole fleet, one kernel's multi-restart
    /// backoff must never stall heartbeat/restart/escalation handling for
    /// every other kernel in the same tick.
    pub async fn supervise_once(&self) -> Vec<ComponentId>
    where
        C: 'static,
    {
        self.heartbeat_round().await;

        let decisions = supervisor::tick(&self.registry, &self.clock, self.restart_base, self.restart_cap);
        let mut exhausted = Vec::new();

        for (name, action) in decisions {
            match action {
                SupervisionAction::None => {}
                SupervisionAction::MarkDegraded => {
                    let _ = self.registry.transition(name.as_str(), KernelState::Degraded);
                    self.degraded_mode_if_not_tier1(&name).await;
                }
                SupervisionAction::MarkFailed => {
                    let _ = self.registry.transition(name.as_str(), KernelState::Failed);
                }
                SupervisionAction::ScheduleRestart { backoff } => {
                    self.spawn_restart(name, backoff);
                }
                SupervisionAction::Exhausted => {
                    self.journal_event(name.as_str(), "kernel.restart.exhausted", serde_json::Value::Null).await;
                    self.degraded_mode_if_not_tier1(&name).await;
                    exhausted.push(name);
                }
            }
        }

        exhausted
    }

    /// Spawn `name`'s backoff-then-restart as its own task, decoupled from
    /// this tick and from every other kernel's restart.
    fn spawn_restart(&self, name: ComponentId, backoff: Duration)
    where
        C: 'static,
    {
        let registry = Arc::clone(&self.registry);
        let kernels = Arc::clone(&self.kernels);
        let ctx = self.ctx.clone();
        let clock = self.clock.clone();
        let origin = self.origin;
        tokio::spawn(restart_after_backoff(registry, kernels, ctx, clock, origin, name, backoff));
    }

    async fn degraded_mode_if_not_tier1(&self, name: &ComponentId) {
        if let Some(record) = self.registry.get(name.as_str()) {
            if !record.descriptor.tier.is_critical() {
                self.degraded_mode.disable(name.clone());
            }
        }
    }

    fn kernel(&self, name: &str) -> Result<Arc<dyn Kernel>, ControlError> {
        self.kernels.read().get(name).cloned().ok_or_else(|| ControlError::UnknownKernel(name.to_string()))
    }

    async fn journal_event(&self, source: &str, event_type: &str, payload: serde_json::Value) {
        let event = self.build_event(source, event_type, payload, Priority::High);
        if let Err(err) = self.ctx.journal.submit(event).await {
            tracing::error!(%err, %source, %event_type, "failed to journal control-plane event");
        }
    }

    async fn publish_best_effort(&self, source: &str, event_type: &str, payload: serde_json::Value) {
        let event = self.build_event(source, event_type, payload, Priority::Normal);
        if let Err(err) = self.ctx.mesh.publish(event).await {
            tracing::debug!(%err, %source, %event_type, "no route for control-plane event");
        }
    }

    fn build_event(&self, source: &str, event_type: &str, payload: serde_json::Value, priority: Priority) -> Event {
        Event::new(event_type, source, Timestamp::capture(&self.clock, self.origin), priority, payload)
    }
}

/// The body of one kernel's restart, run on its own task by
/// [`KernelHost::spawn_restart`]. Takes only cloned `Arc` handles (never
/// `&KernelHost`) so it owns everything it touches and can run fully
/// independently of the tick that scheduled it and of every other
/// kernel's own restart task.
#[allow(clippy::too_many_arguments)]
async fn restart_after_backoff<C: grace_core::Clock>(
    registry: Arc<KernelRegistry>,
    kernels: Arc<RwLock<HashMap<ComponentId, Arc<dyn Kernel>>>>,
    ctx: KernelContext,
    clock: C,
    origin: Instant,
    name: ComponentId,
    backoff: Duration,
) {
    tokio::time::sleep(backoff).await;

    let initiated = Event::new(
        "kernel.restart.initiated",
        name.as_str(),
        Timestamp::capture(&clock, origin),
        Priority::High,
        serde_json::json!({ "backoff_ms": backoff.as_millis() as u64 }),
    );
    if let Err(err) = ctx.journal.submit(initiated).await {
        tracing::error!(%err, %name, "failed to journal control-plane event");
    }

    let _ = registry.record_restart(name.as_str(), clock.epoch_ms());

    let Some(kernel) = kernels.read().get(&name).cloned() else { return };
    match kernel.initialise(&ctx).await {
        Ok(()) => {
            let _ = registry.transition(name.as_str(), KernelState::Ready);
            let success = Event::new(
                "kernel.restart.success",
                name.as_str(),
                Timestamp::capture(&clock, origin),
                Priority::High,
                serde_json::Value::Null,
            );
            if let Err(err) = ctx.journal.submit(success).await {
                tracing::error!(%err, %name, "failed to journal control-plane event");
            }
        }
        Err(_) => {
            let _ = registry.transition(name.as_str(), KernelState::Failed);
        }
    }
}

#[cfg(test)]
#[path = "host_tests.rs"]
mod tests;
