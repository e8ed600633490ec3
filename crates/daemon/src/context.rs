// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Assembles every crate under `crates/` into one bootable core (spec §4
//! end to end). [`CoreContext::assemble`] wires journal, mesh, governance,
//! synth, and immune; [`CoreContext::boot`] verifies the journal, brings
//! up tier-1 kernels sequentially and tier-2+ concurrently, and closes the
//! registration window (spec §4.4 "Boot sequence").

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use grace_control::host::KernelHost;
use grace_control::kernel::{Kernel, KernelContext};
use grace_core::{ComponentId, Event, KernelState, Priority, SystemClock, Tier, Timestamp};
use grace_governance::{AcceptAll, ConstitutionalStore, Gate, HunterRules, PolicyStore, Ruleset};
use grace_immune::{EscalationHandler, ImmuneKernel, PlaybookStore, TrustStore};
use grace_journal::{FileJournal, JournalHandle, VerificationReport};
use grace_mesh::{Mesh, RouteTable, TrustThreshold, MaxPayloadSize, ValidatorRegistry};
use grace_synth::{Synthesizer, WeightStore};
use grace_wire::{BootPhase, HaltResult, ReloadRoutesResult, StatusReport};

use crate::defaults;
use crate::env::Config;
use crate::error::DaemonError;
use crate::executor::ControlPlaneExecutor;
use crate::kernels::{GovernanceKernel, ImmuneKernelAdapter, StubKernel, SynthKernel};

const CONTEXT_SOURCE: &str = "core.context";
const JOURNAL_QUEUE_CAPACITY: usize = 1024;
const TIER2_CONCURRENCY: usize = 8;

/// Infra tier-1 kernels in boot order (journal before mesh before control,
/// spec §2's dependency order). `halt` drains in the reverse of this list.
const TIER1_BOOT_ORDER: [&str; 3] = ["journal", "mesh", "control"];

/// Everything the daemon needs at runtime, assembled once at startup.
pub struct CoreContext {
    pub journal: JournalHandle,
    pub mesh: Arc<Mesh>,
    pub route_table: Arc<RouteTable>,
    pub host: Arc<KernelHost<SystemClock>>,
    pub gate: Arc<Gate<SystemClock>>,
    pub synthesizer: Arc<Synthesizer<SystemClock>>,
    pub immune: Arc<ImmuneKernel<SystemClock>>,
    pub escalation: Arc<EscalationHandler<SystemClock>>,
    origin: std::time::Instant,
    booted: AtomicBool,
}

impl CoreContext {
    /// Build every collaborator from `config`, but do not yet register or
    /// boot any kernel — see [`Self::boot`].
    pub fn assemble(config: &Config) -> Result<Self, DaemonError> {
        let store = Arc::new(FileJournal::open(&config.journal_path)?);
        let journal = JournalHandle::new(store, JOURNAL_QUEUE_CAPACITY);

        let routes = grace_mesh::manifest::load(&config.route_manifest_path)?;
        let route_table = Arc::new(RouteTable::new(routes));

        let constitutional = Arc::new(ConstitutionalStore::new(Ruleset::new(1, defaults::seed_principles())));
        let policy = Arc::new(PolicyStore::new(defaults::seed_policies()));

        let mut validators = ValidatorRegistry::new();
        validators.register(Arc::new(TrustThreshold { minimum: 0.0 }));
        validators.register(Arc::new(MaxPayloadSize { max_bytes: 1024 * 1024 }));
        validators.register(Arc::new(grace_governance::ConstitutionalValidator::new(Arc::clone(&constitutional))));
        validators.register(Arc::new(grace_governance::PolicyValidator::new(Arc::clone(&policy))));

        let mesh = Arc::new(Mesh::new(Arc::clone(&route_table), validators).with_journal(journal.writer.clone()));

        let ctx = KernelContext { journal: journal.writer.clone(), mesh: Arc::clone(&mesh) };
        let host = Arc::new(
            KernelHost::new(ctx, SystemClock).with_heartbeat_interval(config.heartbeat_interval),
        );

        let hunter = Arc::new(HunterRules::new(defaults::seed_hunter_rules()));
        let gate = Arc::new(Gate::new(
            constitutional,
            policy,
            hunter,
            Arc::new(AcceptAll),
            Arc::new(defaults::NoQuorumVoterPool),
            journal.writer.clone(),
            Arc::clone(&mesh),
            SystemClock,
        ));

        let weights = Arc::new(WeightStore::new());
        let synthesizer =
            Arc::new(Synthesizer::new(weights, journal.writer.clone(), Arc::clone(&mesh), SystemClock));

        let playbooks = Arc::new(PlaybookStore::new(defaults::seed_playbooks()));
        let trust = Arc::new(TrustStore::new());
        let executor = Arc::new(ControlPlaneExecutor::new(Arc::clone(&host)));
        let immune = Arc::new(ImmuneKernel::new(
            Arc::clone(&playbooks),
            trust,
            executor,
            journal.writer.clone(),
            Arc::clone(&mesh),
            SystemClock,
        ));
        let escalation = Arc::new(EscalationHandler::new(
            journal.writer.clone(),
            Arc::clone(&mesh),
            playbooks,
            SystemClock,
        ));

        Ok(Self {
            journal,
            mesh,
            route_table,
            host,
            gate,
            synthesizer,
            immune,
            escalation,
            origin: std::time::Instant::now(),
            booted: AtomicBool::new(false),
        })
    }

    /// Register the fixed fleet (infra placeholders, governance, synth,
    /// immune) plus a [`StubKernel`] for every route-manifest target this
    /// core has no dedicated adapter for, then bring tier-1 up
    /// sequentially and tier-2+ concurrently (spec §4.4).
    pub async fn boot(&self, boot_timeout: Duration, tier1_max_restarts: u32) -> Result<(), DaemonError> {
        let report = self.journal.store.verify().await?;
        if !report.valid {
            return Err(DaemonError::JournalCorrupt(report.detail));
        }

        for kernel in self.fleet() {
            self.host.register(kernel, false).map_err(DaemonError::from)?;
        }

        tokio::time::timeout(boot_timeout, self.boot_fleet(tier1_max_restarts))
            .await
            .map_err(|_| DaemonError::BootTimeout)??;

        self.host.close_boot_window();
        self.booted.store(true, Ordering::SeqCst);
        self.publish_best_effort("control.boot.complete", serde_json::Value::Null).await;
        Ok(())
    }

    /// `status` (spec §6): kernel state breakdown plus the journal tail,
    /// with `boot_phase` derived from the registry rather than tracked
    /// separately — there is only ever one source of truth for a kernel's
    /// state, and that is the registry.
    pub async fn status(&self) -> StatusReport {
        let records = self.host.list();
        let mut ready = Vec::new();
        let mut degraded = Vec::new();
        let mut failed = Vec::new();
        let mut quarantined = Vec::new();

        for record in &records {
            match record.state {
                KernelState::Ready => ready.push(record.descriptor.name.clone()),
                KernelState::Degraded => degraded.push(record.descriptor.name.clone()),
                KernelState::Failed => failed.push(record.descriptor.name.clone()),
                KernelState::Quarantined => quarantined.push(record.descriptor.name.clone()),
                KernelState::Unregistered | KernelState::Initialising => {}
            }
        }

        let boot_phase = if !self.booted.load(Ordering::SeqCst) {
            BootPhase::Booting
        } else if !failed.is_empty() || !quarantined.is_empty() {
            BootPhase::Safe
        } else if !degraded.is_empty() {
            BootPhase::Degraded
        } else {
            BootPhase::Complete
        };

        let journal_tail_sequence =
            self.journal.store.tail().await.ok().flatten().map(|entry| entry.sequence).unwrap_or(0);

        StatusReport { boot_phase, ready, degraded, failed, quarantined, journal_tail_sequence }
    }

    /// `halt(reason)` (spec §6): drain every kernel in reverse dependency
    /// order — tier-2+ kernels first, since they depend on the tier-1 infra
    /// they're built on, then tier-1 infra in the reverse of its boot order
    /// (control, mesh, journal). A kernel that fails to drain cleanly is
    /// logged and skipped rather than aborting the rest of the shutdown.
    pub async fn halt(&self, reason: &str) -> Result<HaltResult, DaemonError> {
        let records = self.host.list();
        let (tier1, mut tier2plus): (Vec<_>, Vec<_>) =
            records.into_iter().partition(|r| r.descriptor.tier.is_critical());
        tier2plus.sort_by(|a, b| a.descriptor.name.cmp(&b.descriptor.name));

        let present: HashSet<ComponentId> = tier1.iter().map(|r| r.descriptor.name.clone()).collect();
        let mut order: Vec<ComponentId> = tier2plus.into_iter().map(|r| r.descriptor.name).collect();
        for name in TIER1_BOOT_ORDER.iter().rev() {
            let id = ComponentId::new(*name);
            if present.contains(&id) {
                order.push(id);
            }
        }

        let mut drained = Vec::new();
        for name in order {
            match self.host.stop(name.as_str()).await {
                Ok(()) => drained.push(name),
                Err(err) => tracing::warn!(kernel = %name, %err, "halt: kernel did not drain cleanly"),
            }
        }

        self.publish_best_effort("control.halt", serde_json::json!({ "reason": reason })).await;
        Ok(HaltResult { drained })
    }

    /// `reload-routes(path)` (spec §6): atomically swap in the manifest at
    /// `path`, returning the generation before and after.
    pub async fn reload_routes(&self, path: &std::path::Path) -> Result<ReloadRoutesResult, DaemonError> {
        let previous_generation = self.route_table.generation_id();
        let new_generation = self.route_table.reload_from_path(path).map_err(DaemonError::from)?;
        self.publish_best_effort(
            "control.routes.reloaded",
            serde_json::json!({ "previous_generation": previous_generation, "new_generation": new_generation }),
        )
        .await;
        Ok(ReloadRoutesResult { previous_generation, new_generation })
    }

    /// `verify-journal(from, to)` (spec §6): on-demand chain verification
    /// over an explicit range, distinct from the background verifier's
    /// full-chain sweep.
    pub async fn verify_journal(&self, from: u64, to: u64) -> Result<VerificationReport, DaemonError> {
        let entries = self.journal.store.range(from, to).await?;
        Ok(grace_journal::verifier::verify_chain(&entries)?)
    }

    async fn boot_fleet(&self, tier1_max_restarts: u32) -> Result<(), DaemonError> {
        let (tier1, tier2plus): (Vec<_>, Vec<_>) =
            self.host.list().into_iter().partition(|r| r.descriptor.tier.is_critical());
        let tier1: Vec<ComponentId> = tier1.into_iter().map(|r| r.descriptor.name).collect();
        let tier2plus: Vec<ComponentId> = tier2plus.into_iter().map(|r| r.descriptor.name).collect();

        for name in tier1 {
            self.start_with_retries(&name, tier1_max_restarts).await?;
        }

        let mut set = tokio::task::JoinSet::new();
        for name in tier2plus {
            let host = Arc::clone(&self.host);
            set.spawn(async move {
                let result = host.start(name.as_str()).await;
                (name, result)
            });
            if set.len() >= TIER2_CONCURRENCY {
                let _ = set.join_next().await;
            }
        }
        while let Some(joined) = set.join_next().await {
            if let Ok((name, Err(err))) = joined {
                tracing::warn!(kernel = %name, %err, "tier-2+ kernel failed to start during boot");
            }
        }

        Ok(())
    }

    async fn start_with_retries(&self, name: &ComponentId, max_restarts: u32) -> Result<(), DaemonError> {
        let mut attempts = 0;
        loop {
            match self.host.start(name.as_str()).await {
                Ok(()) => return Ok(()),
                Err(err) => {
                    attempts += 1;
                    if attempts > max_restarts {
                        return Err(DaemonError::Tier1Failure(format!("{name}: {err}")));
                    }
                }
            }
        }
    }

    /// The fixed fleet plus one [`StubKernel`] per route target this core
    /// has no dedicated adapter for (spec §1 Non-goals: individual domain
    /// kernels' business logic is out of scope, but they must still be
    /// hostable placeholders so routes resolve to a live subscriber).
    fn fleet(&self) -> Vec<Arc<dyn Kernel>> {
        let mut fleet: Vec<Arc<dyn Kernel>> = vec![
            infra_placeholder("journal"),
            infra_placeholder("mesh"),
            infra_placeholder("control"),
            GovernanceKernel::new(Arc::clone(&self.gate)),
            SynthKernel::new(Arc::clone(&self.synthesizer)),
            ImmuneKernelAdapter::new(Arc::clone(&self.immune), Arc::clone(self.synthesizer.weights())),
        ];

        let known: HashSet<ComponentId> = fleet.iter().map(|k| k.descriptor().name.clone()).collect();
        let generation = self.route_table.snapshot();
        let mut stubbed = HashSet::new();
        for route in generation.routes.iter() {
            for target in &route.targets {
                if known.contains(target) || stubbed.contains(target) {
                    continue;
                }
                let descriptor = grace_core::KernelDescriptor::new(target.clone(), Tier(2));
                let (stub, _control) = StubKernel::new(descriptor);
                stubbed.insert(target.clone());
                fleet.push(stub);
            }
        }

        fleet
    }

    async fn publish_best_effort(&self, event_type: &str, payload: serde_json::Value) {
        let event = Event::new(event_type, CONTEXT_SOURCE, Timestamp::capture(&SystemClock, self.origin), Priority::High, payload);
        if let Err(err) = self.mesh.publish(event).await {
            tracing::debug!(%err, %event_type, "no route for core-context event");
        }
    }
}

/// A tier-1 [`StubKernel`] standing in for an infra component
/// (journal/mesh/control) so it appears in the registry and emits
/// `kernel.ready`, even though its real liveness is driven by this
/// process being up at all rather than a mesh subscription loop.
fn infra_placeholder(name: &str) -> Arc<dyn Kernel> {
    let descriptor = grace_core::KernelDescriptor::new(name, Tier::CRITICAL);
    let (stub, _control) = StubKernel::new(descriptor);
    stub
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
