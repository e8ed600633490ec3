// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Publish/subscribe dispatch over a [`RouteTable`] (spec §4.3).
//!
//! Each event resolves to a single winning route — the most specific match,
//! ties broken by declared priority then declaration order — whose own
//! validators/fanout/targets decide delivery. `High`/`Critical` priority
//! events are written through to the journal before dispatch, so a crash
//! between publish and delivery still leaves an audit trail; `Normal`/`Low`
//! priority events are not journaled by the mesh itself.
//!
//! Per-target queues are bounded, and overflow is handled differently by
//! priority (spec §4.3 step 4): `Low` events are dropped with a counter
//! increment, `Normal` events block the producer up to a deadline before
//! being dropped, and `High`/`Critical` events never block the producer at
//! all — instead a full queue at that priority trips an anomaly toward
//! whatever is routed to receive `anomaly.detected`. Every drop, at any
//! priority, also emits a `mesh.event.dropped` diagnostic.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use grace_core::{Anomaly, AnomalyType, ComponentId, CorrelationId, Event, Fanout, Priority, Route, Severity, Timestamp};
use parking_lot::RwLock;
use tokio::sync::mpsc;

use crate::error::MeshError;
use crate::pending::PendingStore;
use crate::table::RouteTable;
use crate::validator::{ChainOutcome, ValidatorRegistry};

const DEFAULT_TARGET_QUEUE_DEPTH: usize = 256;
const DEFAULT_NORMAL_BACKPRESSURE_DEADLINE: Duration = Duration::from_millis(250);

const MESH_SOURCE: &str = "mesh";
const RELEASE_EVENT_TYPE: &str = "mesh.release";
const DROPPED_EVENT_TYPE: &str = "mesh.event.dropped";
const ANOMALY_DETECTED_EVENT: &str = "anomaly.detected";

struct Subscriber {
    tx: mpsc::Sender<Event>,
}

/// The live dispatcher: route table, validator registry, per-target
/// subscriber queues, and the defer/park store for the three-way validator
/// contract.
pub struct Mesh {
    table: Arc<RouteTable>,
    validators: ValidatorRegistry,
    subscribers: RwLock<HashMap<ComponentId, Subscriber>>,
    journal: Option<grace_journal::JournalWriter>,
    pending: PendingStore,
    dropped_count: AtomicU64,
    normal_backpressure_deadline: Duration,
}

impl Mesh {
    pub fn new(table: Arc<RouteTable>, validators: ValidatorRegistry) -> Self {
        Self {
            table,
            validators,
            subscribers: RwLock::new(HashMap::new()),
            journal: None,
            pending: PendingStore::new(),
            dropped_count: AtomicU64::new(0),
            normal_backpressure_deadline: DEFAULT_NORMAL_BACKPRESSURE_DEADLINE,
        }
    }

    pub fn with_journal(mut self, journal: grace_journal::JournalWriter) -> Self {
        self.journal = Some(journal);
        self
    }

    /// How long a `Normal` priority publish blocks against a full target
    /// queue before giving up (spec §4.3 step 4).
    pub fn with_backpressure_deadline(mut self, deadline: Duration) -> Self {
        self.normal_backpressure_deadline = deadline;
        self
    }

    /// Register `target` as a subscriber, returning the receiving end of its
    /// bounded queue. Re-subscribing replaces any previous subscription.
    pub fn subscribe(&self, target: ComponentId) -> mpsc::Receiver<Event> {
        self.subscribe_with_depth(target, DEFAULT_TARGET_QUEUE_DEPTH)
    }

    pub fn subscribe_with_depth(&self, target: ComponentId, depth: usize) -> mpsc::Receiver<Event> {
        let (tx, rx) = mpsc::channel(depth);
        self.subscribers.write().insert(target, Subscriber { tx });
        rx
    }

    pub fn unsubscribe(&self, target: &ComponentId) {
        self.subscribers.write().remove(target);
    }

    /// Total events dropped by queue overflow across all priorities.
    pub fn dropped_count(&self) -> u64 {
        self.dropped_count.load(Ordering::Relaxed)
    }

    /// Events currently parked awaiting [`Mesh::release`].
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Validate and dispatch `event` to the single route that wins
    /// resolution for its `(source, event_type)` (spec §4.3 step 1).
    ///
    /// `mesh.release` is handled specially: it never resolves through the
    /// route table itself, it resumes whatever was parked under its own
    /// `correlation_id`.
    pub async fn publish(&self, event: Event) -> Result<usize, MeshError> {
        if event.event_type.as_str() == RELEASE_EVENT_TYPE {
            return self.handle_release(&event).await;
        }

        if matches!(event.priority, Priority::Critical | Priority::High) {
            if let Some(journal) = &self.journal {
                journal.submit(event.clone()).await.map_err(|_| MeshError::ShuttingDown)?;
            }
        }

        let generation = self.table.snapshot();
        let matches = generation.resolve(event.source.as_str(), event.event_type.as_str());
        let Some(route) = matches.first().copied() else {
            return Err(MeshError::NoRoute {
                source: event.source.as_str().to_string(),
                event_type: event.event_type.as_str().to_string(),
            });
        };

        match self.validators.validate_all(&route.validators, &event).await? {
            ChainOutcome::Pass => self.dispatch_to_route(route, event).await,
            ChainOutcome::Drop { validator, reason } => {
                self.emit_dropped(&event, None, &format!("validator '{validator}' rejected the event: {reason}"))
                    .await;
                Err(MeshError::ValidatorRejected(validator, reason))
            }
            ChainOutcome::Defer { validator } => {
                let Some(correlation_id) = event.correlation_id.clone() else {
                    let reason =
                        format!("validator '{validator}' deferred an event with no correlation_id to park it under");
                    self.emit_dropped(&event, None, &reason).await;
                    return Err(MeshError::ValidatorRejected(validator, reason));
                };
                self.pending.park(correlation_id, event, route.clone());
                Ok(0)
            }
        }
    }

    async fn handle_release(&self, event: &Event) -> Result<usize, MeshError> {
        let Some(correlation_id) = event.correlation_id.clone() else {
            return Err(MeshError::NoRoute {
                source: event.source.as_str().to_string(),
                event_type: RELEASE_EVENT_TYPE.to_string(),
            });
        };
        self.release(&correlation_id).await
    }

    /// Resume a previously deferred event, redelivering it straight to the
    /// route it matched when parked (the validator chain already ran once;
    /// resuming does not re-ask the question that caused the defer).
    /// Returns `Ok(0)` if nothing is parked under `correlation_id`.
    pub async fn release(&self, correlation_id: &CorrelationId) -> Result<usize, MeshError> {
        let Some(parked) = self.pending.take(correlation_id) else {
            return Ok(0);
        };
        self.dispatch_to_route(&parked.route, parked.event).await
    }

    async fn dispatch_to_route(&self, route: &Route, event: Event) -> Result<usize, MeshError> {
        let mut delivered = 0;
        match route.fanout {
            Fanout::All => {
                for target in &route.targets {
                    delivered += self.deliver_with_diagnostics(target, event.clone()).await?;
                }
            }
            Fanout::FirstAvailable => {
                for target in &route.targets {
                    let count = self.deliver_with_diagnostics(target, event.clone()).await?;
                    if count > 0 {
                        delivered += count;
                        break;
                    }
                }
            }
        }
        Ok(delivered)
    }

    /// Attempt delivery to a single target, emitting the priority-specific
    /// overflow diagnostic on a full queue before surfacing the error.
    async fn deliver_with_diagnostics(&self, target: &ComponentId, event: Event) -> Result<usize, MeshError> {
        match self.deliver(target, event.clone()).await {
            Ok(true) => Ok(1),
            Ok(false) => Ok(0),
            Err(MeshError::TargetBusy { target: busy }) => {
                match event.priority {
                    Priority::Low => {
                        self.dropped_count.fetch_add(1, Ordering::Relaxed);
                        self.emit_dropped(&event, Some(target), "target queue full").await;
                    }
                    Priority::Normal => {
                        self.emit_dropped(&event, Some(target), "target queue full past backpressure deadline")
                            .await;
                    }
                    Priority::High | Priority::Critical => {
                        self.emit_overflow_anomaly(&event, target).await;
                    }
                }
                Err(MeshError::TargetBusy { target: busy })
            }
            Err(other) => Err(other),
        }
    }

    /// Send to a single target's queue, never attempting a route that has no
    /// live subscription (a route naming a target that hasn't started yet
    /// is not itself an error — the control plane may still be bringing
    /// kernels up). The overflow policy differs by priority (spec §4.3 step
    /// 4): `Low`/`Normal` never block past a (zero or configured) deadline,
    /// `High`/`Critical` never block at all — they fail over to an anomaly
    /// instead.
    async fn deliver(&self, target: &ComponentId, event: Event) -> Result<bool, MeshError> {
        let tx = {
            let subscribers = self.subscribers.read();
            match subscribers.get(target) {
                Some(sub) => sub.tx.clone(),
                None => return Ok(false),
            }
        };

        match event.priority {
            Priority::Critical | Priority::High => match tx.try_send(event) {
                Ok(()) => Ok(true),
                Err(mpsc::error::TrySendError::Full(_)) => {
                    Err(MeshError::TargetBusy { target: target.as_str().to_string() })
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    Err(MeshError::UnknownTarget(target.as_str().to_string()))
                }
            },
            Priority::Normal => {
                match tokio::time::timeout(self.normal_backpressure_deadline, tx.send(event)).await {
                    Ok(Ok(())) => Ok(true),
                    Ok(Err(_)) => Err(MeshError::UnknownTarget(target.as_str().to_string())),
                    Err(_elapsed) => Err(MeshError::TargetBusy { target: target.as_str().to_string() }),
                }
            }
            Priority::Low => match tx.try_send(event) {
                Ok(()) => Ok(true),
                Err(mpsc::error::TrySendError::Full(_)) => {
                    Err(MeshError::TargetBusy { target: target.as_str().to_string() })
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    Err(MeshError::UnknownTarget(target.as_str().to_string()))
                }
            },
        }
    }

    /// Publish a `mesh.event.dropped` diagnostic for a validator-rejected or
    /// overflow-dropped event.
    async fn emit_dropped(&self, event: &Event, target: Option<&ComponentId>, reason: &str) {
        let payload = serde_json::json!({
            "event_id": event.id.to_string(),
            "event_type": event.event_type.as_str(),
            "source": event.source.as_str(),
            "target": target.map(ComponentId::as_str),
            "reason": reason,
        });
        let mut dropped = Event::new(DROPPED_EVENT_TYPE, MESH_SOURCE, wall_timestamp(), Priority::High, payload);
        if let Some(correlation_id) = event.correlation_id.clone() {
            dropped = dropped.with_correlation(correlation_id);
        }
        self.emit_diagnostic(dropped).await;
    }

    /// Publish an `anomaly.detected` event when a `High`/`Critical` event
    /// cannot be delivered because its target's queue is full (spec §4.3
    /// step 4, §8 boundary scenario "queue full + priority=high").
    async fn emit_overflow_anomaly(&self, event: &Event, target: &ComponentId) {
        let severity = match event.priority {
            Priority::Critical => Severity::Critical,
            _ => Severity::High,
        };
        let mut anomaly = Anomaly::new(AnomalyType::Resource, severity, target.clone(), MESH_SOURCE, 1.0);
        anomaly.context = serde_json::json!({
            "event_id": event.id.to_string(),
            "event_type": event.event_type.as_str(),
            "reason": "target queue full, producer did not block",
        });
        let payload = serde_json::to_value(&anomaly).unwrap_or(serde_json::Value::Null);
        let mut anomaly_event = Event::new(ANOMALY_DETECTED_EVENT, MESH_SOURCE, wall_timestamp(), event.priority, payload);
        if let Some(correlation_id) = event.correlation_id.clone() {
            anomaly_event = anomaly_event.with_correlation(correlation_id);
        }
        self.emit_diagnostic(anomaly_event).await;
    }

    /// Best-effort self-originated diagnostic dispatch: resolves the
    /// winning route and writes straight to subscriber queues, bypassing
    /// both the validator chain and this struct's own overflow handling —
    /// a diagnostic about a full queue must never itself be able to
    /// recurse into another diagnostic.
    async fn emit_diagnostic(&self, event: Event) {
        if matches!(event.priority, Priority::Critical | Priority::High) {
            if let Some(journal) = &self.journal {
                let _ = journal.submit(event.clone()).await;
            }
        }

        let generation = self.table.snapshot();
        let matches = generation.resolve(event.source.as_str(), event.event_type.as_str());
        let Some(route) = matches.first().copied() else {
            return;
        };

        match route.fanout {
            Fanout::All => {
                for target in &route.targets {
                    self.try_send_best_effort(target, event.clone());
                }
            }
            Fanout::FirstAvailable => {
                for target in &route.targets {
                    if self.try_send_best_effort(target, event.clone()) {
                        break;
                    }
                }
            }
        }
    }

    fn try_send_best_effort(&self, target: &ComponentId, event: Event) -> bool {
        let tx = self.subscribers.read().get(target).map(|sub| sub.tx.clone());
        match tx {
            Some(tx) => tx.try_send(event).is_ok(),
            None => false,
        }
    }
}

fn wall_timestamp() -> Timestamp {
    let epoch_ms = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis() as u64;
    Timestamp::from_epoch_ms(epoch_ms)
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
