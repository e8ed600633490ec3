// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Kernel (component) data model — spec §3.2 / §4.2.
//!
//! This module only holds the plain-data shape of a kernel's registration
//! and lifecycle record. The behavioral contract (`initialise`/`handle`/
//! `heartbeat`/`drain`/`snapshot`) lives in `grace-control`, which is the
//! only thing allowed to mutate these records (spec §3.2 "Ownership").

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::event::{ComponentId, Priority};

/// Kernel tier. Tier 1 is infrastructure whose failure cannot be masked by
/// degraded mode (journal, mesh, control plane); 2-5 are non-critical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Tier(pub u8);

impl Tier {
    pub const CRITICAL: Tier = Tier(1);

    pub fn is_critical(self) -> bool {
        self == Self::CRITICAL
    }
}

/// Kernel lifecycle state (spec §3.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KernelState {
    Unregistered,
    Initialising,
    Ready,
    Degraded,
    Failed,
    Quarantined,
}

impl KernelState {
    /// Whether `next` is a legal transition from `self`, per the lifecycle
    /// table in spec §3.2.
    pub fn can_transition_to(self, next: KernelState) -> bool {
        use KernelState::*;
        matches!(
            (self, next),
            (Unregistered, Initialising)
                | (Initialising, Ready)
                | (Initialising, Failed)
                | (Ready, Degraded)
                | (Degraded, Ready)
                | (Ready, Failed)
                | (Degraded, Failed)
                | (Failed, Ready)
                | (Failed, Quarantined)
        )
    }
}

/// A declared subscription pattern: an event type pattern with an optional
/// minimum priority filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionPattern {
    pub event_type_pattern: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_priority: Option<Priority>,
}

/// Per-kernel operating budgets (spec §6 registration descriptor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budgets {
    pub handle_latency_ms: u64,
    pub heartbeat_interval_s: u64,
    pub max_restarts: u32,
}

impl Default for Budgets {
    fn default() -> Self {
        Self { handle_latency_ms: 200, heartbeat_interval_s: 10, max_restarts: 3 }
    }
}

/// Registration descriptor a kernel presents to the host at boot (spec §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KernelDescriptor {
    pub name: ComponentId,
    pub tier: Tier,
    pub capabilities: BTreeSet<String>,
    pub subscriptions: Vec<SubscriptionPattern>,
    pub budgets: Budgets,
    pub snapshot_supported: bool,
}

impl KernelDescriptor {
    pub fn new(name: impl Into<ComponentId>, tier: Tier) -> Self {
        Self {
            name: name.into(),
            tier,
            capabilities: BTreeSet::new(),
            subscriptions: Vec::new(),
            budgets: Budgets::default(),
            snapshot_supported: false,
        }
    }

    pub fn with_capability(mut self, capability: impl Into<String>) -> Self {
        self.capabilities.insert(capability.into());
        self
    }

    pub fn with_subscription(mut self, pattern: SubscriptionPattern) -> Self {
        self.subscriptions.push(pattern);
        self
    }

    /// A stable fingerprint derived from capabilities, used to detect a
    /// quarantined kernel re-registering under a new name (spec §4.7 cooldown).
    pub fn capability_fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        for cap in &self.capabilities {
            hasher.update(cap.as_bytes());
            hasher.update(b"\0");
        }
        format!("{:x}", hasher.finalize())
    }
}

/// The control plane's live record for a registered kernel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KernelRecord {
    pub descriptor: KernelDescriptor,
    pub state: KernelState,
    pub heartbeat_deadline_epoch_ms: u64,
    pub missed_heartbeats: u32,
    pub restart_count: u32,
    pub last_restart_at_epoch_ms: Option<u64>,
}

impl KernelRecord {
    pub fn new(descriptor: KernelDescriptor, heartbeat_deadline_epoch_ms: u64) -> Self {
        Self {
            descriptor,
            state: KernelState::Unregistered,
            heartbeat_deadline_epoch_ms,
            missed_heartbeats: 0,
            restart_count: 0,
            last_restart_at_epoch_ms: None,
        }
    }

    pub fn restart_budget_exhausted(&self) -> bool {
        self.restart_count >= self.descriptor.budgets.max_restarts
    }
}

#[cfg(test)]
#[path = "kernel_tests.rs"]
mod tests;
