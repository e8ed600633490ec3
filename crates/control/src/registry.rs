// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Kernel lifecycle map — plain data owned by one task (spec §9 redesign
//! note: "ad-hoc module-level state in supervisors" becomes a
//! `HashMap<name, KernelRecord>` mutated only in response to events, so
//! tests can feed a sequence of transitions and assert on the resulting
//! map without standing up a scheduler).

use std::collections::HashMap;
use std::sync::Arc;

use grace_core::{ComponentId, KernelDescriptor, KernelRecord, KernelState};
use parking_lot::RwLock;

use crate::error::ControlError;

/// Whether registration is currently allowed. Per spec §4.2: `register` is
/// permitted only during the boot phase, unless the registration is itself
/// an event produced by an already-registered meta-kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationWindow {
    Boot,
    Closed,
}

/// The control plane's exclusive view of every kernel's lifecycle record
/// (spec §3.2 "Ownership"). Other components only ever see a cloned
/// snapshot (spec §5 shared-resource policy).
#[derive(Default)]
pub struct KernelRegistry {
    records: RwLock<HashMap<ComponentId, KernelRecord>>,
    window: RwLock<RegistrationWindow>,
}

impl KernelRegistry {
    pub fn new() -> Self {
        Self { records: RwLock::new(HashMap::new()), window: RwLock::new(RegistrationWindow::Boot) }
    }

    /// Close the boot registration window. Called once `control.boot.complete`
    /// is emitted; after this, `register` succeeds only for calls flagged
    /// `from_meta_kernel`.
    pub fn close_boot_window(&self) {
        *self.window.write() = RegistrationWindow::Closed;
    }

    pub fn register(
        &self,
        descriptor: KernelDescriptor,
        heartbeat_deadline_epoch_ms: u64,
        from_meta_kernel: bool,
    ) -> Result<(), ControlError> {
        if *self.window.read() == RegistrationWindow::Closed && !from_meta_kernel {
            return Err(ControlError::RegistrationWindowClosed(descriptor.name.to_string()));
        }
        let mut records = self.records.write();
        if records.contains_key(&descriptor.name) {
            return Err(ControlError::AlreadyRegistered(descriptor.name.to_string()));
        }
        let name = descriptor.name.clone();
        records.insert(name, KernelRecord::new(descriptor, heartbeat_deadline_epoch_ms));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<KernelRecord> {
        self.records.read().get(name).cloned()
    }

    /// A snapshot of every record, for callers that must only observe.
    pub fn snapshot(&self) -> Vec<KernelRecord> {
        self.records.read().values().cloned().collect()
    }

    pub fn transition(&self, name: &str, next: KernelState) -> Result<(), ControlError> {
        let mut records = self.records.write();
        let record = records.get_mut(name).ok_or_else(|| ControlError::UnknownKernel(name.to_string()))?;
        if !record.state.can_transition_to(next) {
            return Err(ControlError::IllegalTransition(
                name.to_string(),
                format!("{:?} -> {:?}", record.state, next),
            ));
        }
        record.state = next;
        Ok(())
    }

    /// Force a state onto a fresh registration (`Unregistered -> Initialising`)
    /// without validating against the current state — used only at
    /// `register` time where the record was just created.
    pub fn force_state(&self, name: &str, state: KernelState) -> Result<(), ControlError> {
        let mut records = self.records.write();
        let record = records.get_mut(name).ok_or_else(|| ControlError::UnknownKernel(name.to_string()))?;
        record.state = state;
        Ok(())
    }

    pub fn record_heartbeat_miss(&self, name: &str) -> Result<u32, ControlError> {
        let mut records = self.records.write();
        let record = records.get_mut(name).ok_or_else(|| ControlError::UnknownKernel(name.to_string()))?;
        record.missed_heartbeats += 1;
        Ok(record.missed_heartbeats)
    }

    pub fn reset_heartbeat(&self, name: &str, next_deadline_epoch_ms: u64) -> Result<(), ControlError> {
        let mut records = self.records.write();
        let record = records.get_mut(name).ok_or_else(|| ControlError::UnknownKernel(name.to_string()))?;
        record.missed_heartbeats = 0;
        record.heartbeat_deadline_epoch_ms = next_deadline_epoch_ms;
        Ok(())
    }

    pub fn record_restart(&self, name: &str, at_epoch_ms: u64) -> Result<u32, ControlError> {
        let mut records = self.records.write();
        let record = records.get_mut(name).ok_or_else(|| ControlError::UnknownKernel(name.to_string()))?;
        record.restart_count += 1;
        record.last_restart_at_epoch_ms = Some(at_epoch_ms);
        Ok(record.restart_count)
    }

    pub fn remove(&self, name: &str) -> Option<KernelRecord> {
        self.records.write().remove(name)
    }

    pub fn names(&self) -> Vec<ComponentId> {
        self.records.read().keys().cloned().collect()
    }
}

pub type SharedRegistry = Arc<KernelRegistry>;

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
