// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test-only kernel fixtures shared across this crate's test modules.

#![cfg(test)]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use grace_core::{Event, KernelDescriptor, KernelState};
use parking_lot::Mutex;

use crate::error::ControlError;
use crate::kernel::{HandleOutcome, HeartbeatStatus, Kernel, KernelContext};

/// A kernel whose behavior tests can script: how many times `initialise`
/// must be called before it succeeds, whether `heartbeat` reports alive,
/// and whether `handle` sleeps past its own latency budget.
pub struct FakeKernel {
    descriptor: KernelDescriptor,
    pub fail_initialise_times: AtomicU32,
    pub heartbeat_alive: Mutex<bool>,
    pub handle_delay: Mutex<Option<std::time::Duration>>,
    pub initialise_calls: AtomicU32,
    pub drain_calls: AtomicU32,
}

impl FakeKernel {
    pub fn new(descriptor: KernelDescriptor) -> Arc<Self> {
        Arc::new(Self {
            descriptor,
            fail_initialise_times: AtomicU32::new(0),
            heartbeat_alive: Mutex::new(true),
            handle_delay: Mutex::new(None),
            initialise_calls: AtomicU32::new(0),
            drain_calls: AtomicU32::new(0),
        })
    }

    pub fn fail_initialise(self: Arc<Self>, times: u32) -> Arc<Self> {
        self.fail_initialise_times.store(times, Ordering::SeqCst);
        self
    }
}

#[async_trait]
impl Kernel for FakeKernel {
    fn descriptor(&self) -> &KernelDescriptor {
        &self.descriptor
    }

    async fn initialise(&self, _ctx: &KernelContext) -> Result<(), ControlError> {
        let calls = self.initialise_calls.fetch_add(1, Ordering::SeqCst);
        let remaining = self.fail_initialise_times.load(Ordering::SeqCst);
        if calls < remaining {
            return Err(ControlError::InitialiseFailed(
                self.descriptor.name.to_string(),
                "scripted failure".to_string(),
            ));
        }
        Ok(())
    }

    async fn handle(&self, _event: Event) -> Result<HandleOutcome, ControlError> {
        if let Some(delay) = *self.handle_delay.lock() {
            tokio::time::sleep(delay).await;
        }
        Ok(HandleOutcome::none())
    }

    async fn heartbeat(&self) -> HeartbeatStatus {
        if *self.heartbeat_alive.lock() {
            HeartbeatStatus::Alive
        } else {
            HeartbeatStatus::Unresponsive
        }
    }

    async fn drain(&self) -> Result<(), ControlError> {
        self.drain_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub fn test_context() -> KernelContext {
    let store = Arc::new(grace_journal::InMemoryJournalStore::new());
    let journal = grace_journal::JournalWriter::spawn(store, 64);
    let mesh = Arc::new(grace_mesh::Mesh::new(
        Arc::new(grace_mesh::RouteTable::empty()),
        grace_mesh::ValidatorRegistry::new(),
    ));
    KernelContext { journal, mesh }
}
