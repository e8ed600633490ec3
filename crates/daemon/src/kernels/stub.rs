// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A business-logic-free kernel that still satisfies the uniform contract
//! (spec §4.2). The runtime core doesn't specify what any individual named
//! domain kernel (an ml scorer, a learning loop, a memory store...) does —
//! only the contract it must honor to be hosted at all. `StubKernel` is
//! that contract with nothing behind it: it subscribes, drains whatever it
//! receives, and reports whatever liveness its [`StubControl`] handle was
//! last told to report. Used both for scenario tests that need a scriptable
//! tier-2+ kernel and to stand in for a not-yet-built domain kernel at boot.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use grace_core::{Event, KernelDescriptor};
use parking_lot::Mutex;

use grace_control::error::ControlError;
use grace_control::kernel::{HandleOutcome, HeartbeatStatus, Kernel, KernelContext};

/// Shared handle a test or operator uses to script a running [`StubKernel`].
#[derive(Clone)]
pub struct StubControl {
    alive: Arc<AtomicBool>,
    received: Arc<AtomicU32>,
}

impl StubControl {
    pub fn set_alive(&self, alive: bool) {
        self.alive.store(alive, Ordering::SeqCst);
    }

    pub fn received_count(&self) -> u32 {
        self.received.load(Ordering::SeqCst)
    }
}

pub struct StubKernel {
    descriptor: KernelDescriptor,
    alive: Arc<AtomicBool>,
    received: Arc<AtomicU32>,
    task: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

impl StubKernel {
    pub fn new(descriptor: KernelDescriptor) -> (Arc<Self>, StubControl) {
        let alive = Arc::new(AtomicBool::new(true));
        let received = Arc::new(AtomicU32::new(0));
        let control = StubControl { alive: Arc::clone(&alive), received: Arc::clone(&received) };
        (Arc::new(Self { descriptor, alive, received, task: Mutex::new(None) }), control)
    }
}

#[async_trait]
impl Kernel for StubKernel {
    fn descriptor(&self) -> &KernelDescriptor {
        &self.descriptor
    }

    async fn initialise(&self, ctx: &KernelContext) -> Result<(), ControlError> {
        let mut rx = ctx.mesh.subscribe(self.descriptor.name.clone());
        let received = Arc::clone(&self.received);
        let name = self.descriptor.name.clone();

        let handle = tokio::spawn(async move {
            while rx.recv().await.is_some() {
                received.fetch_add(1, Ordering::SeqCst);
                tracing::trace!(kernel = %name, "stub kernel received event");
            }
        });
        *self.task.lock() = Some(handle);
        Ok(())
    }

    async fn handle(&self, _event: Event) -> Result<HandleOutcome, ControlError> {
        self.received.fetch_add(1, Ordering::SeqCst);
        Ok(HandleOutcome::none())
    }

    async fn heartbeat(&self) -> HeartbeatStatus {
        if self.alive.load(Ordering::SeqCst) {
            HeartbeatStatus::Alive
        } else {
            HeartbeatStatus::Unresponsive
        }
    }

    async fn drain(&self) -> Result<(), ControlError> {
        if let Some(handle) = self.task.lock().take() {
            handle.abort();
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "stub_tests.rs"]
mod tests;
