// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hosts the governance gate (spec §4.5) behind the uniform kernel
//! contract: every `governance.request` event routed to this kernel's
//! target name runs the five-stage pipeline. The gate itself does all the
//! journalling and `governance.decision` publishing (spec §4.5 "logs every
//! stage result to the journal; publishes `governance.decision`"); this
//! adapter is only the mesh plumbing around it.

use std::sync::Arc;

use async_trait::async_trait;
use grace_core::{Clock, Event, GovernanceRequest, KernelDescriptor, Tier};
use grace_governance::Gate;
use tokio::sync::Mutex;

use grace_control::error::ControlError;
use grace_control::kernel::{HandleOutcome, HeartbeatStatus, Kernel, KernelContext};

pub const GOVERNANCE_REQUEST_EVENT: &str = "governance.request";

/// Adapts [`Gate`] to the uniform kernel contract: subscribes to its own
/// target name on the mesh and feeds every `governance.request` it
/// receives through `validate`. The gate publishes `governance.decision`
/// itself, so `handle` here is never reached — routing is self-driven,
/// not host-driven.
pub struct GovernanceKernel<C: Clock> {
    descriptor: KernelDescriptor,
    gate: Arc<Gate<C>>,
    task: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

impl<C: Clock + Send + Sync + 'static> GovernanceKernel<C> {
    pub fn new(gate: Arc<Gate<C>>) -> Arc<Self> {
        let descriptor = KernelDescriptor::new("governance.gate", Tier::CRITICAL)
            .with_capability("governance.validate");
        Arc::new(Self { descriptor, gate, task: Mutex::new(None) })
    }
}

#[async_trait]
impl<C: Clock + Send + Sync + 'static> Kernel for GovernanceKernel<C> {
    fn descriptor(&self) -> &KernelDescriptor {
        &self.descriptor
    }

    async fn initialise(&self, ctx: &KernelContext) -> Result<(), ControlError> {
        let mut rx = ctx.mesh.subscribe(self.descriptor.name.clone());
        let gate = Arc::clone(&self.gate);
        let name = self.descriptor.name.clone();

        let handle = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                if event.event_type.as_str() != GOVERNANCE_REQUEST_EVENT {
                    continue;
                }
                match serde_json::from_value::<GovernanceRequest>(event.payload.clone()) {
                    Ok(request) => {
                        if let Err(err) = gate.validate(request).await {
                            tracing::error!(%err, kernel = %name, "governance gate failed to evaluate request");
                        }
                    }
                    Err(err) => {
                        tracing::warn!(%err, kernel = %name, "malformed governance.request payload");
                    }
                }
            }
        });
        *self.task.lock().await = Some(handle);
        Ok(())
    }

    async fn handle(&self, _event: Event) -> Result<HandleOutcome, ControlError> {
        Ok(HandleOutcome::none())
    }

    async fn heartbeat(&self) -> HeartbeatStatus {
        match self.task.lock().await.as_ref() {
            Some(handle) if !handle.is_finished() => HeartbeatStatus::Alive,
            Some(_) => HeartbeatStatus::Unresponsive,
            None => HeartbeatStatus::Unresponsive,
        }
    }

    async fn drain(&self) -> Result<(), ControlError> {
        if let Some(handle) = self.task.lock().await.take() {
            handle.abort();
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "governance_kernel_tests.rs"]
mod tests;
