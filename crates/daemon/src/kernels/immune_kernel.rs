// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hosts [`grace_immune::ImmuneKernel`] behind the uniform kernel
//! contract (spec §4.7). Every `anomaly.detected` event routed to this
//! kernel's target name is classified, remediated, and fed back into the
//! trust store; `ingest` does its own journalling and publishing, so this
//! adapter only owns the mesh subscription loop.

use std::sync::Arc;

use async_trait::async_trait;
use grace_core::{Anomaly, Clock, DecisionSource, Event, KernelDescriptor, Tier};
use grace_immune::ImmuneKernel;
use grace_synth::WeightStore;
use tokio::sync::Mutex;

use grace_control::error::ControlError;
use grace_control::kernel::{HandleOutcome, HeartbeatStatus, Kernel, KernelContext};

pub const ANOMALY_DETECTED_EVENT: &str = "anomaly.detected";

/// Synthesis-weight nudge applied to [`DecisionSource::Immune`] per
/// remediation outcome — smaller than [`grace_immune::TRUST_INCREMENT`]/
/// [`grace_immune::TRUST_DECREMENT`] since this moves a *source's* standing
/// across every future decision, not one resource's trust score (spec §9:
/// "trust-score adjustment feeds back into the synthesizer's per-source
/// weights through the core context").
const IMMUNE_WEIGHT_INCREMENT: f64 = 0.02;
const IMMUNE_WEIGHT_DECREMENT: f64 = 0.04;

pub struct ImmuneKernelAdapter<C: Clock> {
    descriptor: KernelDescriptor,
    inner: Arc<ImmuneKernel<C>>,
    weights: Arc<WeightStore>,
    task: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

impl<C: Clock + Send + Sync + 'static> ImmuneKernelAdapter<C> {
    pub fn new(inner: Arc<ImmuneKernel<C>>, weights: Arc<WeightStore>) -> Arc<Self> {
        let descriptor = KernelDescriptor::new("immune.kernel", Tier::CRITICAL)
            .with_capability("immune.ingest");
        Arc::new(Self { descriptor, inner, weights, task: Mutex::new(None) })
    }
}

#[async_trait]
impl<C: Clock + Send + Sync + 'static> Kernel for ImmuneKernelAdapter<C> {
    fn descriptor(&self) -> &KernelDescriptor {
        &self.descriptor
    }

    async fn initialise(&self, ctx: &KernelContext) -> Result<(), ControlError> {
        let mut rx = ctx.mesh.subscribe(self.descriptor.name.clone());
        let inner = Arc::clone(&self.inner);
        let weights = Arc::clone(&self.weights);
        let name = self.descriptor.name.clone();

        let handle = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                if event.event_type.as_str() != ANOMALY_DETECTED_EVENT {
                    continue;
                }
                match serde_json::from_value::<Anomaly>(event.payload.clone()) {
                    Ok(anomaly) => match inner.ingest(anomaly, event.correlation_id.clone()).await {
                        Ok(response) => {
                            let delta = if response.remediation.success {
                                IMMUNE_WEIGHT_INCREMENT
                            } else {
                                -IMMUNE_WEIGHT_DECREMENT
                            };
                            weights.adjust(DecisionSource::Immune, delta);
                        }
                        Err(err) => {
                            tracing::error!(%err, kernel = %name, "immune kernel failed to remediate anomaly");
                        }
                    },
                    Err(err) => {
                        tracing::warn!(%err, kernel = %name, "malformed anomaly.detected payload");
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
            _ => HeartbeatStatus::Unresponsive,
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
#[path = "immune_kernel_tests.rs"]
mod tests;
