// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hosts [`grace_synth::Synthesizer`] behind the uniform kernel contract
//! (spec §4.6). `synthesize` does its own journalling and publishing of
//! `synth.decision`/`synth.decision.quarantine`/`decision.contradiction`,
//! so this adapter is only the mesh subscription loop plus the wire shape
//! a `decision.synthesize` event carries (`SynthesisRequest` itself isn't
//! serde-derived, since nothing outside this crate needs to serialize one).

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use grace_core::{Clock, CorrelationId, DecisionSource, Event, KernelDescriptor, SourceInput, Tier};
use grace_synth::{SynthesisRequest, Synthesizer};
use serde::Deserialize;
use tokio::sync::Mutex;

use grace_control::error::ControlError;
use grace_control::kernel::{HandleOutcome, HeartbeatStatus, Kernel, KernelContext};

pub const SYNTHESIZE_EVENT: &str = "decision.synthesize";

/// Wire shape of a `decision.synthesize` event payload.
#[derive(Debug, Deserialize)]
struct SynthesizeRequestWire {
    #[serde(default)]
    correlation_id: Option<CorrelationId>,
    inputs: BTreeMap<DecisionSource, SourceInput>,
    #[serde(default)]
    immune_critical_anomaly: bool,
    #[serde(default)]
    quarantine_target: Option<String>,
}

impl From<SynthesizeRequestWire> for SynthesisRequest {
    fn from(wire: SynthesizeRequestWire) -> Self {
        let mut request = SynthesisRequest::new();
        if let Some(correlation_id) = wire.correlation_id {
            request = request.with_correlation(correlation_id);
        }
        for (source, input) in wire.inputs {
            request = request.with_input(source, input);
        }
        if wire.immune_critical_anomaly {
            request = request.with_immune_critical_anomaly(wire.quarantine_target.unwrap_or_default());
        }
        request
    }
}

pub struct SynthKernel<C: Clock> {
    descriptor: KernelDescriptor,
    inner: Arc<Synthesizer<C>>,
    task: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

impl<C: Clock + Send + Sync + 'static> SynthKernel<C> {
    pub fn new(inner: Arc<Synthesizer<C>>) -> Arc<Self> {
        let descriptor = KernelDescriptor::new("synth.synthesizer", Tier::CRITICAL)
            .with_capability("synth.synthesize");
        Arc::new(Self { descriptor, inner, task: Mutex::new(None) })
    }
}

#[async_trait]
impl<C: Clock + Send + Sync + 'static> Kernel for SynthKernel<C> {
    fn descriptor(&self) -> &KernelDescriptor {
        &self.descriptor
    }

    async fn initialise(&self, ctx: &KernelContext) -> Result<(), ControlError> {
        let mut rx = ctx.mesh.subscribe(self.descriptor.name.clone());
        let inner = Arc::clone(&self.inner);
        let name = self.descriptor.name.clone();

        let handle = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                if event.event_type.as_str() != SYNTHESIZE_EVENT {
                    continue;
                }
                match serde_json::from_value::<SynthesizeRequestWire>(event.payload.clone()) {
                    Ok(wire) => {
                        if let Err(err) = inner.synthesize(wire.into()).await {
                            tracing::error!(%err, kernel = %name, "synthesizer failed to merge decision inputs");
                        }
                    }
                    Err(err) => {
                        tracing::warn!(%err, kernel = %name, "malformed decision.synthesize payload");
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
#[path = "synth_kernel_tests.rs"]
mod tests;
