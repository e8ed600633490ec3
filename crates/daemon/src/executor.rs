// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Maps [`RemediationAction`] onto the control-plane calls this core
//! actually owns (spec §4.7 "Remediation actions... call into the
//! control plane"). `restart` and `quarantine` drive [`KernelHost`]
//! directly; everything else named in the vocabulary but outside this
//! core's reach (scaling a fleet, rotating a credential, rolling back a
//! deployment) is logged and reported as a no-op rather than guessed at —
//! a real deployment wires those through whatever orchestrator owns them.

use std::sync::Arc;

use async_trait::async_trait;
use grace_core::{Clock, ComponentId};
use grace_immune::{ActionExecutor, RemediationAction};

use grace_control::host::KernelHost;

pub struct ControlPlaneExecutor<C: Clock> {
    host: Arc<KernelHost<C>>,
}

impl<C: Clock + Send + Sync + 'static> ControlPlaneExecutor<C> {
    pub fn new(host: Arc<KernelHost<C>>) -> Self {
        Self { host }
    }
}

#[async_trait]
impl<C: Clock + Send + Sync + 'static> ActionExecutor for ControlPlaneExecutor<C> {
    async fn execute(&self, action: RemediationAction, resource: &ComponentId) -> Result<(), String> {
        match action {
            RemediationAction::Restart => self
                .host
                .restart(resource.as_str(), "immune-playbook")
                .await
                .map_err(|err| err.to_string()),
            RemediationAction::Quarantine => self
                .host
                .stop(resource.as_str())
                .await
                .map_err(|err| err.to_string()),
            RemediationAction::OpenCircuitBreaker => {
                self.host.degraded_mode.disable(resource.clone());
                Ok(())
            }
            RemediationAction::Scale
            | RemediationAction::Rollback
            | RemediationAction::RotateCredential
            | RemediationAction::NotifyParliament => {
                tracing::info!(
                    action = action.as_str(),
                    resource = %resource,
                    "remediation action is outside this core's control plane, no-op"
                );
                Ok(())
            }
        }
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
