// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Adapts the constitutional and policy stages to [`grace_mesh::Validator`]
//! so a route manifest can require either by name (spec §4.3 "validators:
//! optional ordered list of validator names (e.g., constitutional,
//! trust-threshold)") without the mesh crate depending on this one.
//!
//! Both validators deserialize the event payload as a
//! [`grace_core::GovernanceRequest`]; an event that isn't shaped like one
//! passes through untouched, the same opt-in posture `grace_mesh`'s own
//! `trust-threshold` validator takes for events with no `trust_score`.

use std::sync::Arc;

use async_trait::async_trait;
use grace_core::{Event, GovernanceRequest, StageVerdict};
use grace_mesh::{Validator, ValidatorOutcome};

use crate::constitutional::ConstitutionalStore;
use crate::policy::PolicyStore;

/// Runs the constitutional check (stage 1) as a mesh validator.
pub struct ConstitutionalValidator {
    store: Arc<ConstitutionalStore>,
}

impl ConstitutionalValidator {
    pub fn new(store: Arc<ConstitutionalStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Validator for ConstitutionalValidator {
    fn name(&self) -> &str {
        "constitutional"
    }

    async fn validate(&self, event: &Event) -> ValidatorOutcome {
        let Ok(request) = serde_json::from_value::<GovernanceRequest>(event.payload.clone()) else {
            return ValidatorOutcome::Pass;
        };
        let (result, _) = self.store.check(&request);
        match result.verdict {
            StageVerdict::Fail => ValidatorOutcome::Drop(result.detail),
            _ => ValidatorOutcome::Pass,
        }
    }
}

/// Runs the policy check (stage 2) as a mesh validator. `require-approval`
/// is not itself a drop — only an outright `deny` stops the event here;
/// routing to the full governance gate is what actually opens a
/// parliament session.
pub struct PolicyValidator {
    store: Arc<PolicyStore>,
}

impl PolicyValidator {
    pub fn new(store: Arc<PolicyStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Validator for PolicyValidator {
    fn name(&self) -> &str {
        "policy"
    }

    async fn validate(&self, event: &Event) -> ValidatorOutcome {
        let Ok(request) = serde_json::from_value::<GovernanceRequest>(event.payload.clone()) else {
            return ValidatorOutcome::Pass;
        };
        match self.store.check(&request) {
            Ok((result, _)) => match result.verdict {
                StageVerdict::Fail => ValidatorOutcome::Drop(result.detail),
                _ => ValidatorOutcome::Pass,
            },
            // Deferred, not denied: an unreachable policy store parks the
            // event (the mesh keys the park on the event's own
            // `correlation_id`) rather than letting it through as an
            // implicit approval or discarding it outright.
            Err(_) => ValidatorOutcome::Defer,
        }
    }
}

#[cfg(test)]
#[path = "mesh_validators_tests.rs"]
mod tests;
