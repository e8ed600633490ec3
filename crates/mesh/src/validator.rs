// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Route validators — named checks a route can require before dispatch
//! (spec §4.3). The mesh ships two built-ins; the governance crate
//! registers its own (constitutional, policy) against the same registry so
//! a manifest can require them by name without the mesh depending on
//! `grace-governance`.
//!
//! A validator's verdict is three-way, not a pass/fail boolean: `Pass` lets
//! dispatch proceed, `Drop` rejects the event outright, and `Defer` parks it
//! (keyed by `correlation_id`) until something later calls
//! [`crate::dispatch::Mesh::release`] — used by checks whose backing store
//! is temporarily unreachable, where an implicit pass would be a silent
//! approval and an outright drop would discard a request that might still
//! be answerable once the store recovers.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use grace_core::Event;

use crate::error::MeshError;

/// The outcome of one validator's check against an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatorOutcome {
    Pass,
    Drop(String),
    Defer,
}

#[async_trait]
pub trait Validator: Send + Sync {
    fn name(&self) -> &str;
    async fn validate(&self, event: &Event) -> ValidatorOutcome;
}

/// Rejects events whose `trust_score` is below a configured floor. Events
/// with no `trust_score` set pass through unchecked — trust scoring is
/// opt-in per event source.
pub struct TrustThreshold {
    pub minimum: f64,
}

#[async_trait]
impl Validator for TrustThreshold {
    fn name(&self) -> &str {
        "trust-threshold"
    }

    async fn validate(&self, event: &Event) -> ValidatorOutcome {
        match event.trust_score {
            Some(score) if score < self.minimum => {
                ValidatorOutcome::Drop(format!("trust_score {score} below required minimum {}", self.minimum))
            }
            _ => ValidatorOutcome::Pass,
        }
    }
}

/// Rejects events whose payload exceeds a configured byte size, guarding
/// against a single malformed publisher starving the mesh's bounded
/// per-target queues.
pub struct MaxPayloadSize {
    pub max_bytes: usize,
}

#[async_trait]
impl Validator for MaxPayloadSize {
    fn name(&self) -> &str {
        "max-payload-size"
    }

    async fn validate(&self, event: &Event) -> ValidatorOutcome {
        let size = serde_json::to_vec(&event.payload).map(|v| v.len()).unwrap_or(usize::MAX);
        if size > self.max_bytes {
            ValidatorOutcome::Drop(format!("payload is {size} bytes, exceeding limit of {}", self.max_bytes))
        } else {
            ValidatorOutcome::Pass
        }
    }
}

/// The outcome of running a route's full validator chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainOutcome {
    Pass,
    Drop { validator: String, reason: String },
    Defer { validator: String },
}

/// Registry of named validators a route can reference by
/// [`grace_core::ValidatorName`].
#[derive(Clone, Default)]
pub struct ValidatorRegistry {
    validators: HashMap<String, Arc<dyn Validator>>,
}

impl ValidatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, validator: Arc<dyn Validator>) {
        self.validators.insert(validator.name().to_string(), validator);
    }

    /// Run every validator named in `names` against `event` in order,
    /// stopping at the first non-`Pass` outcome.
    pub async fn validate_all(
        &self,
        names: &[grace_core::ValidatorName],
        event: &Event,
    ) -> Result<ChainOutcome, MeshError> {
        for name in names {
            let validator = self
                .validators
                .get(&name.0)
                .ok_or_else(|| MeshError::ValidatorRejected(name.0.clone(), "validator not registered".to_string()))?;
            match validator.validate(event).await {
                ValidatorOutcome::Pass => continue,
                ValidatorOutcome::Drop(reason) => {
                    return Ok(ChainOutcome::Drop { validator: name.0.clone(), reason })
                }
                ValidatorOutcome::Defer => return Ok(ChainOutcome::Defer { validator: name.0.clone() }),
            }
        }
        Ok(ChainOutcome::Pass)
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
