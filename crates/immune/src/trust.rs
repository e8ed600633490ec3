// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-resource trust scores (spec §4.7: "On success, adjust the affected
//! kernel's trust score upward by a fixed increment; on failure, downward;
//! trust scores affect future synthesis weights").
//!
//! This store only tracks the scores themselves. Feeding an adjustment
//! into `grace-synth`'s per-source weights is the daemon's job, done
//! through the shared core context rather than a direct dependency
//! between the two crates (spec §9's "no hidden globals" redesign note).

use std::collections::HashMap;

use grace_core::ComponentId;
use parking_lot::RwLock;

/// Trust score increment applied on successful remediation (spec §4.7).
pub const TRUST_INCREMENT: f64 = 0.05;
/// Trust score decrement applied on failed remediation (spec §4.7).
pub const TRUST_DECREMENT: f64 = 0.1;
/// Trust score assigned to a resource the store has never seen.
pub const DEFAULT_TRUST: f64 = 0.5;

#[derive(Default)]
pub struct TrustStore {
    scores: RwLock<HashMap<ComponentId, f64>>,
}

impl TrustStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self, resource: &ComponentId) -> f64 {
        self.scores.read().get(resource).copied().unwrap_or(DEFAULT_TRUST)
    }

    /// Apply `delta`, clamped to `[0, 1]`, returning the new score.
    pub fn adjust(&self, resource: ComponentId, delta: f64) -> f64 {
        let mut scores = self.scores.write();
        let score = scores.entry(resource).or_insert(DEFAULT_TRUST);
        *score = (*score + delta).clamp(0.0, 1.0);
        *score
    }

    pub fn on_remediation_success(&self, resource: ComponentId) -> f64 {
        self.adjust(resource, TRUST_INCREMENT)
    }

    pub fn on_remediation_failure(&self, resource: ComponentId) -> f64 {
        self.adjust(resource, -TRUST_DECREMENT)
    }

    pub fn snapshot(&self) -> HashMap<ComponentId, f64> {
        self.scores.read().clone()
    }
}

#[cfg(test)]
#[path = "trust_tests.rs"]
mod tests;
