// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-source synthesis weights (spec §4.6 rule 2).
//!
//! Weights are configuration, not constants (spec §9's general preference
//! for data over hardcoding): loaded once from the default table, then
//! adjustable at runtime as the immune kernel's trust-score feedback comes
//! in (spec §9 on `grace-immune`). Reads never block a write in progress —
//! same read-mostly, copy-on-write generation shape the governance policy
//! and playbook stores use.

use std::collections::BTreeMap;
use std::sync::Arc;

use grace_core::DecisionSource;
use parking_lot::RwLock;

#[derive(Debug, Clone)]
struct WeightGeneration {
    version: u64,
    by_source: BTreeMap<DecisionSource, f64>,
}

/// Holds the live generation of per-source weights.
pub struct WeightStore {
    current: RwLock<Arc<WeightGeneration>>,
}

impl WeightStore {
    /// Start from spec §4.6's default weight table.
    pub fn new() -> Self {
        let by_source = DecisionSource::ALL.iter().map(|s| (*s, s.default_weight())).collect();
        Self { current: RwLock::new(Arc::new(WeightGeneration { version: 1, by_source })) }
    }

    pub fn version(&self) -> u64 {
        self.current.read().version
    }

    /// Snapshot the current weights as a plain map, for embedding in a
    /// [`grace_core::UnifiedDecision`].
    pub fn snapshot(&self) -> BTreeMap<DecisionSource, f64> {
        self.current.read().by_source.clone()
    }

    /// Apply a trust-score-driven delta to one source's weight, producing a
    /// new generation. Clamped to `[0, 1]`; callers pass a signed delta
    /// (positive on remediation success, negative on failure, per spec
    /// §4.7's trust-score adjustment).
    pub fn adjust(&self, source: DecisionSource, delta: f64) {
        let mut next = (**self.current.read()).clone();
        next.version += 1;
        let weight = next.by_source.entry(source).or_insert_with(|| source.default_weight());
        *weight = (*weight + delta).clamp(0.0, 1.0);
        *self.current.write() = Arc::new(next);
    }

    /// Replace the whole table outright (e.g. from an operator-supplied
    /// reload), bumping the generation.
    pub fn reload(&self, by_source: BTreeMap<DecisionSource, f64>) {
        let next_version = self.current.read().version + 1;
        *self.current.write() = Arc::new(WeightGeneration { version: next_version, by_source });
    }
}

impl Default for WeightStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "weights_tests.rs"]
mod tests;
