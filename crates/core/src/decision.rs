// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Unified decision data model — spec §3.6 / §4.6.
//!
//! The merge algorithm lives in `grace-synth`; this module is the shared
//! shape both the synthesizer and its inputs (`grace-governance`,
//! `grace-immune`, and the named ml/learning/memory kernels) agree on.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One of the five decision-producing sources the synthesizer merges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionSource {
    Governance,
    Immune,
    Ml,
    Learning,
    Memory,
}

impl DecisionSource {
    pub const ALL: [DecisionSource; 5] = [
        DecisionSource::Governance,
        DecisionSource::Immune,
        DecisionSource::Ml,
        DecisionSource::Learning,
        DecisionSource::Memory,
    ];

    /// Default synthesis weight (spec §4.6 rule 2).
    pub fn default_weight(self) -> f64 {
        match self {
            DecisionSource::Governance => 0.4,
            DecisionSource::Immune => 0.25,
            DecisionSource::Ml => 0.15,
            DecisionSource::Learning => 0.1,
            DecisionSource::Memory => 0.1,
        }
    }
}

/// A single source's input verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Approve,
    Deny,
    Abstain,
}

impl Verdict {
    /// `+1` for approve, `-1` for deny, `0` for abstain (spec §4.6 rule 2).
    pub fn sign(self) -> f64 {
        match self {
            Verdict::Approve => 1.0,
            Verdict::Deny => -1.0,
            Verdict::Abstain => 0.0,
        }
    }
}

/// One source's `(verdict, confidence, detail)` tuple (spec §3.6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceInput {
    pub verdict: Verdict,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
    pub detail: String,
}

impl SourceInput {
    pub fn new(verdict: Verdict, confidence: f64, detail: impl Into<String>) -> Self {
        Self { verdict, confidence: confidence.clamp(0.0, 1.0), detail: detail.into() }
    }
}

/// Final synthesized action and the targets it should route to (spec §3.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalAction {
    Approve,
    Deny,
    Defer,
}

/// Downstream surfaces a final action can be routed to (spec §4.6 rule 4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    AutonomousExecutor,
    UiSurface,
    LearningLoop,
    AuditOnly,
}

/// The synthesizer's output (spec §3.6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnifiedDecision {
    pub inputs: BTreeMap<DecisionSource, SourceInput>,
    pub synthesis_weights: BTreeMap<DecisionSource, f64>,
    #[serde(default)]
    pub override_reasons: Vec<String>,
    pub final_action: FinalAction,
    pub confidence: f64,
    pub targets: Vec<Target>,
}

#[cfg(test)]
#[path = "decision_tests.rs"]
mod tests;
