// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The unified decision synthesizer (spec §3.6 / §4.6): merges per-source
//! verdicts into one routed decision so downstream executors never see
//! contradictory inputs. Hard overrides run first, then a weighted score
//! against a fixed threshold, with ties breaking toward the more
//! conservative verdict by construction of the threshold bands.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use grace_core::{
    Clock, CorrelationId, DecisionSource, Event, FinalAction, Priority, SourceInput, Target,
    Timestamp, UnifiedDecision, Verdict,
};
use grace_journal::JournalWriter;
use grace_mesh::Mesh;

use crate::error::SynthError;
use crate::weights::WeightStore;

const SYNTH_SOURCE: &str = "synth.synthesizer";

/// Score at or above which the merged verdict is `approve` (spec §4.6 rule 3).
pub const APPROVE_THRESHOLD: f64 = 0.2;
/// Score at or below which the merged verdict is `deny` (spec §4.6 rule 3).
pub const DENY_THRESHOLD: f64 = -0.2;
/// Confidence floor for two opposite verdicts to count as a contradiction
/// (spec §4.6 tie-breaks: "exactly opposite high-confidence verdicts").
pub const CONTRADICTION_CONFIDENCE: f64 = 0.7;

/// One synthesis call's inputs (spec §3.6/§4.6).
#[derive(Debug, Clone, Default)]
pub struct SynthesisRequest {
    pub correlation_id: Option<CorrelationId>,
    pub inputs: BTreeMap<DecisionSource, SourceInput>,
    /// Set when the immune kernel has classified the situation as a
    /// critical anomaly — triggers the rule-1 hard override independently
    /// of whatever verdict/confidence the immune source itself reported
    /// (spec §4.6 rule 1: "Immune `critical-anomaly` ⇒ final `deny` + route
    /// to quarantine").
    pub immune_critical_anomaly: bool,
    /// Set when the critical anomaly names a specific kernel to quarantine.
    pub quarantine_target: Option<String>,
}

impl SynthesisRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_correlation(mut self, correlation_id: CorrelationId) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }

    pub fn with_input(mut self, source: DecisionSource, input: SourceInput) -> Self {
        self.inputs.insert(source, input);
        self
    }

    pub fn with_immune_critical_anomaly(mut self, quarantine_target: impl Into<String>) -> Self {
        self.immune_critical_anomaly = true;
        self.quarantine_target = Some(quarantine_target.into());
        self
    }
}

fn targets_for(action: FinalAction) -> Vec<Target> {
    match action {
        FinalAction::Approve => vec![Target::AutonomousExecutor, Target::UiSurface, Target::LearningLoop],
        FinalAction::Deny => vec![Target::UiSurface, Target::AuditOnly],
        FinalAction::Defer => vec![Target::UiSurface, Target::LearningLoop],
    }
}

/// True when two sources hold opposite verdicts, both at or above
/// [`CONTRADICTION_CONFIDENCE`] (spec §4.6 tie-breaks).
fn detect_contradiction(inputs: &BTreeMap<DecisionSource, SourceInput>) -> bool {
    let high_confidence = |v: Verdict| {
        inputs.values().any(|i| i.verdict == v && i.confidence >= CONTRADICTION_CONFIDENCE)
    };
    high_confidence(Verdict::Approve) && high_confidence(Verdict::Deny)
}

/// Ties weighted merge, journalling, and mesh publication together (spec
/// §4.6). Generic over the clock so tests can drive deterministic
/// timestamps, matching `grace-governance::Gate`.
pub struct Synthesizer<C: Clock> {
    weights: Arc<WeightStore>,
    journal: JournalWriter,
    mesh: Arc<Mesh>,
    clock: C,
    origin: Instant,
}

impl<C: Clock> Synthesizer<C> {
    pub fn new(weights: Arc<WeightStore>, journal: JournalWriter, mesh: Arc<Mesh>, clock: C) -> Self {
        Self { weights, journal, mesh, origin: Instant::now(), clock }
    }

    pub fn weights(&self) -> &Arc<WeightStore> {
        &self.weights
    }

    /// Merge `request`'s per-source inputs into one [`UnifiedDecision`],
    /// journal it, and publish `synth.decision`. Also publishes
    /// `synth.decision.quarantine` when the immune hard override fired, and
    /// `decision.contradiction` when two sources disagreed at high
    /// confidence (spec §4.6).
    pub async fn synthesize(&self, request: SynthesisRequest) -> Result<UnifiedDecision, SynthError> {
        if request.inputs.is_empty() {
            return Err(SynthError::NoInputs);
        }

        let weights = self.weights.snapshot();
        let mut override_reasons = Vec::new();

        let governance_denied = request
            .inputs
            .get(&DecisionSource::Governance)
            .map(|i| i.verdict == Verdict::Deny)
            .unwrap_or(false);
        if governance_denied {
            override_reasons.push("governance denied: hard override wins".to_string());
        }
        if request.immune_critical_anomaly {
            override_reasons.push("immune reported a critical anomaly: hard override wins".to_string());
        }

        let score: f64 = request
            .inputs
            .iter()
            .map(|(source, input)| {
                let weight = weights.get(source).copied().unwrap_or_else(|| source.default_weight());
                weight * input.confidence * input.verdict.sign()
            })
            .sum();

        let final_action = if governance_denied || request.immune_critical_anomaly {
            FinalAction::Deny
        } else if score >= APPROVE_THRESHOLD {
            FinalAction::Approve
        } else if score <= DENY_THRESHOLD {
            FinalAction::Deny
        } else {
            FinalAction::Defer
        };

        let decision = UnifiedDecision {
            inputs: request.inputs.clone(),
            synthesis_weights: weights,
            override_reasons,
            final_action,
            confidence: score.abs().min(1.0),
            targets: targets_for(final_action),
        };

        let payload = serde_json::to_value(&decision).unwrap_or(serde_json::Value::Null);
        let event = self.build_event("synth.decision", payload, Priority::High, request.correlation_id.clone());
        let entry = self.journal.submit(event.clone()).await?;
        tracing::info!(sequence = entry.sequence, final_action = ?decision.final_action, "synthesized decision");
        if let Err(err) = self.mesh.publish(event).await {
            tracing::debug!(%err, "no route for synth.decision");
        }

        if request.immune_critical_anomaly {
            let quarantine_payload = serde_json::json!({
                "target": request.quarantine_target,
                "reason": "critical_anomaly_hard_override",
            });
            let quarantine_event = self.build_event(
                "synth.decision.quarantine",
                quarantine_payload,
                Priority::Critical,
                request.correlation_id.clone(),
            );
            self.journal.submit(quarantine_event.clone()).await?;
            if let Err(err) = self.mesh.publish(quarantine_event).await {
                tracing::debug!(%err, "no route for synth.decision.quarantine");
            }
        }

        if detect_contradiction(&decision.inputs) {
            tracing::warn!("decision.contradiction: two sources disagreed at high confidence");
            let contradiction_event = self.build_event(
                "decision.contradiction",
                serde_json::to_value(&decision.inputs).unwrap_or(serde_json::Value::Null),
                Priority::High,
                request.correlation_id,
            );
            self.journal.submit(contradiction_event.clone()).await?;
            if let Err(err) = self.mesh.publish(contradiction_event).await {
                tracing::debug!(%err, "no route for decision.contradiction");
            }
        }

        Ok(decision)
    }

    fn build_event(
        &self,
        event_type: &str,
        payload: serde_json::Value,
        priority: Priority,
        correlation_id: Option<CorrelationId>,
    ) -> Event {
        let mut event =
            Event::new(event_type, SYNTH_SOURCE, Timestamp::capture(&self.clock, self.origin), priority, payload);
        if let Some(correlation_id) = correlation_id {
            event = event.with_correlation(correlation_id);
        }
        event
    }
}

#[cfg(test)]
#[path = "synthesizer_tests.rs"]
mod tests;
