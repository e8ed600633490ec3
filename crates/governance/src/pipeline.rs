// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The governance gate: runs all five pipeline stages in fixed order,
//! journals every stage result, and publishes `governance.decision`
//! (spec §4.5). Stage order is never caller-selectable and a deny at any
//! stage short-circuits the rest, recording the unreached stages as
//! `not-evaluated` rather than an implicit pass.

use std::sync::Arc;
use std::time::Instant;

use grace_core::{
    Anomaly, AnomalyType, Clock, ComponentId, Disposition, Event, GovernanceDecision,
    GovernanceDecisionId as DecisionId, GovernanceRequest, Priority, RiskLevel, Severity, StageResult,
    StageVerdict, Timestamp,
};
use grace_journal::JournalWriter;
use grace_mesh::Mesh;

use crate::constitutional::ConstitutionalStore;
use crate::error::GovernanceError;
use crate::hunter::HunterRules;
use crate::parliament::{self, QuorumConfig, VoterPool};
use crate::policy::PolicyStore;
use crate::verification::{self, SignatureVerifier};

const GATE_SOURCE: &str = "governance.gate";

/// Everything the pipeline needs for one `validate` call.
pub struct GateConfig {
    pub quorum: QuorumConfig,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self { quorum: QuorumConfig::default() }
    }
}

/// Ties the five stages together, journalling and publishing the
/// terminal decision. Generic over the clock so tests can drive
/// deterministic timestamps.
pub struct Gate<C: Clock> {
    constitutional: Arc<ConstitutionalStore>,
    policy: Arc<PolicyStore>,
    hunter: Arc<HunterRules>,
    verifier: Arc<dyn SignatureVerifier>,
    voters: Arc<dyn VoterPool>,
    journal: JournalWriter,
    mesh: Arc<Mesh>,
    clock: C,
    origin: Instant,
    config: GateConfig,
}

impl<C: Clock> Gate<C> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        constitutional: Arc<ConstitutionalStore>,
        policy: Arc<PolicyStore>,
        hunter: Arc<HunterRules>,
        verifier: Arc<dyn SignatureVerifier>,
        voters: Arc<dyn VoterPool>,
        journal: JournalWriter,
        mesh: Arc<Mesh>,
        clock: C,
    ) -> Self {
        Self {
            constitutional,
            policy,
            hunter,
            verifier,
            voters,
            journal,
            mesh,
            origin: Instant::now(),
            clock,
            config: GateConfig::default(),
        }
    }

    pub fn with_config(mut self, config: GateConfig) -> Self {
        self.config = config;
        self
    }

    /// Run the full pipeline for `request`, returning the terminal decision.
    pub async fn validate(&self, request: GovernanceRequest) -> Result<GovernanceDecision, GovernanceError> {
        let mut reasons: Vec<StageResult> = Vec::with_capacity(5);
        let mut policy_refs: Vec<String> = Vec::new();
        let mut disposition = Disposition::Approved;

        let (constitutional_result, constitutional_ref) = self.constitutional.check(&request);
        let constitutional_failed = constitutional_result.verdict == StageVerdict::Fail;
        reasons.push(constitutional_result);
        policy_refs.extend(constitutional_ref);

        if constitutional_failed {
            disposition = Disposition::Denied;
            self.record_not_evaluated(&mut reasons, &["policy", "hunter", "verification", "parliament"]);
            return self.finish(request, disposition, reasons, policy_refs).await;
        }

        let (policy_result, policy_ref) = match self.policy.check(&request) {
            Ok(result) => result,
            Err(err) => {
                // Policy store unreachable: deferred, never an implicit
                // approval (spec §4.5 "Failure semantics", §8 boundary
                // behavior).
                reasons.push(StageResult::new("policy", StageVerdict::NotEvaluated, err.to_string()));
                self.record_not_evaluated(&mut reasons, &["hunter", "verification", "parliament"]);
                return self.finish(request, Disposition::Deferred, reasons, policy_refs).await;
            }
        };
        let policy_failed = policy_result.verdict == StageVerdict::Fail;
        let policy_requires_approval = self.policy.requires_approval(&request);
        reasons.push(policy_result);
        policy_refs.extend(policy_ref);

        if policy_failed {
            disposition = Disposition::Denied;
            self.record_not_evaluated(&mut reasons, &["hunter", "verification", "parliament"]);
            return self.finish(request, disposition, reasons, policy_refs).await;
        }

        let hunter_result = self.hunter.check(&request);
        let hunter_failed = hunter_result.verdict == StageVerdict::Fail;
        let hunter_detail = hunter_result.detail.clone();
        reasons.push(hunter_result);

        if hunter_failed {
            disposition = Disposition::Denied;
            self.forward_hunter_finding(&request, &hunter_detail).await;
            self.record_not_evaluated(&mut reasons, &["verification", "parliament"]);
            return self.finish(request, disposition, reasons, policy_refs).await;
        }

        let input_hash = verification::context_hash(&request);
        let verification_result = verification::check(&request, &input_hash, None, self.verifier.as_ref());
        let verification_failed = verification_result.verdict == StageVerdict::Fail;
        reasons.push(verification_result);

        if verification_failed {
            disposition = Disposition::Denied;
            self.record_not_evaluated(&mut reasons, &["parliament"]);
            return self.finish(request, disposition, reasons, policy_refs).await;
        }

        let needs_parliament =
            parliament::required(request.risk_level == RiskLevel::Critical, policy_requires_approval);

        if needs_parliament {
            let parliament_result = parliament::run(&request, self.voters.as_ref(), &self.config.quorum).await;
            let parliament_failed = parliament_result.verdict == StageVerdict::Fail;
            reasons.push(parliament_result);
            disposition = if parliament_failed { Disposition::Denied } else { Disposition::Approved };
        } else {
            reasons.push(StageResult::new(
                "parliament",
                StageVerdict::NotEvaluated,
                "not required for this request",
            ));
        }

        self.finish(request, disposition, reasons, policy_refs).await
    }

    /// A critical hunter finding denies the request and also forwards an
    /// `anomaly.detected` event so the immune kernel (or whatever is routed
    /// to receive it) learns about it. The gate denies the request; it does
    /// not remediate it. Best-effort: a missing route or a busy subscriber
    /// does not change the deny decision.
    async fn forward_hunter_finding(&self, request: &GovernanceRequest, detail: &str) {
        let mut anomaly = Anomaly::new(
            AnomalyType::Security,
            Severity::Critical,
            request.resource.clone(),
            crate::hunter::HUNTER_DETECTOR,
            1.0,
        );
        anomaly.context = crate::hunter::critical_finding_event(request, detail);

        let payload = serde_json::to_value(&anomaly).unwrap_or(serde_json::Value::Null);
        let event = self.build_event("anomaly.detected", payload, Priority::Critical);
        if let Err(err) = self.mesh.publish(event).await {
            tracing::debug!(%err, actor = %request.actor, "no route for anomaly.detected from hunter");
        }
    }

    fn record_not_evaluated(&self, reasons: &mut Vec<StageResult>, remaining: &[&str]) {
        for stage in remaining {
            reasons.push(StageResult::not_evaluated(*stage));
        }
    }

    async fn finish(
        &self,
        request: GovernanceRequest,
        disposition: Disposition,
        reasons: Vec<StageResult>,
        policy_refs: Vec<String>,
    ) -> Result<GovernanceDecision, GovernanceError> {
        let mut decision = GovernanceDecision {
            id: DecisionId::new(),
            request,
            disposition,
            reasons,
            policy_refs,
            expires_at_epoch_ms: None,
            audit_id: None,
        };

        let payload = serde_json::to_value(&decision).unwrap_or(serde_json::Value::Null);
        let event = self.build_event("governance.decision", payload, Priority::High);
        let entry = self.journal.submit(event.clone()).await?;
        decision.audit_id = Some(entry.sequence);

        if let Err(err) = self.mesh.publish(event).await {
            tracing::debug!(%err, decision_id = %decision.id, "no route for governance.decision");
        }

        Ok(decision)
    }

    /// A deliberate, non-silent development-only bypass. Always journals a
    /// distinct `governance.decision.bypass` event carrying `actor` and
    /// `reason` — never an implicit skip of the pipeline (spec §9).
    pub async fn bypass(
        &self,
        request: GovernanceRequest,
        actor: impl Into<ComponentId>,
        reason: impl Into<String>,
    ) -> Result<GovernanceDecision, GovernanceError> {
        let actor = actor.into();
        let reason = reason.into();

        let decision = GovernanceDecision {
            id: DecisionId::new(),
            request,
            disposition: Disposition::Approved,
            reasons: vec![StageResult::new(
                "bypass",
                StageVerdict::NotEvaluated,
                format!("bypassed by {actor}: {reason}"),
            )],
            policy_refs: Vec::new(),
            expires_at_epoch_ms: None,
            audit_id: None,
        };

        let payload = serde_json::json!({
            "decision_id": decision.id.to_string(),
            "actor": actor.as_str(),
            "reason": reason,
        });
        let event = self.build_event("governance.decision.bypass", payload, Priority::High);
        let entry = self.journal.submit(event.clone()).await?;

        let mut decision = decision;
        decision.audit_id = Some(entry.sequence);
        tracing::warn!(decision_id = %decision.id, %actor, %reason, "governance pipeline bypassed");

        if let Err(err) = self.mesh.publish(event).await {
            tracing::debug!(%err, decision_id = %decision.id, "no route for governance.decision.bypass");
        }

        Ok(decision)
    }

    fn build_event(&self, event_type: &str, payload: serde_json::Value, priority: Priority) -> Event {
        Event::new(event_type, GATE_SOURCE, Timestamp::capture(&self.clock, self.origin), priority, payload)
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
