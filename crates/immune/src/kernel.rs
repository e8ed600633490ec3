// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! [`ImmuneKernel`]: ties anomaly ingestion, playbook selection,
//! remediation execution, and trust-score feedback together (spec §4.7
//! "Anomaly processing").

use std::sync::Arc;
use std::time::{Duration, Instant};

use grace_core::{Anomaly, Clock, CorrelationId, Event, Priority, Timestamp};
use grace_journal::JournalWriter;
use grace_mesh::Mesh;

use crate::error::ImmuneError;
use crate::playbook::PlaybookStore;
use crate::remediation::{self, ActionExecutor, RemediationOutcome, DEFAULT_ACTION_DEADLINE};
use crate::trust::TrustStore;

const IMMUNE_SOURCE: &str = "immune.kernel";

/// Result of classifying and (attempting to) remediate one anomaly.
#[derive(Debug, Clone)]
pub struct AnomalyResponse {
    pub remediation: RemediationOutcome,
    pub trust_score_after: f64,
}

/// Anomaly ingestion and remediation (spec §4.7).
pub struct ImmuneKernel<C: Clock> {
    playbooks: Arc<PlaybookStore>,
    trust: Arc<TrustStore>,
    executor: Arc<dyn ActionExecutor>,
    journal: JournalWriter,
    mesh: Arc<Mesh>,
    clock: C,
    origin: Instant,
    action_deadline: Duration,
}

impl<C: Clock> ImmuneKernel<C> {
    pub fn new(
        playbooks: Arc<PlaybookStore>,
        trust: Arc<TrustStore>,
        executor: Arc<dyn ActionExecutor>,
        journal: JournalWriter,
        mesh: Arc<Mesh>,
        clock: C,
    ) -> Self {
        Self {
            playbooks,
            trust,
            executor,
            journal,
            mesh,
            origin: Instant::now(),
            clock,
            action_deadline: DEFAULT_ACTION_DEADLINE,
        }
    }

    pub fn with_action_deadline(mut self, deadline: Duration) -> Self {
        self.action_deadline = deadline;
        self
    }

    pub fn trust(&self) -> &Arc<TrustStore> {
        &self.trust
    }

    pub fn playbooks(&self) -> &Arc<PlaybookStore> {
        &self.playbooks
    }

    /// Classify `anomaly` by `(type, severity)`, select a matching
    /// playbook, execute it, and adjust the affected resource's trust
    /// score by the outcome (spec §4.7 "On receipt...").
    ///
    /// Returns [`ImmuneError::NoPlaybookMatched`] when nothing matches —
    /// the anomaly is still journalled before that error is returned, so
    /// an unhandled anomaly is never silently dropped from the audit trail.
    pub async fn ingest(
        &self,
        anomaly: Anomaly,
        correlation_id: Option<CorrelationId>,
    ) -> Result<AnomalyResponse, ImmuneError> {
        let priority = severity_priority(anomaly.severity);
        let payload = serde_json::to_value(&anomaly).unwrap_or(serde_json::Value::Null);
        let detected_event = self.build_event("anomaly.detected", payload, priority, correlation_id.clone());
        self.journal.submit(detected_event.clone()).await?;
        let _ = self.mesh.publish(detected_event).await;

        let Some(playbook) = self.playbooks.select(&anomaly) else {
            return Err(ImmuneError::NoPlaybookMatched {
                anomaly_type: format!("{:?}", anomaly.anomaly_type),
                severity: format!("{:?}", anomaly.severity),
                resource: anomaly.affected_resource.as_str().to_string(),
            });
        };

        let nonce = correlation_id.as_ref().map(|c| c.to_string()).unwrap_or_else(|| anomaly.detector.clone());
        let outcome = remediation::run(
            &playbook,
            anomaly.affected_resource.clone(),
            &nonce,
            self.executor.as_ref(),
            self.action_deadline,
        )
        .await;

        let trust_score_after = if outcome.success {
            self.trust.on_remediation_success(anomaly.affected_resource.clone())
        } else {
            self.trust.on_remediation_failure(anomaly.affected_resource.clone())
        };

        let outcome_payload = serde_json::json!({
            "outcome": &outcome,
            "trust_score_after": trust_score_after,
        });
        let executed_event =
            self.build_event("immune.remediation.executed", outcome_payload, Priority::High, correlation_id);
        self.journal.submit(executed_event.clone()).await?;
        let _ = self.mesh.publish(executed_event).await;

        tracing::info!(
            resource = %anomaly.affected_resource,
            playbook = %playbook.name,
            success = outcome.success,
            trust_score_after,
            "remediation executed"
        );

        Ok(AnomalyResponse { remediation: outcome, trust_score_after })
    }

    fn build_event(
        &self,
        event_type: &str,
        payload: serde_json::Value,
        priority: Priority,
        correlation_id: Option<CorrelationId>,
    ) -> Event {
        let mut event =
            Event::new(event_type, IMMUNE_SOURCE, Timestamp::capture(&self.clock, self.origin), priority, payload);
        if let Some(correlation_id) = correlation_id {
            event = event.with_correlation(correlation_id);
        }
        event
    }
}

/// Maps anomaly severity onto event priority: critical anomalies must not
/// sit behind normal-priority backpressure (spec §4.3 rule 4).
fn severity_priority(severity: grace_core::Severity) -> Priority {
    match severity {
        grace_core::Severity::Critical => Priority::Critical,
        grace_core::Severity::High => Priority::High,
        grace_core::Severity::Medium => Priority::Normal,
        grace_core::Severity::Low => Priority::Low,
    }
}

#[cfg(test)]
#[path = "kernel_tests.rs"]
mod tests;
