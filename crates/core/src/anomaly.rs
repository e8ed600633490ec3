// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Anomaly data model — spec §3.7.

use serde::{Deserialize, Serialize};

use crate::event::ComponentId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyType {
    Performance,
    Resource,
    Behavioural,
    Security,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// A detected anomaly (spec §3.7), the unit of work the immune kernel
/// classifies and matches against a remediation playbook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Anomaly {
    pub anomaly_type: AnomalyType,
    pub severity: Severity,
    pub affected_resource: ComponentId,
    pub detector: String,
    /// Score in `[0, 1]`.
    pub anomaly_score: f64,
    pub context: serde_json::Value,
}

impl Anomaly {
    pub fn new(
        anomaly_type: AnomalyType,
        severity: Severity,
        affected_resource: impl Into<ComponentId>,
        detector: impl Into<String>,
        anomaly_score: f64,
    ) -> Self {
        Self {
            anomaly_type,
            severity,
            affected_resource: affected_resource.into(),
            detector: detector.into(),
            anomaly_score: anomaly_score.clamp(0.0, 1.0),
            context: serde_json::Value::Null,
        }
    }

    pub fn is_critical(&self) -> bool {
        self.severity == Severity::Critical
    }
}

#[cfg(test)]
#[path = "anomaly_tests.rs"]
mod tests;
