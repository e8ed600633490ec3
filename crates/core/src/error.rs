// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared error taxonomy.
//!
//! Every fault in the core sorts into one of five buckets (transient,
//! operational, policy, integrity, programmer). Crate-local error enums
//! wrap a [`Fault`] rather than re-deriving the taxonomy, so a caller three
//! layers up the call stack can still match on `fault.kind()` without
//! knowing which crate raised it.

use serde::{Deserialize, Serialize};

/// Which bucket of the error taxonomy a fault belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultKind {
    /// I/O timeout, queue full, journal busy. Retried with backoff up to a deadline.
    Transient,
    /// Kernel crashed, heartbeat missed, handler exceeded its latency budget.
    Operational,
    /// Governance denied, hunter critical. Surfaced to the caller, never retried.
    Policy,
    /// Journal hash break, route manifest invalid, snapshot corrupt.
    Integrity,
    /// Contract violation, e.g. illegal re-registration.
    Programmer,
}

impl FaultKind {
    /// Whether a caller should retry an operation that failed with this kind.
    pub fn is_retryable(self) -> bool {
        matches!(self, FaultKind::Transient)
    }
}

/// A structured fault, carrying the taxonomy bucket plus a stable reason
/// code and human text, matching the `{outcome, reason_code, reason_text,
/// correlation_id}` shape the administrative surface returns (spec §7).
#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
#[error("{reason_code}: {reason_text}")]
pub struct Fault {
    pub kind: FaultKind,
    pub reason_code: String,
    pub reason_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
}

impl Fault {
    pub fn new(kind: FaultKind, reason_code: impl Into<String>, reason_text: impl Into<String>) -> Self {
        Self {
            kind,
            reason_code: reason_code.into(),
            reason_text: reason_text.into(),
            correlation_id: None,
        }
    }

    pub fn transient(reason_code: impl Into<String>, reason_text: impl Into<String>) -> Self {
        Self::new(FaultKind::Transient, reason_code, reason_text)
    }

    pub fn operational(reason_code: impl Into<String>, reason_text: impl Into<String>) -> Self {
        Self::new(FaultKind::Operational, reason_code, reason_text)
    }

    pub fn policy(reason_code: impl Into<String>, reason_text: impl Into<String>) -> Self {
        Self::new(FaultKind::Policy, reason_code, reason_text)
    }

    pub fn integrity(reason_code: impl Into<String>, reason_text: impl Into<String>) -> Self {
        Self::new(FaultKind::Integrity, reason_code, reason_text)
    }

    pub fn programmer(reason_code: impl Into<String>, reason_text: impl Into<String>) -> Self {
        Self::new(FaultKind::Programmer, reason_code, reason_text)
    }

    pub fn with_correlation(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
