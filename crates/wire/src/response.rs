// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! RPC response types for the administrative surface (spec §6, §7
//! "User-visible behaviour": every external caller gets a structured
//! `{outcome, reason_code, reason_text, correlation_id}` result).

use grace_core::{ComponentId, Fault};
use grace_journal::VerificationReport;
use serde::{Deserialize, Serialize};

/// Boot phase reported by `status` (spec §6). Distinct from `CORE_MODE`:
/// a core can be in `CORE_MODE=normal` and still be `Booting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BootPhase {
    Booting,
    Complete,
    Degraded,
    Safe,
}

/// Kernel lists plus journal tail, as returned by `status` (spec §6).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusReport {
    pub boot_phase: BootPhase,
    pub ready: Vec<ComponentId>,
    pub degraded: Vec<ComponentId>,
    pub failed: Vec<ComponentId>,
    pub quarantined: Vec<ComponentId>,
    pub journal_tail_sequence: u64,
}

/// Result of a `halt(reason)` call (spec §6): the kernels drained, in the
/// dependency-reverse order they were actually stopped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HaltResult {
    pub drained: Vec<ComponentId>,
}

/// Result of a `reload-routes(path)` call: the route table generation
/// before and after the atomic swap.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReloadRoutesResult {
    pub previous_generation: u64,
    pub new_generation: u64,
}

/// The `Ok` payload varies by which [`crate::Request`] was served.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ResponsePayload {
    Status(StatusReport),
    Halt(HaltResult),
    ReloadRoutes(ReloadRoutesResult),
    VerifyJournal(VerificationReport),
    None,
}

/// Whether the call succeeded (spec §7 "User-visible behaviour").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Ok,
    Error,
}

/// The structured result every administrative call returns, whether it
/// succeeded or failed — callers never receive a bare payload or a bare
/// error, always this shape (spec §7).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Response {
    pub outcome: Outcome,
    pub reason_code: String,
    pub reason_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    pub payload: ResponsePayload,
}

impl Response {
    pub fn ok(payload: ResponsePayload) -> Self {
        Self {
            outcome: Outcome::Ok,
            reason_code: "ok".to_string(),
            reason_text: "ok".to_string(),
            correlation_id: None,
            payload,
        }
    }

    pub fn with_correlation(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    /// Builds the error response from a [`Fault`], carrying forward
    /// whatever reason code/text/correlation id the failing stage attached
    /// (spec §7's taxonomy is the source of every `reason_code`).
    pub fn from_fault(fault: &Fault) -> Self {
        Self {
            outcome: Outcome::Error,
            reason_code: fault.reason_code.clone(),
            reason_text: fault.reason_text.clone(),
            correlation_id: fault.correlation_id.clone(),
            payload: ResponsePayload::None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.outcome == Outcome::Ok
    }
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
