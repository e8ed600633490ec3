// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stage 5 (optional): open a quorum session among a pool of voters.
//! Triggered when the policy stage returned `require-approval` or the
//! request's risk level is `critical`. A timeout without quorum is a
//! terminal deny, never an implicit approve.

use async_trait::async_trait;
use grace_core::{GovernanceRequest, StageResult, StageVerdict};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vote {
    Approve,
    Deny,
    Abstain,
}

/// A pool of voters, pluggable so a deployment can back it with humans,
/// a model ensemble, or a mix without touching the pipeline.
#[async_trait]
pub trait VoterPool: Send + Sync {
    /// Collect votes for `request`, waiting up to `deadline`. Implementors
    /// should return whatever votes arrived even if fewer than the full
    /// pool responded in time.
    async fn collect_votes(&self, request: &GovernanceRequest, deadline: Duration) -> Vec<Vote>;

    fn voter_count(&self) -> usize;
}

pub struct QuorumConfig {
    pub deadline: Duration,
    /// Fraction of the pool (by `voter_count`) that must approve.
    pub approval_threshold: f64,
}

impl Default for QuorumConfig {
    fn default() -> Self {
        Self { deadline: Duration::from_secs(60), approval_threshold: 0.5 }
    }
}

pub async fn run(
    request: &GovernanceRequest,
    pool: &dyn VoterPool,
    config: &QuorumConfig,
) -> StageResult {
    let votes = tokio::time::timeout(config.deadline, pool.collect_votes(request, config.deadline))
        .await
        .unwrap_or_default();

    let pool_size = pool.voter_count();
    if pool_size == 0 {
        return StageResult::new("parliament", StageVerdict::Fail, "no voters registered, timed out without quorum");
    }

    let approvals = votes.iter().filter(|v| **v == Vote::Approve).count();
    let ratio = approvals as f64 / pool_size as f64;

    if ratio >= config.approval_threshold {
        StageResult::new(
            "parliament",
            StageVerdict::Pass,
            format!("{approvals}/{pool_size} approved, threshold {:.2}", config.approval_threshold),
        )
    } else {
        StageResult::new(
            "parliament",
            StageVerdict::Fail,
            format!("{approvals}/{pool_size} approved, below threshold {:.2}", config.approval_threshold),
        )
    }
}

/// Whether stage 5 must run at all for this request (spec §4.5 trigger).
pub fn required(risk_is_critical: bool, policy_requires_approval: bool) -> bool {
    risk_is_critical || policy_requires_approval
}

#[cfg(test)]
#[path = "parliament_tests.rs"]
mod tests;
