// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use grace_core::{GovernanceRequest, RiskLevel};
use std::time::Duration;

use super::*;

struct FixedPool {
    votes: Vec<Vote>,
    delay: Option<Duration>,
}

#[async_trait::async_trait]
impl VoterPool for FixedPool {
    async fn collect_votes(&self, _request: &GovernanceRequest, _deadline: Duration) -> Vec<Vote> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.votes.clone()
    }

    fn voter_count(&self) -> usize {
        self.votes.len()
    }
}

fn req() -> GovernanceRequest {
    GovernanceRequest::new("actor", "deploy", "service.billing", RiskLevel::Critical)
}

#[tokio::test]
async fn quorum_reached_passes() {
    let pool = FixedPool { votes: vec![Vote::Approve, Vote::Approve, Vote::Deny], delay: None };
    let result = run(&req(), &pool, &QuorumConfig::default()).await;
    assert_eq!(result.verdict, StageVerdict::Pass);
}

#[tokio::test]
async fn quorum_not_reached_denies() {
    let pool = FixedPool { votes: vec![Vote::Deny, Vote::Deny, Vote::Approve], delay: None };
    let result = run(&req(), &pool, &QuorumConfig::default()).await;
    assert_eq!(result.verdict, StageVerdict::Fail);
}

#[tokio::test(start_paused = true)]
async fn timeout_without_quorum_is_denied_not_approved() {
    let pool = FixedPool { votes: vec![Vote::Approve], delay: Some(Duration::from_secs(120)) };
    let config = QuorumConfig { deadline: Duration::from_secs(1), approval_threshold: 0.5 };
    let result = run(&req(), &pool, &config).await;
    assert_eq!(result.verdict, StageVerdict::Fail);
}

#[test]
fn required_when_risk_critical_or_policy_flags_it() {
    assert!(required(true, false));
    assert!(required(false, true));
    assert!(!required(false, false));
}
