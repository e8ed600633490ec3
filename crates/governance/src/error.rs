// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use grace_core::Fault;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GovernanceError {
    #[error("constitutional ruleset unavailable: {0}")]
    RulesetUnavailable(String),
    #[error("policy store unreachable: {0}")]
    PolicyStoreUnreachable(String),
    #[error("parliament quorum timed out after {0}s without a decision")]
    QuorumTimeout(u64),
    #[error("journalling the decision failed: {0}")]
    JournalFailed(#[from] grace_journal::JournalError),
}

impl From<&GovernanceError> for Fault {
    fn from(err: &GovernanceError) -> Self {
        match err {
            GovernanceError::RulesetUnavailable(_) | GovernanceError::PolicyStoreUnreachable(_) => {
                Fault::transient("governance.store_unreachable", err.to_string())
            }
            GovernanceError::QuorumTimeout(_) => Fault::policy("governance.quorum_timeout", err.to_string()),
            GovernanceError::JournalFailed(inner) => inner.into(),
        }
    }
}

impl From<GovernanceError> for Fault {
    fn from(err: GovernanceError) -> Self {
        Fault::from(&err)
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
