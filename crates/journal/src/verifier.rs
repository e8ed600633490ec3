// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chain integrity verification, run both on demand and on a background
//! interval by [`crate::JournalHandle::spawn_verifier`].

use serde::{Deserialize, Serialize};

use crate::entry::{JournalEntry, GENESIS_HASH};
use crate::error::JournalError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    pub entries_checked: u64,
    pub valid: bool,
    /// First sequence at which continuity broke, if any.
    pub break_at_sequence: Option<u64>,
    pub detail: String,
}

impl VerificationReport {
    fn ok(entries_checked: u64) -> Self {
        Self { entries_checked, valid: true, break_at_sequence: None, detail: "chain intact".to_string() }
    }

    fn broken(entries_checked: u64, break_at_sequence: u64, detail: impl Into<String>) -> Self {
        Self { entries_checked, valid: false, break_at_sequence: Some(break_at_sequence), detail: detail.into() }
    }
}

/// Verify an in-order slice of entries starting from the genesis hash.
///
/// Checks three things per entry: the stored `self_hash` matches a fresh
/// recomputation (payload integrity), `sequence` increments by exactly one,
/// and `prev_hash` equals the previous entry's `self_hash` (chain
/// continuity). The first violation found short-circuits the scan.
pub fn verify_chain(entries: &[JournalEntry]) -> Result<VerificationReport, JournalError> {
    let mut expected_prev_hash = GENESIS_HASH;
    let mut expected_sequence = 0u64;

    for entry in entries {
        let recomputed = entry.recompute_self_hash()?;
        if recomputed != entry.self_hash {
            return Ok(VerificationReport::broken(
                expected_sequence,
                entry.sequence,
                "stored self_hash does not match recomputed hash",
            ));
        }
        if entry.sequence != expected_sequence {
            return Ok(VerificationReport::broken(
                expected_sequence,
                entry.sequence,
                format!("expected sequence {expected_sequence}, found {}", entry.sequence),
            ));
        }
        if entry.prev_hash != expected_prev_hash {
            return Ok(VerificationReport::broken(
                expected_sequence,
                entry.sequence,
                "prev_hash does not match predecessor's self_hash",
            ));
        }
        expected_prev_hash = entry.self_hash;
        expected_sequence += 1;
    }

    Ok(VerificationReport::ok(expected_sequence))
}

#[cfg(test)]
#[path = "verifier_tests.rs"]
mod tests;
