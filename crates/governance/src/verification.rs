// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stage 4: compute a cryptographic envelope over `(actor, action,
//! resource, input_hash)` and, when the producer supplied a signature,
//! verify it. An unsigned request passes (signing is opt-in); a supplied
//! signature that fails to verify is a terminal deny.

use grace_core::{GovernanceRequest, StageResult, StageVerdict};
use sha2::{Digest, Sha256};

/// `sha256(actor || 0x00 || action || 0x00 || resource || 0x00 || input_hash)`.
pub fn envelope_hash(request: &GovernanceRequest, input_hash: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(request.actor.as_str().as_bytes());
    hasher.update([0u8]);
    hasher.update(request.action.as_bytes());
    hasher.update([0u8]);
    hasher.update(request.resource.as_bytes());
    hasher.update([0u8]);
    hasher.update(input_hash);
    hasher.finalize().into()
}

/// Hash the request's context payload to stand in for `input_hash` when
/// the caller didn't supply one out of band.
pub fn context_hash(request: &GovernanceRequest) -> [u8; 32] {
    let bytes = serde_json::to_vec(&request.context).unwrap_or_default();
    Sha256::digest(bytes).into()
}

/// A detached signature supplied by the producer, checked against the
/// envelope hash. Verification is pluggable: deployments that don't sign
/// requests simply never attach one, and the stage passes unsigned.
pub trait SignatureVerifier: Send + Sync {
    fn verify(&self, envelope: &[u8; 32], signature: &[u8]) -> bool;
}

/// Accepts any signature; used where no real signing scheme is wired up.
pub struct AcceptAll;

impl SignatureVerifier for AcceptAll {
    fn verify(&self, _envelope: &[u8; 32], _signature: &[u8]) -> bool {
        true
    }
}

pub fn check(
    request: &GovernanceRequest,
    input_hash: &[u8],
    signature: Option<&[u8]>,
    verifier: &dyn SignatureVerifier,
) -> StageResult {
    let envelope = envelope_hash(request, input_hash);
    match signature {
        None => StageResult::new("verification", StageVerdict::Pass, "envelope computed, no signature supplied"),
        Some(sig) => {
            if verifier.verify(&envelope, sig) {
                StageResult::new("verification", StageVerdict::Pass, "signature verified")
            } else {
                StageResult::new("verification", StageVerdict::Fail, "signature verification failed")
            }
        }
    }
}

#[cfg(test)]
#[path = "verification_tests.rs"]
mod tests;
