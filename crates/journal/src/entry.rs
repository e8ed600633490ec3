// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Journal entry shape and hash-chain computation — spec §3.4.

use grace_core::{CanonicalEncode, Event};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::JournalError;

pub const GENESIS_HASH: [u8; 32] = [0u8; 32];

/// A hash-chained, append-only journal entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    pub sequence: u64,
    #[serde(with = "hash_hex")]
    pub prev_hash: [u8; 32],
    #[serde(with = "hash_hex")]
    pub self_hash: [u8; 32],
    pub payload: Event,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<Vec<u8>>,
}

impl JournalEntry {
    /// Build the next entry in the chain, computing `self_hash` over
    /// `(sequence, prev_hash, payload_canonical)` per spec §3.4.
    pub fn next(sequence: u64, prev_hash: [u8; 32], payload: Event) -> Result<Self, JournalError> {
        let payload_canonical = payload
            .canonical_encode()
            .map_err(|source| JournalError::Canonicalize { sequence, source })?;
        let self_hash = compute_self_hash(sequence, &prev_hash, &payload_canonical);
        Ok(Self { sequence, prev_hash, self_hash, payload, signature: None })
    }

    /// Whether `self` correctly follows `previous` in the chain.
    pub fn follows(&self, previous: &JournalEntry) -> bool {
        self.sequence == previous.sequence + 1 && self.prev_hash == previous.self_hash
    }

    /// Recompute `self_hash` from the stored fields, to detect tampering
    /// with the payload or hash fields independent of chain linkage.
    pub fn recompute_self_hash(&self) -> Result<[u8; 32], JournalError> {
        let payload_canonical = self
            .payload
            .canonical_encode()
            .map_err(|source| JournalError::Canonicalize { sequence: self.sequence, source })?;
        Ok(compute_self_hash(self.sequence, &self.prev_hash, &payload_canonical))
    }
}

pub fn compute_self_hash(sequence: u64, prev_hash: &[u8; 32], payload_canonical: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(sequence.to_be_bytes());
    hasher.update(prev_hash);
    hasher.update(payload_canonical);
    hasher.finalize().into()
}

mod hash_hex {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(hash: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error> {
        hex::encode(hash).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[u8; 32], D::Error> {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
        bytes.try_into().map_err(|_| serde::de::Error::custom("hash must be 32 bytes"))
    }
}

#[cfg(test)]
#[path = "entry_tests.rs"]
mod tests;
