// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! grace-synth: the unified decision synthesizer (spec §3.6 / §4.6).
//!
//! Merges per-source verdicts (governance, immune, ml, learning, memory)
//! into one routed [`grace_core::UnifiedDecision`] so that downstream
//! executors never receive contradictory inputs. [`weights::WeightStore`]
//! holds the read-mostly, adjustable per-source weight table;
//! [`synthesizer::Synthesizer`] runs the hard-override / weighted-score /
//! threshold algorithm and journals the result.

pub mod error;
pub mod synthesizer;
pub mod weights;

pub use error::SynthError;
pub use synthesizer::{SynthesisRequest, Synthesizer, APPROVE_THRESHOLD, CONTRADICTION_CONFIDENCE, DENY_THRESHOLD};
pub use weights::WeightStore;
