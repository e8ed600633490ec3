// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use grace_core::Fault;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SynthError {
    #[error("no inputs supplied to the synthesizer")]
    NoInputs,
    #[error("journalling the unified decision failed: {0}")]
    JournalFailed(#[from] grace_journal::JournalError),
}

impl From<&SynthError> for Fault {
    fn from(err: &SynthError) -> Self {
        match err {
            SynthError::NoInputs => Fault::programmer("synth.no_inputs", err.to_string()),
            SynthError::JournalFailed(inner) => inner.into(),
        }
    }
}

impl From<SynthError> for Fault {
    fn from(err: SynthError) -> Self {
        Fault::from(&err)
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
