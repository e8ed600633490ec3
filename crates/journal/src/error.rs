// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use grace_core::{Fault, FaultKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JournalError {
    #[error("journal writer busy after {retries} retries")]
    Busy { retries: u32 },
    #[error("journal io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("journal entry at sequence {sequence} failed to canonicalize: {source}")]
    Canonicalize { sequence: u64, #[source] source: grace_core::CanonicalError },
    #[error("journal corrupt: {0}")]
    Corrupt(String),
    #[error("requested range [{from}, {to}] is invalid")]
    InvalidRange { from: u64, to: u64 },
    #[error("writer task is gone")]
    WriterGone,
}

impl From<&JournalError> for Fault {
    fn from(err: &JournalError) -> Self {
        match err {
            JournalError::Busy { .. } => Fault::transient("journal.busy", err.to_string()),
            JournalError::Io(_) | JournalError::WriterGone => {
                Fault::transient("journal.io_error", err.to_string())
            }
            JournalError::Canonicalize { .. } | JournalError::InvalidRange { .. } => {
                Fault::new(FaultKind::Programmer, "journal.invalid_request", err.to_string())
            }
            JournalError::Corrupt(_) => Fault::integrity("journal.corrupt", err.to_string()),
        }
    }
}

impl From<JournalError> for Fault {
    fn from(err: JournalError) -> Self {
        Fault::from(&err)
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
