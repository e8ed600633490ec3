// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! RPC request types for the administrative surface (spec §6 "Process
//! control surface").

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The four operations the core exposes to `grace-cli` and, when enabled,
/// the authenticated TCP listener. Unknown fields on the wire are rejected
/// by `serde`'s default (non-`deny_unknown_fields`... see note on
/// [`Request`]) — deliberately permissive here since CLI/daemon version
/// skew should degrade gracefully, unlike the route manifest (spec §6),
/// which is authored by an operator and rejects typos outright.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum Request {
    Status,
    Halt {
        reason: String,
    },
    ReloadRoutes {
        path: PathBuf,
    },
    VerifyJournal {
        from: u64,
        to: u64,
    },
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
