// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn exit_codes_match_spec_table() {
    assert_eq!(DaemonError::BootTimeout.exit_code(), 10);
    assert_eq!(DaemonError::Tier1Failure("agent_x".to_string()).exit_code(), 20);
    assert_eq!(DaemonError::JournalCorrupt("broken at 4".to_string()).exit_code(), 30);
    assert_eq!(DaemonError::RouteManifestInvalid("unknown field".to_string()).exit_code(), 40);
    assert_eq!(DaemonError::UnrecoverablePanic("panic".to_string()).exit_code(), 50);
}
