// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use serial_test::serial;

use super::*;

fn clear_env() {
    std::env::remove_var(SOCKET_ENV);
    std::env::remove_var(JOURNAL_ENV);
}

#[test]
#[serial]
fn explicit_flag_wins_over_env() {
    clear_env();
    std::env::set_var(SOCKET_ENV, "/from/env.sock");
    let resolved = resolve_socket_path(Some(PathBuf::from("/from/flag.sock"))).unwrap();
    assert_eq!(resolved, PathBuf::from("/from/flag.sock"));
    clear_env();
}

#[test]
#[serial]
fn socket_env_wins_over_journal_env() {
    clear_env();
    std::env::set_var(SOCKET_ENV, "/from/env.sock");
    std::env::set_var(JOURNAL_ENV, "/var/lib/grace/journal");
    let resolved = resolve_socket_path(None).unwrap();
    assert_eq!(resolved, PathBuf::from("/from/env.sock"));
    clear_env();
}

#[test]
#[serial]
fn falls_back_to_journal_sibling() {
    clear_env();
    std::env::set_var(JOURNAL_ENV, "/var/lib/grace/journal");
    let resolved = resolve_socket_path(None).unwrap();
    assert_eq!(resolved, PathBuf::from("/var/lib/grace/grace.sock"));
    clear_env();
}

#[test]
#[serial]
fn errors_with_no_path_available() {
    clear_env();
    let err = resolve_socket_path(None).unwrap_err();
    assert_eq!(err.code, 2);
    clear_env();
}
