// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

fn clear_all() {
    for name in [
        "CORE_BOOT_TIMEOUT_SECONDS",
        "CORE_HEARTBEAT_INTERVAL_SECONDS",
        "CORE_MAX_RESTARTS_DEFAULT",
        "CORE_MODE",
        "CORE_JOURNAL_PATH",
        "CORE_ROUTE_MANIFEST_PATH",
        "CORE_SOCKET_PATH",
        "CORE_TCP_PORT",
        "CORE_AUTH_TOKEN",
    ] {
        std::env::remove_var(name);
    }
}

#[test]
#[serial]
fn defaults_apply_when_unset() {
    clear_all();
    assert_eq!(boot_timeout().unwrap(), Duration::from_secs(DEFAULT_BOOT_TIMEOUT_SECONDS));
    assert_eq!(heartbeat_interval().unwrap(), Duration::from_secs(DEFAULT_HEARTBEAT_INTERVAL_SECONDS));
    assert_eq!(max_restarts_default().unwrap(), DEFAULT_MAX_RESTARTS);
    assert_eq!(mode().unwrap(), CoreMode::Normal);
}

#[test]
#[serial]
fn required_paths_missing_is_typed_error() {
    clear_all();
    assert!(matches!(journal_path(), Err(EnvError::Missing { name: "CORE_JOURNAL_PATH" })));
    assert!(matches!(route_manifest_path(), Err(EnvError::Missing { name: "CORE_ROUTE_MANIFEST_PATH" })));
}

#[test]
#[serial]
fn required_paths_present() {
    clear_all();
    std::env::set_var("CORE_JOURNAL_PATH", "/tmp/grace/journal.log");
    std::env::set_var("CORE_ROUTE_MANIFEST_PATH", "/tmp/grace/routes.toml");
    assert_eq!(journal_path().unwrap(), PathBuf::from("/tmp/grace/journal.log"));
    assert_eq!(route_manifest_path().unwrap(), PathBuf::from("/tmp/grace/routes.toml"));
    clear_all();
}

#[test]
#[serial]
fn malformed_numeric_value_is_typed_error_not_panic() {
    clear_all();
    std::env::set_var("CORE_BOOT_TIMEOUT_SECONDS", "not-a-number");
    let err = boot_timeout().unwrap_err();
    assert!(matches!(err, EnvError::Invalid { name: "CORE_BOOT_TIMEOUT_SECONDS", .. }));
    clear_all();
}

#[test]
#[serial]
fn malformed_mode_is_typed_error() {
    clear_all();
    std::env::set_var("CORE_MODE", "chaotic");
    let err = mode().unwrap_err();
    assert!(matches!(err, EnvError::Invalid { name: "CORE_MODE", .. }));
    clear_all();
}

#[test]
#[serial]
fn config_from_env_resolves_everything_at_once() {
    clear_all();
    std::env::set_var("CORE_JOURNAL_PATH", "/tmp/grace/journal.log");
    std::env::set_var("CORE_ROUTE_MANIFEST_PATH", "/tmp/grace/routes.toml");
    let config = Config::from_env().unwrap();
    assert_eq!(config.mode, CoreMode::Normal);
    assert_eq!(config.max_restarts_default, DEFAULT_MAX_RESTARTS);
    assert_eq!(config.socket_path, PathBuf::from("/tmp/grace/grace.sock"));
    assert_eq!(config.tcp_port, None);
    assert_eq!(config.auth_token, None);
    clear_all();
}

#[test]
#[serial]
fn socket_path_defaults_to_journal_sibling() {
    clear_all();
    let resolved = socket_path(&PathBuf::from("/var/lib/grace/journal.log")).unwrap();
    assert_eq!(resolved, PathBuf::from("/var/lib/grace/grace.sock"));
}

#[test]
#[serial]
fn socket_path_honors_explicit_override() {
    clear_all();
    std::env::set_var("CORE_SOCKET_PATH", "/run/grace/admin.sock");
    let resolved = socket_path(&PathBuf::from("/var/lib/grace/journal.log")).unwrap();
    assert_eq!(resolved, PathBuf::from("/run/grace/admin.sock"));
    clear_all();
}

#[test]
#[serial]
fn tcp_port_absent_is_none() {
    clear_all();
    assert_eq!(tcp_port().unwrap(), None);
}

#[test]
#[serial]
fn tcp_port_parses_valid_value() {
    clear_all();
    std::env::set_var("CORE_TCP_PORT", "7420");
    assert_eq!(tcp_port().unwrap(), Some(7420));
    clear_all();
}

#[test]
#[serial]
fn tcp_port_malformed_is_typed_error_not_panic() {
    clear_all();
    std::env::set_var("CORE_TCP_PORT", "not-a-port");
    let err = tcp_port().unwrap_err();
    assert!(matches!(err, EnvError::Invalid { name: "CORE_TCP_PORT", .. }));
    clear_all();
}

#[test]
#[serial]
fn auth_token_absent_is_none() {
    clear_all();
    assert_eq!(auth_token(), None);
}

#[test]
#[serial]
fn auth_token_empty_string_is_filtered_to_none() {
    clear_all();
    std::env::set_var("CORE_AUTH_TOKEN", "");
    assert_eq!(auth_token(), None);
    clear_all();
}

#[test]
#[serial]
fn auth_token_present_is_returned() {
    clear_all();
    std::env::set_var("CORE_AUTH_TOKEN", "s3cret");
    assert_eq!(auth_token(), Some("s3cret".to_string()));
    clear_all();
}
