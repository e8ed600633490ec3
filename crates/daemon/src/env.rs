// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon (spec §6
//! "Environment variables"). The core recognises exactly these options;
//! every getter here has a documented default and fails typed rather than
//! panicking on a malformed value.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_BOOT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_HEARTBEAT_INTERVAL_SECONDS: u64 = 10;
pub const DEFAULT_MAX_RESTARTS: u32 = 3;
pub const DEFAULT_SOCKET_FILENAME: &str = "grace.sock";

#[derive(Debug, Error)]
pub enum EnvError {
    #[error("{name} is required but was not set")]
    Missing { name: &'static str },
    #[error("{name}={value:?} could not be parsed: {detail}")]
    Invalid { name: &'static str, value: String, detail: String },
}

/// Operating mode (spec §6 `CORE_MODE`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreMode {
    Normal,
    Safe,
    Degraded,
}

impl FromStr for CoreMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(CoreMode::Normal),
            "safe" => Ok(CoreMode::Safe),
            "degraded" => Ok(CoreMode::Degraded),
            other => Err(format!("expected one of normal|safe|degraded, got {other:?}")),
        }
    }
}

fn parsed_var<T: FromStr>(name: &'static str, default: T) -> Result<T, EnvError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(value) => value
            .parse::<T>()
            .map_err(|e| EnvError::Invalid { name, value, detail: e.to_string() }),
        Err(std::env::VarError::NotPresent) => Ok(default),
        Err(std::env::VarError::NotUnicode(_)) => {
            Err(EnvError::Invalid { name, value: "<non-utf8>".to_string(), detail: "not valid UTF-8".to_string() })
        }
    }
}

fn required_path(name: &'static str) -> Result<PathBuf, EnvError> {
    std::env::var(name).map(PathBuf::from).map_err(|_| EnvError::Missing { name })
}

/// `CORE_BOOT_TIMEOUT_SECONDS` (default 30).
pub fn boot_timeout() -> Result<Duration, EnvError> {
    parsed_var("CORE_BOOT_TIMEOUT_SECONDS", DEFAULT_BOOT_TIMEOUT_SECONDS).map(Duration::from_secs)
}

/// `CORE_HEARTBEAT_INTERVAL_SECONDS` (default 10).
pub fn heartbeat_interval() -> Result<Duration, EnvError> {
    parsed_var("CORE_HEARTBEAT_INTERVAL_SECONDS", DEFAULT_HEARTBEAT_INTERVAL_SECONDS).map(Duration::from_secs)
}

/// `CORE_MAX_RESTARTS_DEFAULT` (default 3).
pub fn max_restarts_default() -> Result<u32, EnvError> {
    parsed_var("CORE_MAX_RESTARTS_DEFAULT", DEFAULT_MAX_RESTARTS)
}

/// `CORE_MODE` (default normal).
pub fn mode() -> Result<CoreMode, EnvError> {
    match std::env::var("CORE_MODE") {
        Ok(value) => value
            .parse::<CoreMode>()
            .map_err(|detail| EnvError::Invalid { name: "CORE_MODE", value, detail }),
        Err(_) => Ok(CoreMode::Normal),
    }
}

/// `CORE_JOURNAL_PATH` (required).
pub fn journal_path() -> Result<PathBuf, EnvError> {
    required_path("CORE_JOURNAL_PATH")
}

/// `CORE_ROUTE_MANIFEST_PATH` (required).
pub fn route_manifest_path() -> Result<PathBuf, EnvError> {
    required_path("CORE_ROUTE_MANIFEST_PATH")
}

/// `CORE_SOCKET_PATH` (spec.md §6 fixes the four administrative
/// operations but leaves their transport to the implementer; this core
/// follows the teacher's daemon/cli split and exposes them over a Unix
/// domain socket). Defaults to a `grace.sock` sibling of the journal file
/// so a fresh deployment needs no additional configuration.
pub fn socket_path(journal_path: &std::path::Path) -> Result<PathBuf, EnvError> {
    match std::env::var("CORE_SOCKET_PATH") {
        Ok(value) => Ok(PathBuf::from(value)),
        Err(std::env::VarError::NotPresent) => {
            let dir = journal_path.parent().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
            Ok(dir.join(DEFAULT_SOCKET_FILENAME))
        }
        Err(std::env::VarError::NotUnicode(_)) => Err(EnvError::Invalid {
            name: "CORE_SOCKET_PATH",
            value: "<non-utf8>".to_string(),
            detail: "not valid UTF-8".to_string(),
        }),
    }
}

/// `CORE_TCP_PORT` (optional). When set, the daemon additionally listens
/// on this TCP port for remote administration — off by default, so the
/// default posture is local-only (spec.md §9 general caution against
/// silent bypass paths: a remote listener must be an explicit opt-in).
pub fn tcp_port() -> Result<Option<u16>, EnvError> {
    match std::env::var("CORE_TCP_PORT") {
        Ok(value) => value
            .parse::<u16>()
            .map(Some)
            .map_err(|e| EnvError::Invalid { name: "CORE_TCP_PORT", value, detail: e.to_string() }),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(std::env::VarError::NotUnicode(_)) => Err(EnvError::Invalid {
            name: "CORE_TCP_PORT",
            value: "<non-utf8>".to_string(),
            detail: "not valid UTF-8".to_string(),
        }),
    }
}

/// `CORE_AUTH_TOKEN` (required when `CORE_TCP_PORT` is set; ignored
/// otherwise). Checked by every TCP connection's first request.
pub fn auth_token() -> Option<String> {
    std::env::var("CORE_AUTH_TOKEN").ok().filter(|s| !s.is_empty())
}

/// Everything a boot needs, resolved once at startup so a single malformed
/// variable fails fast instead of surfacing halfway through boot.
#[derive(Debug, Clone)]
pub struct Config {
    pub boot_timeout: Duration,
    pub heartbeat_interval: Duration,
    pub max_restarts_default: u32,
    pub mode: CoreMode,
    pub journal_path: PathBuf,
    pub route_manifest_path: PathBuf,
    pub socket_path: PathBuf,
    pub tcp_port: Option<u16>,
    pub auth_token: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, EnvError> {
        let journal_path = journal_path()?;
        let socket_path = socket_path(&journal_path)?;
        Ok(Self {
            boot_timeout: boot_timeout()?,
            heartbeat_interval: heartbeat_interval()?,
            max_restarts_default: max_restarts_default()?,
            mode: mode()?,
            route_manifest_path: route_manifest_path()?,
            journal_path,
            socket_path,
            tcp_port: tcp_port()?,
            auth_token: auth_token(),
        })
    }
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
