// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `DaemonClient`: a one-shot connection to `graced`'s administrative
//! surface (spec §6). Mirrors the teacher's `DaemonClient` — connect,
//! send exactly one framed request, read exactly one framed response —
//! scaled down to the four operations this surface actually exposes.

use std::path::{Path, PathBuf};

use grace_wire::{read_message, write_message, Request, Response};
use tokio::net::UnixStream;

use crate::error::ClientError;

pub const SOCKET_ENV: &str = "CORE_SOCKET_PATH";
pub const JOURNAL_ENV: &str = "CORE_JOURNAL_PATH";
const DEFAULT_SOCKET_FILENAME: &str = "grace.sock";

pub struct DaemonClient {
    stream: UnixStream,
}

impl DaemonClient {
    /// Connects to `socket_path`. Does not spawn `graced` — unlike the
    /// teacher's `connect_or_start`, starting the process is out of scope
    /// here (spec §1 excludes packaging/process-supervision tooling from
    /// the client).
    pub async fn connect(socket_path: &Path) -> Result<Self, ClientError> {
        let stream =
            UnixStream::connect(socket_path).await.map_err(|err| ClientError::connect_failed(socket_path, err))?;
        Ok(Self { stream })
    }

    /// Sends one request and returns the one response `graced` writes
    /// back, per the wire codec in `grace-wire`.
    pub async fn call(mut self, request: &Request) -> Result<Response, ClientError> {
        let payload = grace_wire::encode(request)?;
        write_message(&mut self.stream, &payload).await?;
        let response_bytes = read_message(&mut self.stream).await?;
        let response: Response = grace_wire::decode(&response_bytes)?;
        Ok(response)
    }
}

/// Resolves the socket path the same way `graced` does (daemon's
/// `env::socket_path`): an explicit `CORE_SOCKET_PATH`, or a `grace.sock`
/// sibling of `CORE_JOURNAL_PATH`, so a client run from the same
/// environment as the daemon needs no extra flag.
pub fn resolve_socket_path(explicit: Option<PathBuf>) -> Result<PathBuf, ClientError> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    if let Ok(value) = std::env::var(SOCKET_ENV) {
        return Ok(PathBuf::from(value));
    }
    if let Ok(journal_path) = std::env::var(JOURNAL_ENV) {
        let dir = PathBuf::from(journal_path).parent().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
        return Ok(dir.join(DEFAULT_SOCKET_FILENAME));
    }
    Err(ClientError::new(
        2,
        format!("no socket path: pass --socket, or set {SOCKET_ENV} or {JOURNAL_ENV}"),
    ))
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
