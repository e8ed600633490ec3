// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client-side error type, carrying the process exit code `main` uses.
//! `grace-cli` deliberately has no exit-code contract of its own (spec §6
//! fixes `graced`'s exit codes, not the client's); non-zero-but-small codes
//! here just distinguish "couldn't reach the daemon" from "daemon said no".

use std::fmt;

#[derive(Debug)]
pub struct ClientError {
    pub code: i32,
    pub message: String,
}

impl ClientError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }

    pub fn connect_failed(socket: &std::path::Path, source: std::io::Error) -> Self {
        Self::new(2, format!("could not reach graced at {} ({source})", socket.display()))
    }

    pub fn protocol(source: grace_wire::ProtocolError) -> Self {
        Self::new(2, format!("admin surface protocol error: {source}"))
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ClientError {}

impl From<grace_wire::ProtocolError> for ClientError {
    fn from(err: grace_wire::ProtocolError) -> Self {
        Self::protocol(err)
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
