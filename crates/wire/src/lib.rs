// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! grace-wire: request/response types and wire codec for the
//! administrative surface (spec §6).
//!
//! Wire format: 4-byte length prefix (big-endian) + JSON payload, shared
//! by `grace-daemon`'s Unix-domain-socket and optional TCP listeners and
//! by `grace-cli`'s client.

mod request;
mod response;
mod wire;

pub use request::Request;
pub use response::{BootPhase, HaltResult, Outcome, ReloadRoutesResult, Response, ResponsePayload, StatusReport};
pub use wire::{decode, encode, read_message, read_request, write_message, write_response, ProtocolError, MAX_MESSAGE_BYTES};
