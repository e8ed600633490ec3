// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! grace-daemon: assembles the crates under `crates/` into `graced`, the
//! long-running core process (spec §4 end to end). [`env`] resolves the
//! operator-facing configuration, [`defaults`] supplies the version-1
//! governance/immune seed data, [`executor`] adapts the immune kernel's
//! remediation actions onto [`grace_control::KernelHost`], [`kernels`]
//! hosts the governance/synth/immune crates behind the uniform kernel
//! contract, [`context`] wires all of it into a bootable [`context::CoreContext`],
//! [`supervision`] runs the ongoing supervision tick, [`server`] exposes
//! the admin protocol over a Unix domain socket, and [`error`] maps
//! startup failures to this core's stable exit codes.

pub mod context;
pub mod defaults;
pub mod env;
pub mod error;
pub mod executor;
pub mod kernels;
pub mod server;
pub mod supervision;

pub use context::CoreContext;
pub use env::Config;
pub use error::DaemonError;
