// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! grace-mesh: the event mesh / trigger router (spec §4.3).
//!
//! [`manifest`] parses and validates declarative TOML route manifests into
//! [`grace_core::Route`]s. [`table`] compiles a manifest into a
//! [`table::RouteTable`] that can be hot-reloaded without interrupting
//! in-flight dispatch. [`validator`] defines the `Validator` trait a route
//! can require by name before dispatch, with a pass/drop/defer verdict.
//! [`pending`] parks `defer`red events until something resumes them by
//! `correlation_id`. [`dispatch`] ties these together into
//! [`dispatch::Mesh`], the publish/subscribe dispatcher the rest of the
//! runtime talks to.

pub mod dispatch;
pub mod error;
pub mod manifest;
pub mod pending;
pub mod table;
pub mod validator;

pub use dispatch::Mesh;
pub use error::MeshError;
pub use pending::PendingStore;
pub use table::{Generation, RouteTable};
pub use validator::{ChainOutcome, MaxPayloadSize, TrustThreshold, Validator, ValidatorOutcome, ValidatorRegistry};
