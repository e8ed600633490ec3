// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Kernel wrappers: the thin adapters that let `grace-governance`,
//! `grace-synth`, and `grace-immune` hang off the mesh as ordinary
//! hosted kernels (spec §4.2's uniform contract), plus [`stub::StubKernel`],
//! the deliberately business-logic-free kernel used to stand in for named
//! domain kernels (spec §1 Non-goals: "specifying individual domain
//! kernels' business logic" is out of scope — only the contract they must
//! satisfy is).

pub mod governance_kernel;
pub mod immune_kernel;
pub mod stub;
pub mod synth_kernel;

pub use governance_kernel::GovernanceKernel;
pub use immune_kernel::ImmuneKernelAdapter;
pub use stub::StubKernel;
pub use synth_kernel::SynthKernel;
