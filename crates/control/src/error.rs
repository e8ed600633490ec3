// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use grace_core::{Fault, FaultKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ControlError {
    #[error("kernel '{0}' is already registered")]
    AlreadyRegistered(String),
    #[error("kernel '{0}' is not registered")]
    UnknownKernel(String),
    #[error("registration of '{0}' is only permitted during boot")]
    RegistrationWindowClosed(String),
    #[error("kernel '{name}' exceeded its handle budget of {budget_ms}ms")]
    HandleBudgetExceeded { name: String, budget_ms: u64 },
    #[error("kernel '{0}' initialise() failed: {1}")]
    InitialiseFailed(String, String),
    #[error("kernel '{0}' cannot transition: {1}")]
    IllegalTransition(String, String),
    #[error("boot did not complete within {0}s")]
    BootTimeout(u64),
    #[error("tier-1 kernel '{0}' failed boot after exhausting its restart budget")]
    Tier1BootFailure(String),
    #[error("action on '{name}' was cancelled after missing its deadline")]
    ActionTimeout { name: String },
    #[error("kernel '{0}' re-registered within its cooldown window under fingerprint {1}")]
    CooldownViolation(String, String),
}

impl From<&ControlError> for Fault {
    fn from(err: &ControlError) -> Self {
        match err {
            ControlError::AlreadyRegistered(_) | ControlError::RegistrationWindowClosed(_) => {
                Fault::new(FaultKind::Programmer, "control.registration_rejected", err.to_string())
            }
            ControlError::UnknownKernel(_) => {
                Fault::new(FaultKind::Programmer, "control.unknown_kernel", err.to_string())
            }
            ControlError::HandleBudgetExceeded { .. } | ControlError::InitialiseFailed(..) => {
                Fault::operational("control.kernel_fault", err.to_string())
            }
            ControlError::IllegalTransition(..) => {
                Fault::new(FaultKind::Programmer, "control.illegal_transition", err.to_string())
            }
            ControlError::BootTimeout(_) | ControlError::Tier1BootFailure(_) => {
                Fault::integrity("control.boot_failed", err.to_string())
            }
            ControlError::ActionTimeout { .. } => Fault::transient("control.action_timeout", err.to_string()),
            ControlError::CooldownViolation(..) => {
                Fault::new(FaultKind::Programmer, "control.cooldown_violation", err.to_string())
            }
        }
    }
}

impl From<ControlError> for Fault {
    fn from(err: ControlError) -> Self {
        Fault::from(&err)
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
