//! Conflict-resolution policies and the injected confirmation capability.
//!
//! The resolver is a small state machine with three terminal policies. It
//! holds no global state: the "how do I ask the user" capability is a trait
//! object passed in explicitly, and a failed or declined confirmation yields
//! an `Aborted` resolution rather than exiting the process.

use renameguard_types::ids;
use std::collections::BTreeSet;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Policy {
    Ask,
    Force,
    Skip,
}

impl Policy {
    pub fn as_str(self) -> &'static str {
        match self {
            Policy::Ask => ids::POLICY_ASK,
            Policy::Force => ids::POLICY_FORCE,
            Policy::Skip => ids::POLICY_SKIP,
        }
    }
}

/// Kinds eligible for a protection-lifting (`On -> Off`) update. Lifting
/// protection from a type or stored property is never done automatically.
pub const CALLABLE_KINDS: &[&str] = &["function", "method", "initializer", "subscript"];

pub fn callable_kinds() -> BTreeSet<String> {
    CALLABLE_KINDS.iter().map(|k| k.to_string()).collect()
}

/// Injected confirmation capability. Blocks until an answer arrives; there
/// is no timeout on interactive confirmation.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> Result<bool, ConfirmError>;
}

/// The confirmation channel could not produce an answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfirmError {
    EndOfInput,
    Interrupted,
}

impl fmt::Display for ConfirmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfirmError::EndOfInput => write!(f, "confirmation channel reported end of input"),
            ConfirmError::Interrupted => write!(f, "confirmation interrupted"),
        }
    }
}

impl std::error::Error for ConfirmError {}

/// Outcome of resolving one conflict category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Apply the protection change to these names.
    Apply {
        names: BTreeSet<String>,
        source: &'static str,
    },
    /// Leave the tree untouched; record the skip for later inspection.
    Skipped,
    /// Fail closed: an indeterminate protection state must not reach the
    /// rename stage.
    Aborted { reason: String },
}

/// Resolve one conflict category. `Ask` uses the batch strategy: one prompt
/// covering the whole candidate set.
pub fn resolve(
    policy: Policy,
    candidates: &BTreeSet<String>,
    prompt: &str,
    confirm: &mut dyn Confirm,
) -> Resolution {
    match policy {
        Policy::Force => Resolution::Apply {
            names: candidates.clone(),
            source: ids::SOURCE_POLICY_FORCE,
        },
        Policy::Skip => Resolution::Skipped,
        Policy::Ask => match confirm.confirm(prompt) {
            Ok(true) => Resolution::Apply {
                names: candidates.clone(),
                source: ids::SOURCE_USER_CONFIRMATION,
            },
            Ok(false) => Resolution::Aborted {
                reason: "declined by user".to_string(),
            },
            Err(err) => Resolution::Aborted {
                reason: err.to_string(),
            },
        },
    }
}
