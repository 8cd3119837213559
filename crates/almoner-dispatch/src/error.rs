//! Error types for registration and dispatch.

use thiserror::Error;

/// Why a registration was rejected.
///
/// [`ActionRegistry::register`](crate::ActionRegistry::register) folds this
/// into a boolean; [`try_register`](crate::ActionRegistry::try_register)
/// returns it so callers can decide whether to log it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegisterError {
    /// An action with this key already exists. The first registration wins.
    #[error("action \"{0}\" is already registered")]
    DuplicateKey(String),

    #[error("action \"{0}\" has no label")]
    MissingLabel(String),

    #[error("action \"{0}\" has no callback")]
    MissingCallback(String),
}

/// Dispatch failures that point at a caller bug.
///
/// An action that exists but does not apply to the target is not an error;
/// see [`DispatchOutcome::Unavailable`](crate::DispatchOutcome::Unavailable).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("action \"{0}\" is not registered")]
    NotRegistered(String),
}
