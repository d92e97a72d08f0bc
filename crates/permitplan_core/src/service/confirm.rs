//! Destructive-action confirmation seam.
//!
//! # Responsibility
//! - Let hosts veto destructive operations without the engine knowing
//!   anything about dialogs or terminals.
//!
//! # Invariants
//! - A declined gate leaves every piece of engine state untouched; the
//!   service enforces this by asking before mutating.

/// Destructive operations that require external confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestructiveAction {
    /// Remove every permit from the active schedule.
    ClearAll,
    /// Delete one saved plan.
    RemovePlan,
}

/// Confirmation collaborator for destructive operations.
pub trait ConfirmationGate {
    /// Returns whether the host approved `action`.
    fn confirm(&self, action: DestructiveAction) -> bool;
}

/// Gate that approves everything, for tests and non-interactive hosts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproveAll;

impl ConfirmationGate for ApproveAll {
    fn confirm(&self, _action: DestructiveAction) -> bool {
        true
    }
}
