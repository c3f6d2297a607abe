//! Dispatch errors and outcomes.

use crate::core::{StateId, TransitionKind};
use thiserror::Error;

/// Outcome of a successful dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// No state defines an action for the event; nothing ran.
    Ignored,

    /// The action returned the current state; no entry or exit ran.
    Stayed(StateId),

    /// The machine moved. `to` is where it settled, which is below
    /// `target` when the target has default children.
    Transitioned {
        from: StateId,
        target: StateId,
        to: StateId,
        kind: TransitionKind,
    },
}

impl Dispatch {
    /// State the machine is in after the dispatch, if it changed.
    pub fn moved_to(&self) -> Option<StateId> {
        match self {
            Self::Transitioned { to, .. } => Some(*to),
            Self::Ignored | Self::Stayed(_) => None,
        }
    }
}

/// Errors that can occur during dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A previous transition failed; only `reset` recovers.
    #[error("Machine is invalid after a failed transition; reset it to continue")]
    InvalidMachine,

    #[error("No supported transition from {from} to {target}")]
    HierarchyViolation { from: StateId, target: StateId },

    #[error("Action in {from} returned unknown state {target}")]
    UnknownState { from: StateId, target: StateId },

    /// A callback panicked mid-transition and the panic was caught.
    #[error("A previous transition was interrupted; reset the machine to continue")]
    Interrupted,
}
