//! Build errors for state and table builders.

use crate::core::{EventId, StateId};
use crate::validation::TableViolation;
use thiserror::Error;

/// Errors that can occur when building state records and tables.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    #[error("No states defined. Add at least the root state")]
    EmptyTable,

    #[error("Root state not specified. Add a state with StateId::ROOT")]
    MissingRoot,

    #[error("State {0} was added more than once")]
    DuplicateState(StateId),

    #[error("State {state} defines more than one action for {event}")]
    DuplicateAction { state: StateId, event: EventId },

    #[error("State table failed validation with {} violation(s)", .violations.len())]
    InvalidTable { violations: Vec<TableViolation> },
}
