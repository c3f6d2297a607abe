//! Structural defects a state table can have.

use crate::core::StateId;
use thiserror::Error;

/// One structural defect found while validating a table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableViolation {
    #[error("table has no states")]
    EmptyTable,

    #[error("state {0} is missing; state ids must be dense starting at 0")]
    MissingState(StateId),

    #[error("root state must not have a parent")]
    RootHasParent,

    #[error("state {0} has no parent; only the root may omit one")]
    MissingParent(StateId),

    #[error("state {state} names unknown parent {parent}")]
    UnknownParent { state: StateId, parent: StateId },

    #[error("state {state} names unknown default child {child}")]
    UnknownDefaultChild { state: StateId, child: StateId },

    #[error("default child {child} of state {state} is not its direct child")]
    DefaultChildNotChild { state: StateId, child: StateId },

    #[error("parent chain of state {0} never reaches the root")]
    ParentCycle(StateId),
}
