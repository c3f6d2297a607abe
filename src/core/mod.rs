//! Core statechart types.
//!
//! This module contains the immutable description of a state hierarchy:
//! - Typed identifiers for states and events
//! - State records with entry/exit callbacks and event actions
//! - The shared state table and its pure hierarchy queries
//! - Transition history records
//!
//! Nothing in this module mutates a running machine; see
//! [`engine`](crate::engine) for that.

mod history;
mod id;
mod record;
mod table;

pub use history::{StateHistory, TransitionKind, TransitionRecord};
pub use id::{EventId, StateId};
pub use record::{ActionFn, HookFn, StateRecord};
pub use table::{Ancestors, StateTable, TransitionPolicy};
