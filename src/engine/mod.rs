//! The statechart runtime.
//!
//! A [`Machine`] drives a shared [`StateTable`](crate::core::StateTable):
//!
//! - **Init** enters the root and its default-child chain
//! - **Dispatch** resolves the nearest action for an event, runs it, and
//!   classifies the target as a direct child, an active ancestor (rollback),
//!   or a sibling branch reached through an active ancestor
//! - **Reset** unwinds every active state and runs init again
//!
//! Every entry and exit callback runs exactly once per activation change,
//! outer states entered before inner ones and inner states exited before
//! outer ones. Failure never panics: a target the engine cannot reach
//! leaves the machine invalid until it is reset.

mod error;
mod machine;

pub use error::{Dispatch, EngineError};
pub use machine::Machine;
pub(crate) use machine::Status;
