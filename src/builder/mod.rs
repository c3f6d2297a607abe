//! Builder API for ergonomic state table construction.
//!
//! This module provides fluent builders and macros for describing a state
//! hierarchy once, validating it, and freezing it into a shared
//! [`StateTable`](crate::core::StateTable).

pub mod error;
pub mod macros;
pub mod state;
pub mod table;

pub use error::BuildError;
pub use state::StateBuilder;
pub use table::StateTableBuilder;

use crate::core::{StateId, StateTable};

/// Build a flat table: a root plus leaf children, the first one initial.
///
/// Handy for plain (non-hierarchical) machines whose events are all
/// handled by sibling leaves.
///
/// # Example
///
/// ```
/// use statechart::builder::{flat_table, StateBuilder};
/// use statechart::core::{EventId, StateId};
///
/// let locked = StateId::new(1);
/// let unlocked = StateId::new(2);
///
/// let table = flat_table::<(), ()>(vec![
///     StateBuilder::new(locked).name("Locked").goto(EventId::new(0), unlocked),
///     StateBuilder::new(unlocked).name("Unlocked").goto(EventId::new(1), locked),
/// ])
/// .unwrap();
///
/// assert_eq!(table.default_child(StateId::ROOT), Some(locked));
/// ```
pub fn flat_table<C, E>(leaves: Vec<StateBuilder<C, E>>) -> Result<StateTable<C, E>, BuildError> {
    let first = leaves
        .first()
        .map(StateBuilder::id)
        .ok_or(BuildError::EmptyTable)?;

    leaves
        .into_iter()
        .try_fold(
            StateTableBuilder::new().state(StateBuilder::root().initial(first))?,
            |table, leaf| table.state(leaf.parent(StateId::ROOT)),
        )?
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EventId;

    #[test]
    fn flat_table_builds() {
        let table = flat_table::<(), ()>(vec![
            StateBuilder::new(StateId::new(1)).goto(EventId::new(0), StateId::new(2)),
            StateBuilder::new(StateId::new(2)),
        ])
        .unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.parent(StateId::new(2)), Some(StateId::ROOT));
        assert!(table.is_leaf(StateId::new(1)));
    }

    #[test]
    fn flat_table_requires_leaves() {
        let result = flat_table::<(), ()>(Vec::new());
        assert!(matches!(result, Err(BuildError::EmptyTable)));
    }
}
