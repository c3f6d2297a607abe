//! Builder for constructing state tables.

use crate::builder::error::BuildError;
use crate::builder::state::StateBuilder;
use crate::core::{StateId, StateRecord, StateTable, TransitionPolicy};
use crate::validation;
use std::collections::BTreeMap;
use stillwater::validation::Validation;

/// Builder for constructing a [`StateTable`] with a fluent API.
///
/// States may be added in any order; `build` checks the whole hierarchy.
pub struct StateTableBuilder<C, E = ()> {
    states: BTreeMap<StateId, StateRecord<C, E>>,
    duplicate: Option<StateId>,
    policy: TransitionPolicy,
}

impl<C, E> StateTableBuilder<C, E> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            states: BTreeMap::new(),
            duplicate: None,
            policy: TransitionPolicy::default(),
        }
    }

    /// Add a state using a builder.
    /// Returns an error if the builder fails or the id is already taken.
    pub fn state(mut self, builder: StateBuilder<C, E>) -> Result<Self, BuildError> {
        let record = builder.build()?;
        if self.states.contains_key(&record.id) {
            return Err(BuildError::DuplicateState(record.id));
        }
        self.states.insert(record.id, record);
        Ok(self)
    }

    /// Add a pre-built record. Duplicates are reported by `build`.
    pub fn add_state(mut self, record: StateRecord<C, E>) -> Self {
        if self.states.contains_key(&record.id) {
            self.duplicate.get_or_insert(record.id);
        } else {
            self.states.insert(record.id, record);
        }
        self
    }

    /// Add multiple pre-built records at once.
    pub fn states(self, records: Vec<StateRecord<C, E>>) -> Self {
        records
            .into_iter()
            .fold(self, |builder, record| builder.add_state(record))
    }

    /// Choose how cross-branch transitions are resolved.
    pub fn policy(mut self, policy: TransitionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Build the table.
    /// Returns an error if any structural invariant is violated.
    pub fn build(self) -> Result<StateTable<C, E>, BuildError> {
        if self.states.is_empty() {
            return Err(BuildError::EmptyTable);
        }
        if !self.states.contains_key(&StateId::ROOT) {
            return Err(BuildError::MissingRoot);
        }
        if let Some(id) = self.duplicate {
            return Err(BuildError::DuplicateState(id));
        }

        if let Validation::Failure(errors) = validation::validate(&self.states) {
            let violations = errors.iter().cloned().collect::<Vec<_>>();
            tracing::warn!(count = violations.len(), "state table rejected");
            return Err(BuildError::InvalidTable { violations });
        }

        tracing::debug!(
            states = self.states.len(),
            policy = ?self.policy,
            "state table built"
        );
        // dense ids: ascending key order is index order
        let states = self.states.into_values().collect();
        Ok(StateTable::from_parts(states, self.policy))
    }
}

impl<C, E> Default for StateTableBuilder<C, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, E> StateTable<C, E> {
    /// Start building a table.
    pub fn builder() -> StateTableBuilder<C, E> {
        StateTableBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EventId;
    use crate::validation::TableViolation;

    fn id(index: usize) -> StateId {
        StateId::new(index)
    }

    #[test]
    fn builder_requires_states() {
        let result = StateTableBuilder::<()>::new().build();
        assert!(matches!(result, Err(BuildError::EmptyTable)));
    }

    #[test]
    fn builder_requires_root() {
        let result = StateTableBuilder::<()>::new()
            .add_state(StateBuilder::new(id(1)).build().unwrap())
            .build();

        assert!(matches!(result, Err(BuildError::MissingRoot)));
    }

    #[test]
    fn state_rejects_duplicate_id() {
        let result = StateTableBuilder::<()>::new()
            .state(StateBuilder::root())
            .unwrap()
            .state(StateBuilder::root());

        assert!(matches!(result, Err(BuildError::DuplicateState(s)) if s.is_root()));
    }

    #[test]
    fn add_state_reports_duplicate_on_build() {
        let result = StateTableBuilder::<()>::new()
            .states(vec![
                StateBuilder::root().build().unwrap(),
                StateBuilder::new(id(1)).parent(StateId::ROOT).build().unwrap(),
                StateBuilder::new(id(1)).parent(StateId::ROOT).build().unwrap(),
            ])
            .build();

        assert!(matches!(result, Err(BuildError::DuplicateState(s)) if s == id(1)));
    }

    #[test]
    fn build_reports_structural_violations() {
        let result = StateTableBuilder::<()>::new()
            .state(StateBuilder::root().initial(id(2)))
            .unwrap()
            .state(StateBuilder::new(id(2)))
            .unwrap()
            .build();

        match result {
            Err(BuildError::InvalidTable { violations }) => {
                assert!(violations.contains(&TableViolation::MissingState(id(1))));
                assert!(violations.contains(&TableViolation::MissingParent(id(2))));
                assert!(violations.contains(&TableViolation::DefaultChildNotChild {
                    state: StateId::ROOT,
                    child: id(2),
                }));
            }
            other => panic!("Expected InvalidTable, got {other:?}"),
        }
    }

    #[test]
    fn fluent_api_builds_table() {
        let table = StateTable::<()>::builder()
            .state(StateBuilder::new(id(2)).name("Unlocked").parent(StateId::ROOT))
            .unwrap()
            .state(
                StateBuilder::new(id(1))
                    .name("Locked")
                    .parent(StateId::ROOT)
                    .goto(EventId::new(0), id(2)),
            )
            .unwrap()
            .state(StateBuilder::root().initial(id(1)))
            .unwrap()
            .policy(TransitionPolicy::LeastCommonAncestor)
            .build()
            .unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.name(id(1)), Some("Locked"));
        assert_eq!(table.name(id(2)), Some("Unlocked"));
        assert_eq!(table.policy(), TransitionPolicy::LeastCommonAncestor);
    }
}
