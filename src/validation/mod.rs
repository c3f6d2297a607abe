//! Structural validation of state tables.
//!
//! Every check runs and all violations are accumulated with Stillwater's
//! `Validation`, so a malformed table is reported in a single pass rather
//! than one defect at a time.
//!
//! A table that passes validation guarantees:
//! - ids are dense and id `0` is the root, which has no parent
//! - every other state names an existing parent
//! - the parent relation is acyclic, so every chain reaches the root
//! - every default child is a direct child of its state, so the
//!   default-child chain from any state terminates at a leaf

mod violations;

pub use violations::TableViolation;

use crate::core::{StateId, StateRecord};
use std::collections::BTreeMap;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

type Check = Validation<(), NonEmptyVec<TableViolation>>;

/// Validate the records of a table under construction, keyed by id.
pub fn validate<C, E>(
    states: &BTreeMap<StateId, StateRecord<C, E>>,
) -> Validation<(), NonEmptyVec<TableViolation>> {
    let mut checks: Vec<Check> = Vec::new();

    checks.extend(check_dense(states));
    checks.push(check_root(states));
    for record in states.values() {
        checks.push(check_parent(states, record));
        checks.push(check_default_child(states, record));
        checks.push(check_acyclic(states, record));
    }

    Validation::all_vec(checks).map(|_| ())
}

fn ok() -> Check {
    Validation::success(())
}

fn check_dense<C, E>(states: &BTreeMap<StateId, StateRecord<C, E>>) -> Vec<Check> {
    let Some(max) = states.keys().next_back() else {
        return vec![Validation::fail(TableViolation::EmptyTable)];
    };
    (0..=max.index())
        .map(StateId::new)
        .filter(|id| !states.contains_key(id))
        .map(|id| Validation::fail(TableViolation::MissingState(id)))
        .collect()
}

fn check_root<C, E>(states: &BTreeMap<StateId, StateRecord<C, E>>) -> Check {
    match states.get(&StateId::ROOT) {
        Some(root) if root.parent.is_some() => Validation::fail(TableViolation::RootHasParent),
        _ => ok(),
    }
}

fn check_parent<C, E>(
    states: &BTreeMap<StateId, StateRecord<C, E>>,
    record: &StateRecord<C, E>,
) -> Check {
    if record.id.is_root() {
        return ok();
    }
    match record.parent {
        None => Validation::fail(TableViolation::MissingParent(record.id)),
        Some(parent) if !states.contains_key(&parent) => {
            Validation::fail(TableViolation::UnknownParent {
                state: record.id,
                parent,
            })
        }
        Some(_) => ok(),
    }
}

fn check_default_child<C, E>(
    states: &BTreeMap<StateId, StateRecord<C, E>>,
    record: &StateRecord<C, E>,
) -> Check {
    let Some(child) = record.default_child else {
        return ok();
    };
    match states.get(&child) {
        None => Validation::fail(TableViolation::UnknownDefaultChild {
            state: record.id,
            child,
        }),
        Some(child_record) if child_record.parent != Some(record.id) => {
            Validation::fail(TableViolation::DefaultChildNotChild {
                state: record.id,
                child,
            })
        }
        Some(_) => ok(),
    }
}

/// A chain longer than the table itself must revisit a state.
fn check_acyclic<C, E>(
    states: &BTreeMap<StateId, StateRecord<C, E>>,
    record: &StateRecord<C, E>,
) -> Check {
    let mut current = record;
    for _ in 0..=states.len() {
        match current.parent.and_then(|parent| states.get(&parent)) {
            Some(parent) if !current.id.is_root() => current = parent,
            // reached the root, or a dangling parent reported elsewhere
            _ => return ok(),
        }
    }
    Validation::fail(TableViolation::ParentCycle(record.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::StateBuilder;

    fn states(builders: Vec<StateBuilder<()>>) -> BTreeMap<StateId, StateRecord<()>> {
        builders
            .into_iter()
            .map(|b| {
                let record = b.build().unwrap();
                (record.id(), record)
            })
            .collect()
    }

    fn violations(states: &BTreeMap<StateId, StateRecord<()>>) -> Vec<TableViolation> {
        match validate(states) {
            Validation::Success(_) => Vec::new(),
            Validation::Failure(errors) => errors.iter().cloned().collect(),
        }
    }

    fn id(index: usize) -> StateId {
        StateId::new(index)
    }

    #[test]
    fn well_formed_table_passes() {
        let states = states(vec![
            StateBuilder::root().initial(id(1)),
            StateBuilder::new(id(1)).parent(StateId::ROOT),
            StateBuilder::new(id(2)).parent(StateId::ROOT),
        ]);

        assert!(validate(&states).is_success());
    }

    #[test]
    fn empty_table_is_reported() {
        let states = states(Vec::new());
        assert_eq!(violations(&states), vec![TableViolation::EmptyTable]);
    }

    #[test]
    fn validation_accumulates_all_violations() {
        let states = states(vec![
            StateBuilder::root().parent(id(1)).initial(id(3)),
            StateBuilder::new(id(1)),
            StateBuilder::new(id(3)).parent(id(7)),
        ]);

        let found = violations(&states);
        assert!(found.contains(&TableViolation::MissingState(id(2))));
        assert!(found.contains(&TableViolation::RootHasParent));
        assert!(found.contains(&TableViolation::MissingParent(id(1))));
        assert!(found.contains(&TableViolation::UnknownParent {
            state: id(3),
            parent: id(7),
        }));
        assert!(found.contains(&TableViolation::DefaultChildNotChild {
            state: StateId::ROOT,
            child: id(3),
        }));
    }

    #[test]
    fn unknown_default_child_is_reported() {
        let states = states(vec![
            StateBuilder::root().initial(id(1)),
            StateBuilder::new(id(1)).parent(StateId::ROOT).initial(id(9)),
        ]);

        assert_eq!(
            violations(&states),
            vec![TableViolation::UnknownDefaultChild {
                state: id(1),
                child: id(9),
            }]
        );
    }

    #[test]
    fn parent_cycle_is_detected() {
        let states = states(vec![
            StateBuilder::root(),
            StateBuilder::new(id(1)).parent(id(2)),
            StateBuilder::new(id(2)).parent(id(1)),
            StateBuilder::new(id(3)).parent(id(3)),
        ]);

        let found = violations(&states);
        assert!(found.contains(&TableViolation::ParentCycle(id(1))));
        assert!(found.contains(&TableViolation::ParentCycle(id(2))));
        assert!(found.contains(&TableViolation::ParentCycle(id(3))));
    }

    #[test]
    fn default_child_cycle_is_impossible_once_children_are_direct() {
        // 1 -> 2 -> 1 as default children needs 2 to be both child and parent of 1
        let states = states(vec![
            StateBuilder::root().initial(id(1)),
            StateBuilder::new(id(1)).parent(StateId::ROOT).initial(id(2)),
            StateBuilder::new(id(2)).parent(id(1)).initial(id(1)),
        ]);

        assert_eq!(
            violations(&states),
            vec![TableViolation::DefaultChildNotChild {
                state: id(2),
                child: id(1),
            }]
        );
    }
}
