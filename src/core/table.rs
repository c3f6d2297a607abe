//! The immutable state table and its hierarchy queries.
//!
//! A table is built once (see [`StateTableBuilder`](crate::builder::StateTableBuilder))
//! and then shared read-only by any number of machines. All queries here are
//! pure and run in time proportional to the depth of the hierarchy.

use super::id::{EventId, StateId};
use super::record::{ActionFn, StateRecord};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

/// How a transition between unrelated branches of the tree is resolved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionPolicy {
    /// Only a single hop is considered: the target's parent must already be
    /// active. Targets further away are hierarchy violations.
    #[default]
    SingleHop,

    /// Exit up to the least common ancestor of the current state and the
    /// target, then enter every state down to the target.
    LeastCommonAncestor,
}

/// Arena of state records indexed by [`StateId`].
///
/// Invariants established by the builder:
/// - ids are dense, `0..len()`, and id `0` is the root
/// - every parent chain reaches the root
/// - every default child is a direct child of its state
pub struct StateTable<C, E = ()> {
    states: Vec<StateRecord<C, E>>,
    policy: TransitionPolicy,
}

impl<C, E> StateTable<C, E> {
    pub(crate) fn from_parts(states: Vec<StateRecord<C, E>>, policy: TransitionPolicy) -> Self {
        Self { states, policy }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Always `false` for a built table, which holds at least the root.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn policy(&self) -> TransitionPolicy {
        self.policy
    }

    pub fn contains(&self, state: StateId) -> bool {
        state.index() < self.states.len()
    }

    pub fn get(&self, state: StateId) -> Option<&StateRecord<C, E>> {
        self.states.get(state.index())
    }

    pub fn records(&self) -> impl Iterator<Item = &StateRecord<C, E>> {
        self.states.iter()
    }

    pub fn name(&self, state: StateId) -> Option<&str> {
        self.get(state).map(StateRecord::name)
    }

    /// Display name for diagnostics; never fails.
    pub(crate) fn label(&self, state: StateId) -> &str {
        self.name(state).unwrap_or("<unknown>")
    }

    pub fn parent(&self, state: StateId) -> Option<StateId> {
        self.get(state).and_then(StateRecord::parent)
    }

    pub fn default_child(&self, state: StateId) -> Option<StateId> {
        self.get(state).and_then(StateRecord::default_child)
    }

    pub fn is_leaf(&self, state: StateId) -> bool {
        self.get(state).is_some_and(StateRecord::is_leaf)
    }

    /// Walk from `state` up to the root, `state` first.
    pub fn ancestors(&self, state: StateId) -> Ancestors<'_, C, E> {
        Ancestors {
            table: self,
            next: self.contains(state).then_some(state),
        }
    }

    /// Number of proper ancestors of `state` (the root has depth 0).
    pub fn depth(&self, state: StateId) -> usize {
        self.ancestors(state).count().saturating_sub(1)
    }

    /// Returns `candidate` if it is `state` itself or one of its ancestors.
    ///
    /// The walk always stops at the root.
    pub fn ancestor_of(&self, candidate: StateId, state: StateId) -> Option<StateId> {
        let found = self.ancestors(state).find(|&s| s == candidate);
        trace!(%candidate, %state, found = found.is_some(), "ancestor lookup");
        found
    }

    /// Deepest state that encloses both `a` and `b` (each counts as its own
    /// ancestor). `None` only if either id is outside the table.
    pub fn common_ancestor(&self, a: StateId, b: StateId) -> Option<StateId> {
        if !self.contains(b) {
            return None;
        }
        self.ancestors(a)
            .find(|&candidate| self.ancestor_of(candidate, b).is_some())
    }

    /// Ancestor of `state` that sits `depth` levels below the root.
    pub(crate) fn ancestor_at_depth(&self, state: StateId, depth: usize) -> Option<StateId> {
        let own = self.depth(state);
        if depth > own {
            return None;
        }
        self.ancestors(state).nth(own - depth)
    }

    /// Nearest handler for `event`, searching from `state` up to the root.
    ///
    /// `None` is a legitimate outcome: the event is a no-op in `state`.
    pub fn resolve_action(
        &self,
        state: StateId,
        event: Option<EventId>,
    ) -> Option<(StateId, &ActionFn<C, E>)> {
        let event = event?;
        let resolved = self.ancestors(state).find_map(|s| {
            self.get(s)
                .and_then(|record| record.action(event))
                .map(|action| (s, action))
        });
        match &resolved {
            Some((owner, _)) => trace!(%state, %event, owner = %owner, "action resolved"),
            None => trace!(%state, %event, "no action in hierarchy"),
        }
        resolved
    }
}

impl<C, E> fmt::Debug for StateTable<C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateTable")
            .field("policy", &self.policy)
            .field("states", &self.states)
            .finish()
    }
}

/// Iterator over a state and its ancestors, innermost first.
pub struct Ancestors<'t, C, E> {
    table: &'t StateTable<C, E>,
    next: Option<StateId>,
}

impl<C, E> Iterator for Ancestors<'_, C, E> {
    type Item = StateId;

    fn next(&mut self) -> Option<StateId> {
        let current = self.next?;
        self.next = self.table.parent(current);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{StateBuilder, StateTableBuilder};

    const ROOT: StateId = StateId::ROOT;
    const A: StateId = StateId::new(1);
    const A1: StateId = StateId::new(2);
    const A1X: StateId = StateId::new(3);
    const B: StateId = StateId::new(4);
    const B1: StateId = StateId::new(5);

    const PING: EventId = EventId::new(0);
    const PONG: EventId = EventId::new(1);

    //        root
    //       /    \
    //      A      B
    //      |      |
    //      A1     B1
    //      |
    //      A1X
    fn table() -> StateTable<()> {
        StateTableBuilder::new()
            .state(StateBuilder::root().initial(A).goto(PONG, B))
            .unwrap()
            .state(StateBuilder::new(A).name("A").parent(ROOT).initial(A1))
            .unwrap()
            .state(StateBuilder::new(A1).name("A1").parent(A).initial(A1X).goto(PING, B1))
            .unwrap()
            .state(StateBuilder::new(A1X).name("A1X").parent(A1))
            .unwrap()
            .state(StateBuilder::new(B).name("B").parent(ROOT).initial(B1))
            .unwrap()
            .state(StateBuilder::new(B1).name("B1").parent(B))
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn ancestors_walk_to_root() {
        let table = table();
        let path: Vec<StateId> = table.ancestors(A1X).collect();
        assert_eq!(path, vec![A1X, A1, A, ROOT]);
        assert_eq!(table.ancestors(ROOT).collect::<Vec<_>>(), vec![ROOT]);
        assert_eq!(table.ancestors(StateId::new(99)).count(), 0);
    }

    #[test]
    fn depth_counts_proper_ancestors() {
        let table = table();
        assert_eq!(table.depth(ROOT), 0);
        assert_eq!(table.depth(A), 1);
        assert_eq!(table.depth(A1X), 3);
    }

    #[test]
    fn ancestor_of_includes_self_and_root() {
        let table = table();
        assert_eq!(table.ancestor_of(A1X, A1X), Some(A1X));
        assert_eq!(table.ancestor_of(A, A1X), Some(A));
        assert_eq!(table.ancestor_of(ROOT, A1X), Some(ROOT));
        assert_eq!(table.ancestor_of(B, A1X), None);
        assert_eq!(table.ancestor_of(A1X, A), None);
    }

    #[test]
    fn common_ancestor_finds_deepest_shared_state() {
        let table = table();
        assert_eq!(table.common_ancestor(A1X, B1), Some(ROOT));
        assert_eq!(table.common_ancestor(A1X, A), Some(A));
        assert_eq!(table.common_ancestor(A1X, A1X), Some(A1X));
        assert_eq!(table.common_ancestor(A1X, StateId::new(42)), None);
    }

    #[test]
    fn ancestor_at_depth_selects_level() {
        let table = table();
        assert_eq!(table.ancestor_at_depth(A1X, 0), Some(ROOT));
        assert_eq!(table.ancestor_at_depth(A1X, 2), Some(A1));
        assert_eq!(table.ancestor_at_depth(A1X, 3), Some(A1X));
        assert_eq!(table.ancestor_at_depth(A, 2), None);
    }

    #[test]
    fn resolve_action_prefers_nearest_state() {
        let table = table();

        let (owner, _) = table.resolve_action(A1X, Some(PING)).unwrap();
        assert_eq!(owner, A1);

        let (owner, _) = table.resolve_action(A1X, Some(PONG)).unwrap();
        assert_eq!(owner, ROOT);

        assert!(table.resolve_action(B1, Some(PING)).is_none());
        assert!(table.resolve_action(A1X, Some(EventId::new(7))).is_none());
    }

    #[test]
    fn resolve_action_without_event_is_none() {
        let table = table();
        assert!(table.resolve_action(A1X, None).is_none());
    }

    #[test]
    fn queries_are_unchanged_under_a_trace_subscriber() {
        let table = table();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            assert_eq!(table.ancestor_of(A, A1X), Some(A));
            assert_eq!(table.ancestor_of(B, A1X), None);
            let (owner, _) = table.resolve_action(A1X, Some(PING)).unwrap();
            assert_eq!(owner, A1);
            assert!(table.resolve_action(B1, Some(PING)).is_none());
        });
    }

    #[test]
    fn leaf_and_child_queries() {
        let table = table();
        assert!(table.is_leaf(A1X));
        assert!(!table.is_leaf(A));
        assert_eq!(table.default_child(ROOT), Some(A));
        assert_eq!(table.parent(ROOT), None);
        assert_eq!(table.parent(B1), Some(B));
        assert_eq!(table.name(A1), Some("A1"));
        assert_eq!(table.len(), 6);
        assert!(!table.is_empty());
    }
}
