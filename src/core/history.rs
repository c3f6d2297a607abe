//! Transition history tracking.
//!
//! Machines record history only when asked to (see
//! [`Machine::with_history`](crate::engine::Machine::with_history)).

use super::id::{EventId, StateId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// How the engine classified a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransitionKind {
    /// Target is a direct child of the current state.
    DirectChild,
    /// Target is an ancestor that was already active; only exits ran.
    Rollback,
    /// Target's parent is an active ancestor.
    CommonParent,
    /// Target reached through its least common ancestor with the current state.
    CommonAncestor,
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::DirectChild => "direct-child",
            Self::Rollback => "rollback",
            Self::CommonParent => "common-parent",
            Self::CommonAncestor => "common-ancestor",
        };
        f.write_str(label)
    }
}

/// Record of a single completed transition.
///
/// # Example
///
/// ```rust
/// use statechart::core::{EventId, StateId, TransitionKind, TransitionRecord};
/// use chrono::Utc;
///
/// let record = TransitionRecord {
///     from: StateId::new(1),
///     to: StateId::new(2),
///     event: EventId::new(0),
///     kind: TransitionKind::CommonParent,
///     timestamp: Utc::now(),
/// };
/// assert_eq!(record.kind.to_string(), "common-parent");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// State active before the event
    pub from: StateId,
    /// State active once the transition settled
    pub to: StateId,
    /// Event that triggered the transition
    pub event: EventId,
    pub kind: TransitionKind,
    /// When the transition completed
    pub timestamp: DateTime<Utc>,
}

/// Ordered history of transitions.
///
/// History is immutable - `record` returns a new history with the
/// transition appended.
///
/// # Example
///
/// ```rust
/// use statechart::core::{EventId, StateHistory, StateId, TransitionKind, TransitionRecord};
/// use chrono::Utc;
///
/// let history = StateHistory::new().record(TransitionRecord {
///     from: StateId::new(1),
///     to: StateId::new(2),
///     event: EventId::new(0),
///     kind: TransitionKind::CommonParent,
///     timestamp: Utc::now(),
/// });
///
/// assert_eq!(history.get_path(), vec![StateId::new(1), StateId::new(2)]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StateHistory {
    transitions: Vec<TransitionRecord>,
}

impl StateHistory {
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Record a transition, returning a new history.
    pub fn record(&self, transition: TransitionRecord) -> Self {
        let mut transitions = self.transitions.clone();
        transitions.push(transition);
        Self { transitions }
    }

    /// Append in place; used by the machine that owns this history.
    pub(crate) fn push(&mut self, transition: TransitionRecord) {
        self.transitions.push(transition);
    }

    /// States traversed: the first `from`, then every `to`.
    pub fn get_path(&self) -> Vec<StateId> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.first() {
            path.push(first.from);
        }
        path.extend(self.transitions.iter().map(|t| t.to));
        path
    }

    /// Time between the first and last recorded transitions.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.transitions.first()?, self.transitions.last()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    pub fn transitions(&self) -> &[TransitionRecord] {
        &self.transitions
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}
