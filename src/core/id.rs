//! Strongly typed state and event identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a state in a [`StateTable`](crate::core::StateTable).
///
/// Identifier `0` is reserved for the root state, the ultimate ancestor of
/// every other state in the table.
///
/// # Example
///
/// ```rust
/// use statechart::core::StateId;
///
/// let locked = StateId::new(1);
/// assert_eq!(locked.index(), 1);
/// assert!(!locked.is_root());
/// assert!(StateId::ROOT.is_root());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateId(usize);

impl StateId {
    /// The root state.
    pub const ROOT: StateId = StateId(0);

    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }

    pub const fn is_root(self) -> bool {
        self.0 == 0
    }
}

impl From<usize> for StateId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier of an external stimulus dispatched to a machine.
///
/// Event ids are unsigned. The absence of an event (machine bootstrap and
/// reset) is expressed as `Option::<EventId>::None`, never as a reserved value.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(u32);

impl EventId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for EventId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "event {}", self.0)
    }
}
