//! State records: one immutable entry per state in a table.

use super::id::{EventId, StateId};
use std::collections::HashMap;
use std::fmt;

/// Entry or exit callback.
///
/// Invoked with the state being entered or exited, the event that caused
/// the activation change (`None` during init and reset), that event's
/// payload, and the machine's context.
pub type HookFn<C, E> = Box<dyn Fn(StateId, Option<EventId>, Option<&E>, &mut C) + Send + Sync>;

/// Event action: computes the target state of a transition.
///
/// Receives the machine's current state (not necessarily the state that
/// defines the action, since actions are inherited from ancestors), the
/// event, its payload and the context.
pub type ActionFn<C, E> = Box<dyn Fn(StateId, EventId, &E, &mut C) -> StateId + Send + Sync>;

/// One node of the state hierarchy.
///
/// Records are produced by [`StateBuilder`](crate::builder::StateBuilder)
/// and are immutable once placed in a [`StateTable`](super::StateTable).
pub struct StateRecord<C, E = ()> {
    pub(crate) id: StateId,
    pub(crate) name: String,
    pub(crate) parent: Option<StateId>,
    pub(crate) default_child: Option<StateId>,
    pub(crate) on_enter: Option<HookFn<C, E>>,
    pub(crate) on_exit: Option<HookFn<C, E>>,
    pub(crate) actions: HashMap<EventId, ActionFn<C, E>>,
}

impl<C, E> StateRecord<C, E> {
    pub fn id(&self) -> StateId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Immediate enclosing state; `None` only for the root.
    pub fn parent(&self) -> Option<StateId> {
        self.parent
    }

    /// Substate entered automatically on arrival; `None` for leaves.
    pub fn default_child(&self) -> Option<StateId> {
        self.default_child
    }

    pub fn is_leaf(&self) -> bool {
        self.default_child.is_none()
    }

    /// Action this state defines for `event`, ignoring ancestors.
    pub fn action(&self, event: EventId) -> Option<&ActionFn<C, E>> {
        self.actions.get(&event)
    }

    /// Events this state handles directly, in ascending order.
    pub fn handled_events(&self) -> Vec<EventId> {
        let mut events: Vec<EventId> = self.actions.keys().copied().collect();
        events.sort();
        events
    }

    pub(crate) fn enter(&self, event: Option<EventId>, payload: Option<&E>, context: &mut C) {
        if let Some(hook) = &self.on_enter {
            hook(self.id, event, payload, context);
        }
    }

    pub(crate) fn exit(&self, event: Option<EventId>, payload: Option<&E>, context: &mut C) {
        if let Some(hook) = &self.on_exit {
            hook(self.id, event, payload, context);
        }
    }
}

impl<C, E> fmt::Debug for StateRecord<C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateRecord")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("parent", &self.parent)
            .field("default_child", &self.default_child)
            .field("on_enter", &self.on_enter.is_some())
            .field("on_exit", &self.on_exit.is_some())
            .field("events", &self.handled_events())
            .finish()
    }
}
