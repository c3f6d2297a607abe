//! Builder for constructing state records.

use crate::builder::error::BuildError;
use crate::core::{ActionFn, EventId, HookFn, StateId, StateRecord};
use std::collections::HashMap;

/// Builder for a single [`StateRecord`] with a fluent API.
pub struct StateBuilder<C, E = ()> {
    id: StateId,
    name: Option<String>,
    parent: Option<StateId>,
    initial: Option<StateId>,
    on_enter: Option<HookFn<C, E>>,
    on_exit: Option<HookFn<C, E>>,
    actions: HashMap<EventId, ActionFn<C, E>>,
    duplicate: Option<EventId>,
}

impl<C, E> StateBuilder<C, E> {
    /// Create a builder for the state with the given id.
    pub fn new(id: impl Into<StateId>) -> Self {
        Self {
            id: id.into(),
            name: None,
            parent: None,
            initial: None,
            on_enter: None,
            on_exit: None,
            actions: HashMap::new(),
            duplicate: None,
        }
    }

    /// Create a builder for the root state, named `"root"`.
    pub fn root() -> Self {
        Self::new(StateId::ROOT).name("root")
    }

    pub fn id(&self) -> StateId {
        self.id
    }

    /// Set the display name used in diagnostics (defaults to the id).
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the enclosing state (required for every state but the root).
    pub fn parent(mut self, parent: impl Into<StateId>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Set the default child entered on arrival. Omit for leaves.
    pub fn initial(mut self, child: impl Into<StateId>) -> Self {
        self.initial = Some(child.into());
        self
    }

    /// Set the entry callback.
    pub fn on_enter<F>(mut self, hook: F) -> Self
    where
        F: Fn(StateId, Option<EventId>, Option<&E>, &mut C) + Send + Sync + 'static,
    {
        self.on_enter = Some(Box::new(hook));
        self
    }

    /// Set the exit callback.
    pub fn on_exit<F>(mut self, hook: F) -> Self
    where
        F: Fn(StateId, Option<EventId>, Option<&E>, &mut C) + Send + Sync + 'static,
    {
        self.on_exit = Some(Box::new(hook));
        self
    }

    /// Handle `event` with an action computing the target state.
    ///
    /// Returning the machine's current state makes the event an internal
    /// reaction with no entry or exit callbacks.
    pub fn on<F, T>(mut self, event: impl Into<EventId>, action: F) -> Self
    where
        F: Fn(StateId, EventId, &E, &mut C) -> T + Send + Sync + 'static,
        T: Into<StateId>,
        C: 'static,
        E: 'static,
    {
        let event = event.into();
        let action: ActionFn<C, E> = Box::new(
            move |state: StateId, event: EventId, payload: &E, context: &mut C| {
                action(state, event, payload, context).into()
            },
        );
        if self.actions.insert(event, action).is_some() && self.duplicate.is_none() {
            self.duplicate = Some(event);
        }
        self
    }

    /// Handle `event` with an unconditional transition to `target`.
    pub fn goto(self, event: impl Into<EventId>, target: impl Into<StateId>) -> Self
    where
        C: 'static,
        E: 'static,
    {
        let target = target.into();
        self.on(event, move |_, _, _: &E, _: &mut C| target)
    }

    /// Build the record.
    pub fn build(self) -> Result<StateRecord<C, E>, BuildError> {
        if let Some(event) = self.duplicate {
            return Err(BuildError::DuplicateAction {
                state: self.id,
                event,
            });
        }

        Ok(StateRecord {
            id: self.id,
            name: self.name.unwrap_or_else(|| self.id.to_string()),
            parent: self.parent,
            default_child: self.initial,
            on_enter: self.on_enter,
            on_exit: self.on_exit,
            actions: self.actions,
        })
    }
}
