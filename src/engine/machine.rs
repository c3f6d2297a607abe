//! Statechart machine: init, dispatch and reset over a shared table.

use crate::core::{
    EventId, StateHistory, StateId, StateTable, TransitionKind, TransitionPolicy,
    TransitionRecord,
};
use crate::engine::error::{Dispatch, EngineError};
use chrono::Utc;
use std::fmt;
use tracing::{debug, trace, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Status {
    Active,
    /// An unresolvable transition was attempted.
    Invalid,
    /// Set for the duration of a transition. Only observable afterwards if
    /// a callback panicked and the panic was caught.
    Transitioning,
}

/// How a resolved target will be reached.
#[derive(Clone, Copy, Debug)]
enum Plan {
    DirectChild,
    Rollback,
    /// Exit up to the given active ancestor, then enter the target.
    CommonParent(StateId),
    /// Exit up to the given ancestor, then enter every state down to the target.
    CommonAncestor(StateId),
}

/// A running statechart bound to a shared [`StateTable`].
///
/// The machine owns its context and hands it to every callback. All
/// operations take `&mut self`, so a callback can never dispatch into the
/// machine that is running it.
pub struct Machine<'t, C, E = ()> {
    pub(crate) table: &'t StateTable<C, E>,
    pub(crate) context: C,
    /// Innermost active state; kept current while primitives run.
    pub(crate) current: StateId,
    pub(crate) status: Status,
    pub(crate) history: Option<StateHistory>,
}

impl<'t, C, E> Machine<'t, C, E> {
    /// Create a machine and enter the table's default path from the root.
    pub fn init(table: &'t StateTable<C, E>, context: C) -> Self {
        let mut machine = Self {
            table,
            context,
            current: StateId::ROOT,
            status: Status::Transitioning,
            history: None,
        };
        machine.bootstrap();
        machine
    }

    /// Record every completed transition from now on.
    pub fn with_history(mut self) -> Self {
        self.history.get_or_insert_with(StateHistory::new);
        self
    }

    /// Current leaf (or rolled-back composite) state; `None` once invalid.
    pub fn current_state(&self) -> Option<StateId> {
        (self.status == Status::Active).then_some(self.current)
    }

    pub fn is_invalid(&self) -> bool {
        self.status != Status::Active
    }

    /// Whether `state` is active, i.e. the current state or an ancestor of it.
    pub fn is_in(&self, state: StateId) -> bool {
        self.current_state()
            .is_some_and(|current| self.table.ancestor_of(state, current).is_some())
    }

    /// Active configuration from the root down to the current state.
    pub fn active_path(&self) -> Vec<StateId> {
        let Some(current) = self.current_state() else {
            return Vec::new();
        };
        let mut path: Vec<StateId> = self.table.ancestors(current).collect();
        path.reverse();
        path
    }

    pub fn table(&self) -> &'t StateTable<C, E> {
        self.table
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    pub fn into_context(self) -> C {
        self.context
    }

    pub fn history(&self) -> Option<&StateHistory> {
        self.history.as_ref()
    }

    /// Execute one event.
    ///
    /// Resolves the nearest action for `event`, runs it, and performs the
    /// resulting transition atomically. A target that cannot be reached
    /// leaves the machine invalid until [`reset`](Self::reset).
    pub fn dispatch(
        &mut self,
        event: impl Into<EventId>,
        payload: &E,
    ) -> Result<Dispatch, EngineError> {
        let event = event.into();
        match self.status {
            Status::Active => {}
            Status::Invalid => {
                debug!(%event, "dispatch rejected: machine invalid");
                return Err(EngineError::InvalidMachine);
            }
            Status::Transitioning => {
                debug!(%event, "dispatch rejected: transition interrupted");
                return Err(EngineError::Interrupted);
            }
        }

        let table = self.table;
        let from = self.current;
        let Some((owner, action)) = table.resolve_action(from, Some(event)) else {
            trace!(state = %from, %event, "no action defined; event ignored");
            return Ok(Dispatch::Ignored);
        };

        self.status = Status::Transitioning;
        trace!(
            state = %from,
            owner = table.label(owner),
            %event,
            "running action"
        );
        let target = action(from, event, payload, &mut self.context);

        if target == from {
            self.status = Status::Active;
            trace!(state = %from, %event, "action kept current state");
            return Ok(Dispatch::Stayed(from));
        }

        let plan = match self.plan(from, target) {
            Ok(plan) => plan,
            Err(error) => {
                self.status = Status::Invalid;
                warn!(
                    from = table.label(from),
                    target = %target,
                    %event,
                    %error,
                    "unresolvable transition; machine invalid"
                );
                return Err(error);
            }
        };

        let kind = match plan {
            Plan::DirectChild => {
                self.enter(target, Some(event), Some(payload));
                TransitionKind::DirectChild
            }
            Plan::Rollback => {
                self.exit(target, Some(event), Some(payload));
                TransitionKind::Rollback
            }
            Plan::CommonParent(ancestor) => {
                self.exit(ancestor, Some(event), Some(payload));
                self.enter(target, Some(event), Some(payload));
                TransitionKind::CommonParent
            }
            Plan::CommonAncestor(ancestor) => {
                self.exit(ancestor, Some(event), Some(payload));
                self.enter_below(ancestor, target, Some(event), Some(payload));
                self.enter(target, Some(event), Some(payload));
                TransitionKind::CommonAncestor
            }
        };
        self.status = Status::Active;
        let to = self.current;

        if let Some(history) = &mut self.history {
            history.push(TransitionRecord {
                from,
                to,
                event,
                kind,
                timestamp: Utc::now(),
            });
        }

        debug!(
            from = table.label(from),
            to = table.label(to),
            %event,
            %kind,
            "transition complete"
        );
        Ok(Dispatch::Transitioned {
            from,
            target,
            to,
            kind,
        })
    }

    /// Unwind every active state below the root, then enter the default
    /// path again exactly as [`init`](Self::init) does.
    ///
    /// This is the only way out of an invalid machine.
    pub fn reset(&mut self) {
        debug!(
            state = self.table.label(self.current),
            status = ?self.status,
            "resetting machine"
        );
        self.status = Status::Transitioning;
        self.exit(StateId::ROOT, None, None);
        self.bootstrap();
    }

    fn bootstrap(&mut self) {
        self.status = Status::Transitioning;
        let leaf = self.enter(StateId::ROOT, None, None);
        self.status = Status::Active;
        debug!(state = self.table.label(leaf), "machine initialized");
    }

    fn plan(&self, from: StateId, target: StateId) -> Result<Plan, EngineError> {
        let table = self.table;
        if !table.contains(target) {
            return Err(EngineError::UnknownState { from, target });
        }

        let parent = table.parent(target);
        if parent == Some(from) {
            return Ok(Plan::DirectChild);
        }
        if table.ancestor_of(target, from) == Some(target) {
            return Ok(Plan::Rollback);
        }

        let violation = EngineError::HierarchyViolation { from, target };
        match table.policy() {
            TransitionPolicy::SingleHop => parent
                .and_then(|parent| table.ancestor_of(parent, from))
                .map(Plan::CommonParent)
                .ok_or(violation),
            TransitionPolicy::LeastCommonAncestor => {
                let ancestor = table.common_ancestor(from, target).ok_or(violation)?;
                if Some(ancestor) == parent {
                    Ok(Plan::CommonParent(ancestor))
                } else {
                    Ok(Plan::CommonAncestor(ancestor))
                }
            }
        }
    }

    /// Entry primitive: enter `state`, then its default-child chain, top-down.
    /// Returns the leaf reached.
    fn enter(&mut self, state: StateId, event: Option<EventId>, payload: Option<&E>) -> StateId {
        let table = self.table;
        let mut next = Some(state);
        while let Some(state) = next {
            let Some(record) = table.get(state) else {
                break;
            };
            trace!(state = %state, name = record.name(), "enter");
            record.enter(event, payload, &mut self.context);
            self.current = state;
            next = record.default_child();
        }
        self.current
    }

    /// Enter the states strictly between `ancestor` and `target`, top-down,
    /// without following default children.
    fn enter_below(
        &mut self,
        ancestor: StateId,
        target: StateId,
        event: Option<EventId>,
        payload: Option<&E>,
    ) {
        let table = self.table;
        for depth in table.depth(ancestor) + 1..table.depth(target) {
            let Some(record) = table
                .ancestor_at_depth(target, depth)
                .and_then(|state| table.get(state))
            else {
                continue;
            };
            trace!(state = %record.id(), name = record.name(), "enter");
            record.enter(event, payload, &mut self.context);
            self.current = record.id();
        }
    }

    /// Exit primitive: exit from the current state up to, but excluding,
    /// `target`, bottom-up. Stops at the root whatever `target` is.
    ///
    /// A state counts as exited once its exit hook has started, so a hook
    /// that panics is never run again by `reset`.
    fn exit(&mut self, target: StateId, event: Option<EventId>, payload: Option<&E>) {
        let table = self.table;
        while self.current != target {
            let Some(record) = table.get(self.current) else {
                break;
            };
            let parent = record.parent();
            if let Some(parent) = parent {
                self.current = parent;
            }
            trace!(state = %record.id(), name = record.name(), "exit");
            record.exit(event, payload, &mut self.context);
            if parent.is_none() {
                break;
            }
        }
    }
}

impl<C> Machine<'_, C, ()> {
    /// Dispatch an event that carries no payload.
    pub fn send(&mut self, event: impl Into<EventId>) -> Result<Dispatch, EngineError> {
        self.dispatch(event, &())
    }
}

impl<C: fmt::Debug, E> fmt::Debug for Machine<'_, C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Machine")
            .field("current", &self.current)
            .field("status", &self.status)
            .field("context", &self.context)
            .field("history", &self.history.as_ref().map(StateHistory::len))
            .finish()
    }
}
