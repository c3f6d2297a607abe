//! Checkpoint and resume functionality for machines.
//!
//! A checkpoint captures where a machine is in its table, so a long-lived
//! statechart can survive a process restart. Callbacks and the context are
//! not part of a checkpoint: the table is rebuilt by code and the caller
//! supplies the context again on resume.

use crate::core::{StateHistory, StateId, StateTable};
use crate::engine::{Machine, Status};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod error;

pub use error::CheckpointError;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Serializable snapshot of a machine's position.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: Uuid,

    /// When checkpoint was created
    pub timestamp: DateTime<Utc>,

    /// Innermost active state
    pub current_state: StateId,

    /// Whether the machine was locked out by a failed transition
    pub invalid: bool,

    /// Transition history, if the machine was recording one
    pub history: Option<StateHistory>,
}

impl Checkpoint {
    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    /// Deserialize from JSON, rejecting unsupported versions.
    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        let checkpoint: Self = serde_json::from_str(json)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.check_version()?;
        Ok(checkpoint)
    }

    /// Serialize to a compact binary form.
    pub fn to_binary(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    /// Deserialize from the binary form, rejecting unsupported versions.
    pub fn from_binary(bytes: &[u8]) -> Result<Self, CheckpointError> {
        let checkpoint: Self = bincode::deserialize(bytes)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.check_version()?;
        Ok(checkpoint)
    }

    fn check_version(&self) -> Result<(), CheckpointError> {
        if self.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            });
        }
        Ok(())
    }
}

impl<'t, C, E> Machine<'t, C, E> {
    /// Capture the machine's position.
    ///
    /// An interrupted machine is recorded as invalid.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            version: CHECKPOINT_VERSION,
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            current_state: self.current,
            invalid: self.status != Status::Active,
            history: self.history.clone(),
        }
    }

    /// Rebuild a machine at a checkpointed position.
    ///
    /// No entry callbacks run: the recorded states are considered to have
    /// stayed active while the machine was down.
    pub fn resume(
        table: &'t StateTable<C, E>,
        context: C,
        checkpoint: &Checkpoint,
    ) -> Result<Self, CheckpointError> {
        checkpoint.check_version()?;
        if !table.contains(checkpoint.current_state) {
            return Err(CheckpointError::ValidationFailed(format!(
                "state {} is not in a table of {} states",
                checkpoint.current_state,
                table.len()
            )));
        }

        tracing::debug!(
            checkpoint = %checkpoint.id,
            state = %checkpoint.current_state,
            invalid = checkpoint.invalid,
            "resuming machine"
        );
        Ok(Self {
            table,
            context,
            current: checkpoint.current_state,
            status: if checkpoint.invalid {
                Status::Invalid
            } else {
                Status::Active
            },
            history: checkpoint.history.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{StateBuilder, StateTableBuilder};
    use crate::core::EventId;
    use crate::engine::EngineError;

    const LOCKED: StateId = StateId::new(1);
    const UNLOCKED: StateId = StateId::new(2);
    const COIN: EventId = EventId::new(0);
    const PUSH: EventId = EventId::new(1);
    const BREAK: EventId = EventId::new(2);

    fn table() -> StateTable<u32> {
        StateTableBuilder::new()
            .state(StateBuilder::root().initial(LOCKED))
            .unwrap()
            .state(
                StateBuilder::new(LOCKED)
                    .parent(StateId::ROOT)
                    .goto(COIN, UNLOCKED)
                    .goto(BREAK, StateId::new(40)),
            )
            .unwrap()
            .state(
                StateBuilder::new(UNLOCKED)
                    .parent(StateId::ROOT)
                    .on_enter(|_, _, _, entries: &mut u32| *entries += 1)
                    .goto(PUSH, LOCKED),
            )
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn json_round_trip_preserves_position() {
        let table = table();
        let mut machine = Machine::init(&table, 0).with_history();
        machine.send(COIN).unwrap();

        let json = machine.checkpoint().to_json().unwrap();
        let checkpoint = Checkpoint::from_json(&json).unwrap();
        let resumed = Machine::resume(&table, 0, &checkpoint).unwrap();

        assert_eq!(resumed.current_state(), Some(UNLOCKED));
        assert_eq!(resumed.history().map(StateHistory::len), Some(1));
        // no entry callbacks on resume
        assert_eq!(*resumed.context(), 0);
    }

    #[test]
    fn binary_round_trip_preserves_position() {
        let table = table();
        let mut machine = Machine::init(&table, 0);
        machine.send(COIN).unwrap();
        machine.send(PUSH).unwrap();

        let checkpoint = machine.checkpoint();
        let bytes = checkpoint.to_binary().unwrap();
        let decoded = Checkpoint::from_binary(&bytes).unwrap();

        assert_eq!(decoded, checkpoint);
        assert_eq!(decoded.current_state, LOCKED);
        assert!(decoded.history.is_none());
    }

    #[test]
    fn invalid_machine_resumes_invalid() {
        let table = table();
        let mut machine = Machine::init(&table, 0);
        assert!(machine.send(BREAK).is_err());

        let checkpoint = machine.checkpoint();
        assert!(checkpoint.invalid);

        let mut resumed = Machine::resume(&table, 0, &checkpoint).unwrap();
        assert_eq!(resumed.send(COIN), Err(EngineError::InvalidMachine));

        resumed.reset();
        assert_eq!(resumed.current_state(), Some(LOCKED));
    }

    #[test]
    fn resume_rejects_unknown_state() {
        let table = table();
        let mut checkpoint = Machine::init(&table, 0).checkpoint();
        checkpoint.current_state = StateId::new(12);

        let result = Machine::resume(&table, 0, &checkpoint);
        assert!(matches!(result, Err(CheckpointError::ValidationFailed(_))));
    }

    #[test]
    fn unsupported_version_is_rejected() {
        let table = table();
        let mut checkpoint = Machine::init(&table, 0).checkpoint();
        checkpoint.version = CHECKPOINT_VERSION + 1;

        let json = serde_json::to_string(&checkpoint).unwrap();
        let result = Checkpoint::from_json(&json);

        assert!(matches!(
            result,
            Err(CheckpointError::UnsupportedVersion { found: 2, supported: 1 })
        ));
    }

    #[test]
    fn malformed_json_is_a_deserialization_error() {
        let result = Checkpoint::from_json("{ not json");
        assert!(matches!(result, Err(CheckpointError::DeserializationFailed(_))));
    }
}
