//! Checkpoint error types.

use thiserror::Error;

/// Errors that can occur while saving or restoring a machine checkpoint
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckpointError {
    #[error("Checkpoint serialization failed: {0}")]
    SerializationFailed(String),

    #[error("Checkpoint deserialization failed: {0}")]
    DeserializationFailed(String),

    #[error("Unsupported checkpoint version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// The checkpoint does not fit the table it is resumed against
    #[error("Checkpoint does not match state table: {0}")]
    ValidationFailed(String),
}
