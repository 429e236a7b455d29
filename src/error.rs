//! Crate-level error taxonomy.
//!
//! Only [`UnknownModeError`] propagates out of routine play: in-session
//! hazards (post-game-over events, clock underflow) are absorbed by the
//! mode state machines themselves.

use thiserror::Error;

use crate::store::StorageError;

/// Error returned when a mode identifier is outside the supported set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown game mode `{0}`")]
pub struct UnknownModeError(pub String);

/// Errors surfaced by the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Mode identifier outside the supported set.
    #[error(transparent)]
    UnknownMode(#[from] UnknownModeError),
    /// Question bank entry failed validation.
    #[error("invalid question {id}: {message}")]
    InvalidQuestion {
        /// Identifier of the offending bank entry.
        id: u32,
        /// What the entry violated.
        message: String,
    },
    /// Question bank could not be parsed.
    #[error("malformed question bank: {0}")]
    MalformedBank(#[from] serde_json::Error),
    /// Selected option index is outside the question's option list.
    #[error("option index {index} out of range for question {id}")]
    OptionOutOfRange {
        /// Identifier of the question being answered.
        id: u32,
        /// The out-of-range index the caller supplied.
        index: usize,
    },
    /// No question is currently active (deck exhausted or not loaded).
    #[error("no active question")]
    NoActiveQuestion,
    /// Storage failure while settling a finished session.
    #[error(transparent)]
    Storage(#[from] StorageError),
}
