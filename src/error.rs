//! Error types for memkeeper.

use std::io;
use thiserror::Error;

/// Result type alias for memkeeper operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the interview core and its storage.
///
/// Every variant is local to one session or story; none is fatal to the process.
#[derive(Debug, Error)]
pub enum Error {
    /// No live session with this ID, or the session no longer accepts input.
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// Finalize was called on a session with an empty history.
    #[error("Nothing to save for session {0}: the conversation is empty")]
    NothingToSave(String),

    /// Topic name outside the known vocabulary.
    #[error("Unknown topic: {0}")]
    UnknownTopic(String),

    /// Story not found in the store.
    #[error("Story not found: {0}")]
    StoryNotFound(String),

    /// Storage I/O error.
    #[error("Storage error: {0}")]
    Storage(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid state encountered.
    #[error("Invalid state: {0}")]
    InvalidState(String),
}
