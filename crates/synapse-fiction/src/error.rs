//! Error types for the game.

use synapse_core::CoreError;
use thiserror::Error;

use crate::save::SaveError;

/// Result type for game operations.
pub type FictionResult<T> = Result<T, FictionError>;

/// Errors that can occur while playing.
#[derive(Debug, Error)]
pub enum FictionError {
    /// Input that no command, trigger, or choice matched.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// A command was recognized but used incorrectly.
    #[error("{0}")]
    Usage(String),

    /// The player is not in a conversation with SYNAPSE.
    #[error("you are not talking to SYNAPSE right now")]
    NotInConversation,

    /// An ending has fired; no more turns are processed.
    #[error("the game is over")]
    GameOver,

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// A data model rule rejected the action.
    #[error("{0}")]
    Core(#[from] CoreError),

    /// Saving or loading failed.
    #[error("{0}")]
    Save(#[from] SaveError),
}
