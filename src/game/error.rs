//! Round engine error types.

use thiserror::Error;

/// Errors returned by the pool builder and the round engine.
///
/// None of these are fatal: the presentation layer either shows a
/// message (`InsufficientTracks`) or ignores the intent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// Not enough playable tracks to build a pool or start a session
    #[error("Not enough songs: found {available}, need at least {required}")]
    InsufficientTracks { available: usize, required: usize },

    /// An answer was already recorded for the current round
    #[error("Round already answered")]
    AlreadyAnswered,

    /// Tried to move on before answering the current round
    #[error("Current round has not been answered yet")]
    NotYetAnswered,

    /// The operation needs a session in progress
    #[error("No game in progress")]
    NotInProgress,

    /// The answer is not one of the round's options
    #[error("Unknown option: {0}")]
    UnknownOption(String),
}

impl GameError {
    /// Whether the player should see this error.
    ///
    /// Sequencing errors come from the UI sending intents at the wrong time
    /// and are only logged.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, GameError::InsufficientTracks { .. })
    }
}
