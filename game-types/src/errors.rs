use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Every failure a game operation can surface to a caller.
///
/// All variants except `Internal` are client faults and are returned as-is;
/// `Internal` wraps persistence failures and is never retried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, thiserror::Error)]
#[ts(export)]
pub enum GameError {
    #[error("{reason}")]
    InvalidInput { reason: String },
    #[error("Player already registered from this browser")]
    Conflict,
    #[error("Player not registered")]
    Unregistered,
    #[error("Player not found")]
    NotFound,
    #[error("Not a valid word")]
    UnknownWord { word: String },
    #[error("{reason}")]
    InvalidGuess { reason: String },
    #[error("No active game")]
    NoActiveGame,
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl GameError {
    pub fn internal(err: impl std::fmt::Display) -> Self {
        GameError::Internal {
            message: err.to_string(),
        }
    }

    pub fn is_client_fault(&self) -> bool {
        !matches!(self, GameError::Internal { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WordError {
    #[error("Guess must be exactly 5 letters")]
    WrongLength(usize),
    #[error("Guess must be exactly 5 letters")]
    NonAlphabetic,
}

impl From<WordError> for GameError {
    fn from(err: WordError) -> Self {
        GameError::InvalidGuess {
            reason: err.to_string(),
        }
    }
}
