use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

/// How a game ended when the side to move has nothing left to play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Checkmate,
    Stalemate,
    /// Game over by a draw rule while legal moves still exist.
    Draw,
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("position is terminal ({outcome:?}): no move to play")]
    TerminalPosition { outcome: Outcome },

    /// The shared board could not be kept consistent. Never recovered from.
    #[error("rules engine contract violated: {0}")]
    ContractViolation(String),

    #[error("invalid FEN: {0}")]
    InvalidFen(String),

    #[error("illegal move: {0}")]
    IllegalMove(String),
}

impl EngineError {
    pub fn contract(msg: impl Into<String>) -> Self {
        EngineError::ContractViolation(msg.into())
    }
}
