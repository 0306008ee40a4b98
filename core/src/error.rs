use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("No bombs left!")]
    NoBombsLeft,
    #[error("Cell already armed or exploded!")]
    CellNotSafe,
    #[error("Wait for the current chain reaction to finish")]
    WaveInFlight,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
    #[error("Board must be square")]
    InvalidBoardShape,
    #[error("Unknown cell code")]
    InvalidCellCode,
    #[error("Unknown difficulty tier")]
    UnknownTier,
}

pub type Result<T> = core::result::Result<T, GameError>;
