use thiserror::Error;

use crate::{CellCount, Coord};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(ConfigIssue),
    #[error("Coordinates ({x}, {y}) are outside the board")]
    OutOfBounds { x: Coord, y: Coord },
}

/// Reason a board configuration was refused.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConfigIssue {
    #[error("width must be at least 1")]
    ZeroWidth,
    #[error("height must be at least 1")]
    ZeroHeight,
    #[error("{mines} mines leave no safe cell on a board of {cells} cells")]
    TooManyMines { mines: CellCount, cells: CellCount },
    #[error("board dimensions exceed the supported size")]
    TooLarge,
    #[error("mine layout does not match the requested board")]
    LayoutMismatch,
    #[error("saved board or game state contradicts its own cells")]
    InconsistentState,
}

impl From<ConfigIssue> for GameError {
    fn from(issue: ConfigIssue) -> Self {
        Self::InvalidConfiguration(issue)
    }
}

pub type Result<T> = core::result::Result<T, GameError>;
