use thiserror::Error;

use crate::types::{Index, Move};

/// rejected by [`crate::board::GameState::try_apply`]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    #[error("move {0} is outside of the 9x9 grid")]
    OutOfRange(Move),

    #[error("cell {0} is already occupied")]
    Occupied(Move),

    #[error("move {move_} is in local board {board}, but the game is forced to board {forced}")]
    WrongBoard {
        move_: Move,
        board: Index,
        forced: Index,
    },

    #[error("move {0} targets a local board that is already decided")]
    BoardDecided(Move),

    #[error("game is already over")]
    GameOver,
}
