use std::fmt::{self, Write};

use itertools::Itertools;
use rand::Rng;

use crate::{
    consts,
    error::MoveError,
    types::{BoardStatus, CellState, Index, Move, Outcome, Player},
};

pub mod grid;
pub mod one_bit;
pub mod packed;

/// Rules of Ultimate Tic-Tac-Toe over one immutable position.
///
/// Every move produces a new value, a position is never mutated by more than one owner.
/// Implemented by [`packed::PackedState`] (used by the search) and
/// [`grid::GridState`] (plain 9x9 reference encoding).
pub trait GameState: Copy + Default + fmt::Debug {
    fn active_player(&self) -> Player;
    /// local board the next move has to be played in, `None` if any undecided board is allowed
    fn forced_board(&self) -> Option<Index>;
    fn cell(&self, move_: Move) -> CellState;
    fn board_status(&self, board: Index) -> BoardStatus;
    fn outcome(&self) -> Outcome;
    fn moves_played(&self) -> u8;
    /// empty if and only if the position is terminal
    fn legal_moves(&self) -> Vec<Move>;

    /// Applies a move drawn from [`GameState::legal_moves`].
    ///
    /// Anything else is a programming error, only checked in debug builds.
    /// Use [`GameState::try_apply`] for moves coming from outside the engine.
    #[must_use]
    fn apply(&self, move_: Move) -> Self;

    fn is_terminal(&self) -> bool {
        self.outcome().is_terminal()
    }

    fn validate(&self, move_: Move) -> Result<(), MoveError> {
        if !move_.is_in_range() {
            return Err(MoveError::OutOfRange(move_));
        }
        if self.is_terminal() {
            return Err(MoveError::GameOver);
        }
        if self.cell(move_) != CellState::Free {
            return Err(MoveError::Occupied(move_));
        }
        if self.board_status(move_.board()).is_decided() {
            return Err(MoveError::BoardDecided(move_));
        }
        match self.forced_board() {
            Some(forced) if forced != move_.board() => Err(MoveError::WrongBoard {
                move_,
                board: move_.board(),
                forced,
            }),
            _ => Ok(()),
        }
    }

    fn is_legal(&self, move_: Move) -> bool {
        self.validate(move_).is_ok()
    }

    fn try_apply(&self, move_: Move) -> Result<Self, MoveError> {
        self.validate(move_)?;
        Ok(self.apply(move_))
    }

    /// uniformly random legal move, `None` on terminal positions
    fn random_move<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Move> {
        let moves = self.legal_moves();
        if moves.is_empty() {
            None
        } else {
            Some(moves[rng.random_range(0..moves.len())])
        }
    }

    /// the local boards as a meta board
    fn board_statuses(&self) -> [BoardStatus; consts::N_BOARDS as usize] {
        std::array::from_fn(|board| self.board_status(board as Index))
    }
}

fn cell_symbol(cell: CellState) -> char {
    cell.owner().map_or('.', |player| player.symbol())
}

fn status_symbol(status: BoardStatus) -> char {
    match status {
        BoardStatus::Undecided => '.',
        BoardStatus::Won(player) => player.symbol(),
        BoardStatus::Drawn => '=',
    }
}

/// Draws the 9x9 grid with local board separators followed by the meta board.
///
/// ```text
/// X . . | . . . | . . .
/// . . . | . O . | . . .
/// . . . | . . . | . . .
/// ------+-------+------
/// ...
/// ```
pub fn render<S: GameState>(state: &S) -> String {
    let mut out = String::new();
    for row in 0..consts::GRID_SIDE {
        if row != 0 && row % consts::ROWS == 0 {
            out.push_str("------+-------+------\n");
        }
        let line = (0..consts::COLS)
            .map(|board_col| {
                (0..consts::COLS)
                    .map(|col| {
                        cell_symbol(state.cell(Move::new(row, board_col * consts::COLS + col)))
                    })
                    .join(" ")
            })
            .join(" | ");
        out.push_str(&line);
        out.push('\n');
    }

    let statuses = state.board_statuses();
    let meta = statuses
        .chunks(consts::COLS as usize)
        .map(|row| row.iter().map(|status| status_symbol(*status)).join(""))
        .join("/");
    let forced = state
        .forced_board()
        .map_or_else(|| "any".to_string(), |board| board.to_string());
    let outcome = match state.outcome() {
        Outcome::Ongoing => format!("{} to move", state.active_player().symbol()),
        Outcome::Won(player) => format!("{} won", player.symbol()),
        Outcome::Draw => "draw".to_string(),
    };
    // writing into a String can not fail
    let _ = write!(out, "meta {meta} | board {forced} | {outcome}");
    out
}

/// whether `player` completes a line in the local board of `move_` by playing it
pub(crate) fn would_win_board<S: GameState>(state: &S, move_: Move, player: Player) -> bool {
    let board = move_.board();
    let mut owned = one_bit::OneBitBoard::default();
    for cell in 0..consts::N_CELLS {
        if state.cell(Move::from_board_cell(board, cell)).owner() == Some(player) {
            owned.set_cell(cell);
        }
    }
    owned.set_cell(move_.cell());
    owned.has_won()
}

#[cfg(test)]
mod test {
    use super::{packed::PackedState, *};

    #[test]
    fn render_empty_board() {
        let rendered = render(&PackedState::default());
        let lines = rendered.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 12);
        assert_eq!(lines[0], ". . . | . . . | . . .");
        assert_eq!(lines[3], "------+-------+------");
        assert_eq!(lines[11], "meta .../.../... | board any | X to move");
    }

    #[test]
    fn render_after_moves() {
        let state = PackedState::default()
            .apply(Move::new(4, 4))
            .apply(Move::new(3, 5));
        let rendered = render(&state);
        let lines = rendered.lines().collect::<Vec<_>>();
        assert_eq!(lines[4], ". . . | . . O | . . .");
        assert_eq!(lines[5], ". . . | . X . | . . .");
        assert!(lines[11].ends_with("board 2 | X to move"));
    }

    #[test]
    fn would_win_board_detects_lines() {
        let state = [(0, 1), (0, 3), (0, 0), (2, 2), (6, 7), (0, 4)]
            .into_iter()
            .fold(PackedState::default(), |state, (row, col)| {
                state.apply(Move::new(row, col))
            });
        assert!(would_win_board(&state, Move::new(0, 2), Player::Player1));
        assert!(!would_win_board(&state, Move::new(1, 1), Player::Player1));
        assert!(would_win_board(&state, Move::new(0, 5), Player::Player2));
        assert!(!would_win_board(&state, Move::new(0, 2), Player::Player2));
    }
}
