use std::fmt;

use crate::{
    board::{GameState, render},
    consts,
    types::{BoardStatus, CellState, Index, Move, Outcome, Player},
};

/// the eight lines as row-major cell indices of a 3x3 board
const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

const SIDE: usize = consts::GRID_SIDE as usize;

/// Plain encoding: every cell owner of the 9x9 grid plus the status of each local board.
///
/// The board the next move is sent to is derived from the last move on demand.
/// Slower than [`super::packed::PackedState`], kept as the reference the packed
/// rules are checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GridState {
    cells: [[CellState; SIDE]; SIDE],
    statuses: [BoardStatus; consts::N_BOARDS as usize],
    active_player: Player,
    last_move: Option<Move>,
    outcome: Outcome,
    moves_played: u8,
}

impl GridState {
    fn local_cells(&self, board: Index) -> [CellState; consts::N_CELLS as usize] {
        std::array::from_fn(|cell| self.cell(Move::from_board_cell(board, cell as Index)))
    }

    fn local_winner(cells: &[CellState]) -> Option<Player> {
        LINES.iter().find_map(|[a, b, c]| {
            let owner = cells[*a].owner()?;
            (cells[*b].owner() == Some(owner) && cells[*c].owner() == Some(owner))
                .then_some(owner)
        })
    }

    fn meta_winner(&self) -> Option<Player> {
        LINES.iter().find_map(|&line| {
            let owners = line.map(|board| match self.statuses[board] {
                BoardStatus::Won(player) => Some(player),
                BoardStatus::Undecided | BoardStatus::Drawn => None,
            });
            match owners {
                [Some(a), Some(b), Some(c)] if a == b && b == c => Some(a),
                _ => None,
            }
        })
    }

    fn evaluate_outcome(&self) -> Outcome {
        if let Some(winner) = self.meta_winner() {
            return Outcome::Won(winner);
        }
        if self.statuses.iter().any(|status| !status.is_decided()) {
            return Outcome::Ongoing;
        }
        let count = |player| {
            self.statuses
                .iter()
                .filter(|status| **status == BoardStatus::Won(player))
                .count()
        };
        let (player1, player2) = (count(Player::Player1), count(Player::Player2));
        if player1 > player2 {
            Outcome::Won(Player::Player1)
        } else if player2 > player1 {
            Outcome::Won(Player::Player2)
        } else {
            Outcome::Draw
        }
    }

    fn is_board_full(&self, board: Index) -> bool {
        self.local_cells(board)
            .iter()
            .all(|cell| *cell != CellState::Free)
    }

    fn free_cells_of(&self, board: Index) -> impl Iterator<Item = Move> + '_ {
        (0..consts::N_CELLS)
            .map(move |cell| Move::from_board_cell(board, cell))
            .filter(move |move_| self.cell(*move_) == CellState::Free)
    }
}

impl GameState for GridState {
    fn active_player(&self) -> Player {
        self.active_player
    }

    fn forced_board(&self) -> Option<Index> {
        let target = self.last_move?.cell();
        if self.statuses[target as usize].is_decided() || self.is_board_full(target) {
            None
        } else {
            Some(target)
        }
    }

    fn cell(&self, move_: Move) -> CellState {
        self.cells[move_.row as usize][move_.col as usize]
    }

    fn board_status(&self, board: Index) -> BoardStatus {
        self.statuses[board as usize]
    }

    fn outcome(&self) -> Outcome {
        self.outcome
    }

    fn moves_played(&self) -> u8 {
        self.moves_played
    }

    fn legal_moves(&self) -> Vec<Move> {
        if self.outcome.is_terminal() {
            return Vec::new();
        }
        match self.forced_board() {
            Some(board) => self.free_cells_of(board).collect(),
            None => (0..consts::N_BOARDS)
                .filter(|board| !self.statuses[*board as usize].is_decided())
                .flat_map(|board| self.free_cells_of(board))
                .collect(),
        }
    }

    fn apply(&self, move_: Move) -> Self {
        debug_assert!(
            self.validate(move_).is_ok(),
            "illegal move {move_}: {:?}",
            self.validate(move_)
        );
        let mut next = *self;
        let player = self.active_player;
        let board = move_.board();

        next.cells[move_.row as usize][move_.col as usize] = player.cell_state();
        next.moves_played += 1;
        next.last_move = Some(move_);

        if !self.statuses[board as usize].is_decided() {
            let cells = next.local_cells(board);
            if let Some(winner) = Self::local_winner(&cells) {
                next.statuses[board as usize] = BoardStatus::Won(winner);
            } else if cells.iter().all(|cell| *cell != CellState::Free) {
                next.statuses[board as usize] = BoardStatus::Drawn;
            }
        }

        next.outcome = next.evaluate_outcome();
        next.active_player = player.other();
        next
    }
}

impl fmt::Display for GridState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn first_move_allows_everything() {
        let state = GridState::default();
        assert_eq!(state.legal_moves().len(), 81);
        assert_eq!(state.forced_board(), None);
    }

    #[test]
    fn center_sends_to_center() {
        let state = GridState::default().apply(Move::new(4, 4));
        assert_eq!(state.forced_board(), Some(4));
        let legal = state.legal_moves();
        assert_eq!(legal.len(), 8);
        assert!(legal.iter().all(|move_| move_.board() == 4));
        assert!(!legal.contains(&Move::new(4, 4)));
    }

    #[test]
    fn local_winner_lines() {
        use CellState::{Free, Player1, Player2};
        let cells = [
            Player2, Free, Player1, //
            Free, Player1, Free, //
            Player1, Player2, Free,
        ];
        assert_eq!(GridState::local_winner(&cells), Some(Player::Player1));
        let cells = [
            Player2, Free, Player1, //
            Player2, Player1, Free, //
            Free, Player2, Free,
        ];
        assert_eq!(GridState::local_winner(&cells), None);
    }

    #[test]
    fn count_tie_break() {
        use BoardStatus::{Drawn, Won};
        use Player::{Player1, Player2};
        let mut state = GridState {
            statuses: [
                Won(Player1),
                Won(Player1),
                Won(Player2),
                Won(Player2),
                Won(Player2),
                Won(Player1),
                Won(Player1),
                Won(Player2),
                Drawn,
            ],
            ..GridState::default()
        };
        assert_eq!(state.evaluate_outcome(), Outcome::Draw);
        state.statuses[8] = Won(Player2);
        assert_eq!(state.evaluate_outcome(), Outcome::Won(Player2));
        state.statuses[8] = BoardStatus::Undecided;
        assert_eq!(state.evaluate_outcome(), Outcome::Ongoing);
    }
}
