use std::fmt;

use crate::consts;

/// one bit per cell of a 3x3 board, see [`crate::board::one_bit::OneBitBoard`]
pub type BoardState = u16;
pub type Index = u8;

/// 0 = Player1 (moves first, `X`), 1 = Player2 (`O`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Player {
    #[default]
    Player1 = 0,
    Player2 = 1,
}

impl Player {
    pub const fn other(&self) -> Player {
        match self {
            Player::Player1 => Player::Player2,
            Player::Player2 => Player::Player1,
        }
    }

    pub const fn cell_state(&self) -> CellState {
        match self {
            Player::Player1 => CellState::Player1,
            Player::Player2 => CellState::Player2,
        }
    }

    pub const fn symbol(&self) -> char {
        match self {
            Player::Player1 => 'X',
            Player::Player2 => 'O',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellState {
    #[default]
    Free,
    Player1,
    Player2,
}

impl CellState {
    pub const fn owner(&self) -> Option<Player> {
        match self {
            CellState::Free => None,
            CellState::Player1 => Some(Player::Player1),
            CellState::Player2 => Some(Player::Player2),
        }
    }
}

/// status of one local board, decided at most once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BoardStatus {
    #[default]
    Undecided,
    Won(Player),
    Drawn,
}

impl BoardStatus {
    pub const fn is_decided(&self) -> bool {
        !matches!(self, BoardStatus::Undecided)
    }
}

/// global result of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Outcome {
    #[default]
    Ongoing,
    Won(Player),
    Draw,
}

impl Outcome {
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::Ongoing)
    }

    pub const fn winner(&self) -> Option<Player> {
        match self {
            Outcome::Won(player) => Some(*player),
            Outcome::Ongoing | Outcome::Draw => None,
        }
    }
}

/// a cell of the 9x9 grid, `row` and `col` in `0..9`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Move {
    pub row: Index,
    pub col: Index,
}

impl Move {
    pub const fn new(row: Index, col: Index) -> Self {
        Self { row, col }
    }

    /// # Panics
    /// in debug builds if either index is out of range
    pub const fn from_board_cell(board: Index, cell: Index) -> Self {
        debug_assert!(board < consts::N_BOARDS);
        debug_assert!(cell < consts::N_CELLS);
        Self {
            row: (board / consts::COLS) * consts::ROWS + cell / consts::COLS,
            col: (board % consts::COLS) * consts::COLS + cell % consts::COLS,
        }
    }

    /// inverse of [`Move::board_major_idx`]
    pub const fn from_board_major_idx(idx: Index) -> Self {
        Self::from_board_cell(idx / consts::N_CELLS, idx % consts::N_CELLS)
    }

    pub const fn is_in_range(&self) -> bool {
        self.row < consts::GRID_SIDE && self.col < consts::GRID_SIDE
    }

    /// row-major index of the local board containing this cell
    pub const fn board(&self) -> Index {
        (self.row / consts::ROWS) * consts::COLS + self.col / consts::COLS
    }

    /// row-major index of the cell inside its local board, also the board the opponent is sent to
    pub const fn cell(&self) -> Index {
        (self.row % consts::ROWS) * consts::COLS + self.col % consts::COLS
    }

    /// bit position in a [`crate::util::BoardMajorBitset`]
    pub const fn board_major_idx(&self) -> Index {
        self.board() * consts::N_CELLS + self.cell()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.row, self.col)
    }
}
