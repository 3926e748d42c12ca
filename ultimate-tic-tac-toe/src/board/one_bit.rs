use crate::{
    consts,
    types::{BoardState, Index},
};

/// contains one bit per cell = 'is occupied by this/a player'
/// on a simple tic-tac-toe board (row-major)
///
/// used both for a single player's cells inside a local board
/// and for the local boards a player has won on the meta board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct OneBitBoard(BoardState);

impl OneBitBoard {
    pub const fn new(state: BoardState) -> Self {
        debug_assert!(state & !consts::BOARD_FULL_MASK == 0);
        OneBitBoard(state)
    }
    pub const fn get(&self) -> BoardState {
        self.0
    }
    pub fn has_won(&self) -> bool {
        consts::WINNER_MASKS
            .iter()
            .any(|mask| *mask & self.0 == *mask)
    }
    pub const fn is_full(&self) -> bool {
        self.0 == consts::BOARD_FULL_MASK
    }
    pub const fn is_set(&self, cell: Index) -> bool {
        debug_assert!(cell < consts::N_CELLS);
        self.0 & (1 << cell) != 0
    }
    pub const fn set_cell(&mut self, cell: Index) {
        debug_assert!(cell < consts::N_CELLS);
        self.0 |= 1 << cell;
    }
    pub const fn count(&self) -> u32 {
        self.0.count_ones()
    }
}

impl std::ops::BitOr for OneBitBoard {
    type Output = OneBitBoard;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

#[cfg(test)]
#[allow(clippy::unusual_byte_groupings)]
mod test {
    use super::*;

    #[test]
    fn test_winner_no_winner() {
        assert!(!OneBitBoard::new(0).has_won());
        assert!(!OneBitBoard::new(0b000_010_011).has_won());
        assert!(!OneBitBoard::new(0b110_001_011).has_won());
    }

    #[test]
    fn test_winner_row() {
        assert!(OneBitBoard::new(0b000_000_111).has_won());
        assert!(OneBitBoard::new(0b001_111_000).has_won());
        assert!(OneBitBoard::new(0b111_000_010).has_won());
    }

    #[test]
    fn test_winner_col() {
        assert!(OneBitBoard::new(0b001_001_001).has_won());
        assert!(OneBitBoard::new(0b010_010_011).has_won());
        assert!(OneBitBoard::new(0b100_100_100).has_won());
    }

    #[test]
    fn test_winner_diag() {
        assert!(OneBitBoard::new(0b100_010_001).has_won());
        assert!(OneBitBoard::new(0b001_010_100).has_won());
    }

    #[test]
    fn test_set_and_count() {
        let mut board = OneBitBoard::default();
        board.set_cell(0);
        board.set_cell(8);
        assert!(board.is_set(0));
        assert!(!board.is_set(4));
        assert_eq!(board.count(), 2);
        assert!(!board.is_full());
        assert!(OneBitBoard::new(consts::BOARD_FULL_MASK).is_full());
    }
}
