use crate::{
    bitmagic::{self, SetBitIter},
    board::one_bit::OneBitBoard,
    consts,
    types::{BoardState, Index, Move},
};

/// one bit per cell of the 9x9 grid, grouped by local board (`board * 9 + cell`)
///
/// +----+----+----+----+----+----+----+----+----+
/// |  0 |  1 |  2 |  9 | 10 | 11 | 18 | 19 | 20 |
/// +----+----+----+----+----+----+----+----+----+
/// |  3 |  4 |  5 | 12 | 13 | 14 | 21 | 22 | 23 |
/// +----+----+----+----+----+----+----+----+----+
/// |  6 |  7 |  8 | 15 | 16 | 17 | 24 | 25 | 26 |
/// +----+----+----+----+----+----+----+----+----+
/// | 27 | 28 | 29 | 36 | 37 | 38 | 45 | 46 | 47 |
/// +----+----+----+----+----+----+----+----+----+
/// | 30 | 31 | 32 | 39 | 40 | 41 | 48 | 49 | 50 |
/// +----+----+----+----+----+----+----+----+----+
/// | 33 | 34 | 35 | 42 | 43 | 44 | 51 | 52 | 53 |
/// +----+----+----+----+----+----+----+----+----+
/// | 54 | 55 | 56 | 63 | 64 | 65 | 72 | 73 | 74 |
/// +----+----+----+----+----+----+----+----+----+
/// | 57 | 58 | 59 | 66 | 67 | 68 | 75 | 76 | 77 |
/// +----+----+----+----+----+----+----+----+----+
/// | 60 | 61 | 62 | 69 | 70 | 71 | 78 | 79 | 80 |
/// +----+----+----+----+----+----+----+----+----+
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BoardMajorBitset(u128);

impl BoardMajorBitset {
    const BITS: u32 = consts::N_CELLS_NESTED as u32;
    const GRID_MASK: u128 = (1u128 << Self::BITS) - 1;

    pub const fn empty() -> Self {
        Self(0)
    }
    /// discards any bits not expected
    pub const fn new_truncated(board_major_indices: u128) -> Self {
        Self(board_major_indices & Self::GRID_MASK)
    }
    pub const fn new_full_board(board_idx: Index) -> Self {
        debug_assert!(board_idx < consts::N_BOARDS);
        Self((consts::BOARD_FULL_MASK as u128) << (board_idx * consts::N_CELLS))
    }

    pub const fn get(&self) -> u128 {
        self.0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub const fn len(&self) -> u32 {
        bitmagic::count_ones(self.0)
    }

    pub const fn contains(&self, idx: Index) -> bool {
        self.0 & (1 << idx) != 0
    }

    pub const fn set(&mut self, idx: Index) {
        debug_assert!(idx < consts::N_CELLS_NESTED);
        self.0 |= 1 << idx;
    }

    pub const fn sub_board(&self, board_idx: Index) -> OneBitBoard {
        debug_assert!(board_idx < consts::N_BOARDS);
        OneBitBoard::new(
            ((self.0 >> (board_idx * consts::N_CELLS)) as BoardState) & consts::BOARD_FULL_MASK,
        )
    }

    pub fn nth(&self, n: u8) -> Index {
        bitmagic::index_of_nth_setbit(self.0, n) as Index
    }

    pub fn iter(&self) -> SetBitIter {
        SetBitIter::new(self.0)
    }

    pub fn iter_moves(&self) -> impl ExactSizeIterator<Item = Move> + use<> {
        self.iter().map(Move::from_board_major_idx)
    }
}

impl std::ops::Not for BoardMajorBitset {
    type Output = BoardMajorBitset;

    fn not(self) -> Self::Output {
        Self::new_truncated(!self.0)
    }
}
impl std::ops::BitAnd for BoardMajorBitset {
    type Output = BoardMajorBitset;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self(self.0 & rhs.0)
    }
}
impl std::ops::BitOr for BoardMajorBitset {
    type Output = BoardMajorBitset;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn full_board_masks() {
        assert_eq!(BoardMajorBitset::new_full_board(0).get(), 0b1_1111_1111);
        assert_eq!(
            BoardMajorBitset::new_full_board(8).get(),
            0b1_1111_1111 << 72
        );
        let all = (0..consts::N_BOARDS)
            .map(BoardMajorBitset::new_full_board)
            .fold(BoardMajorBitset::empty(), |acc, board| acc | board);
        assert_eq!(all.len(), 81);
        assert!((!all).is_empty());
    }

    #[test]
    fn sub_board_projection() {
        let mut bits = BoardMajorBitset::empty();
        bits.set(Move::new(4, 4).board_major_idx());
        bits.set(Move::new(3, 5).board_major_idx());
        assert_eq!(bits.sub_board(4).get(), 0b000_010_100);
        assert_eq!(bits.sub_board(3).get(), 0);
        assert_eq!(
            bits.iter_moves().collect::<Vec<_>>(),
            vec![Move::new(3, 5), Move::new(4, 4)]
        );
    }
}
