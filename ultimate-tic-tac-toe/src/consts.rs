use std::time::Duration;

use crate::types::{BoardState, Index};

pub const COLS: Index = 3;
pub const ROWS: Index = COLS;
pub const N_CELLS: Index = COLS * ROWS;
pub const N_BOARDS: Index = N_CELLS;
pub const N_CELLS_NESTED: Index = N_CELLS * N_BOARDS;
/// side length of the full 9x9 grid
pub const GRID_SIDE: Index = COLS * COLS;

/// sentinel for "any undecided local board may be played"
pub const NO_BOARD_FORCED: Index = N_BOARDS;

/// every cell of a 3x3 board (or every board of the meta board) set
pub const BOARD_FULL_MASK: BoardState = 0b1_1111_1111;

/// # Cell Layout (row major)
/// 0 | 1 | 2
/// - - - - -
/// 3 | 4 | 5
/// - - - - -
/// 6 | 7 | 8
pub const MASKS_ROW: [BoardState; ROWS as usize] = {
    let mut masks = [0; ROWS as usize];
    let mut i = 0;
    while i != ROWS as usize {
        masks[i] = 0b111 << (i * COLS as usize);
        i += 1;
    }
    masks
};
pub const MASKS_COL: [BoardState; COLS as usize] = {
    let mut masks = [0; COLS as usize];
    let mut i = 0;
    while i != COLS as usize {
        masks[i] = 0b001_001_001 << i;
        i += 1;
    }
    masks
};
#[allow(clippy::unusual_byte_groupings)]
//                                           876 543 210
pub const MASK_DIAG_NEGATIVE: BoardState = 0b100_010_001;
#[allow(clippy::unusual_byte_groupings)]
//                                           876 543 210
pub const MASK_DIAG_POSITIVE: BoardState = 0b001_010_100;

/// the eight three-in-a-row lines, shared by local boards and the meta board
pub const WINNER_MASKS: [BoardState; (COLS + ROWS + 1 + 1) as usize] = const_concat(
    const_concat::<{ ROWS as usize }, { COLS as usize }, { (COLS + ROWS) as usize }>(
        MASKS_ROW, MASKS_COL,
    ),
    [MASK_DIAG_NEGATIVE, MASK_DIAG_POSITIVE],
);

pub const CENTER_IDX: Index = N_CELLS / 2;

pub type UCBScore = f64;
/// exploration constant of the UCT formula
pub const EXPLORATION_C: UCBScore = core::f64::consts::SQRT_2;

/// the very first move may also pay for any one time setup
pub const FIRST_TURN_BUDGET: Duration = Duration::from_millis(1_000);
pub const TURN_BUDGET: Duration = Duration::from_millis(100);

pub(crate) const fn const_concat<const A: usize, const B: usize, const C: usize>(
    a: [BoardState; A],
    b: [BoardState; B],
) -> [BoardState; C] {
    let mut both = [0; C];
    let mut i = 0;
    while i != A {
        both[i] = a[i];
        i += 1;
    }
    i = 0;
    while i != B {
        both[A + i] = b[i];
        i += 1;
    }
    both
}

#[cfg(test)]
#[allow(clippy::unusual_byte_groupings)]
mod test {
    use super::*;

    #[test]
    fn winner_masks_are_three_cells_each() {
        for mask in WINNER_MASKS {
            assert_eq!(mask.count_ones(), 3, "mask {mask:#011b}");
            assert_eq!(mask & !BOARD_FULL_MASK, 0);
        }
    }

    #[test]
    fn winner_masks_cover_expected_lines() {
        assert_eq!(
            WINNER_MASKS,
            [
                0b000_000_111,
                0b000_111_000,
                0b111_000_000,
                0b001_001_001,
                0b010_010_010,
                0b100_100_100,
                0b100_010_001,
                0b001_010_100,
            ]
        );
    }
}
