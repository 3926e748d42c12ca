use std::fmt;

use rand::Rng;

use crate::{
    board::{GameState, one_bit::OneBitBoard, render},
    consts,
    types::{BoardStatus, CellState, Index, Move, Outcome, Player},
    util::BoardMajorBitset,
};

/// Bit encoded position, two 9-bit masks per local board (one per player).
///
/// `occupied[player]` holds the cells of each player board-major, see [`BoardMajorBitset`].
/// `won_boards[player]` and `drawn_boards` form the meta board.
/// `closed` has every cell of every decided local board set so available moves are
/// a single `!(occupied | closed)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PackedState {
    occupied: [BoardMajorBitset; 2],
    won_boards: [OneBitBoard; 2],
    drawn_boards: OneBitBoard,
    closed: BoardMajorBitset,
    active_player: Player,
    /// [`consts::NO_BOARD_FORCED`] = any undecided board
    forced_board: Index,
    outcome: Outcome,
    moves_played: u8,
}

impl Default for PackedState {
    fn default() -> Self {
        Self::empty()
    }
}

impl PackedState {
    pub const fn empty() -> Self {
        Self {
            occupied: [BoardMajorBitset::empty(), BoardMajorBitset::empty()],
            won_boards: [OneBitBoard::new(0), OneBitBoard::new(0)],
            drawn_boards: OneBitBoard::new(0),
            closed: BoardMajorBitset::empty(),
            active_player: Player::Player1,
            forced_board: consts::NO_BOARD_FORCED,
            outcome: Outcome::Ongoing,
            moves_played: 0,
        }
    }

    pub const fn player_occupied(&self, player: Player) -> BoardMajorBitset {
        self.occupied[player as usize]
    }

    /// the two 9-bit masks of one local board
    pub const fn local_board(&self, board_idx: Index) -> [OneBitBoard; 2] {
        [
            self.occupied[Player::Player1 as usize].sub_board(board_idx),
            self.occupied[Player::Player2 as usize].sub_board(board_idx),
        ]
    }

    pub const fn won_boards(&self, player: Player) -> OneBitBoard {
        self.won_boards[player as usize]
    }

    fn decided_boards(&self) -> OneBitBoard {
        self.won_boards[0] | self.won_boards[1] | self.drawn_boards
    }

    pub fn available(&self) -> BoardMajorBitset {
        if self.outcome.is_terminal() {
            return BoardMajorBitset::empty();
        }
        let is_occupied = self.occupied[0] | self.occupied[1] | self.closed;
        let is_available = !is_occupied;

        if self.forced_board == consts::NO_BOARD_FORCED {
            is_available
        } else {
            BoardMajorBitset::new_full_board(self.forced_board) & is_available
        }
    }

    /// Decides the game from the meta board.
    ///
    /// A complete line of won boards wins. Once every local board is decided without
    /// such a line the player who won more local boards wins, equal counts are a draw.
    fn decide_outcome(&self) -> Outcome {
        let [won_player1, won_player2] = self.won_boards;
        if won_player1.has_won() {
            return Outcome::Won(Player::Player1);
        }
        if won_player2.has_won() {
            return Outcome::Won(Player::Player2);
        }
        if !self.decided_boards().is_full() {
            return Outcome::Ongoing;
        }
        match won_player1.count().cmp(&won_player2.count()) {
            std::cmp::Ordering::Greater => Outcome::Won(Player::Player1),
            std::cmp::Ordering::Less => Outcome::Won(Player::Player2),
            std::cmp::Ordering::Equal => Outcome::Draw,
        }
    }

    fn close_board(&mut self, board_idx: Index) {
        self.closed = self.closed | BoardMajorBitset::new_full_board(board_idx);
    }
}

impl GameState for PackedState {
    fn active_player(&self) -> Player {
        self.active_player
    }

    fn forced_board(&self) -> Option<Index> {
        (self.forced_board != consts::NO_BOARD_FORCED).then_some(self.forced_board)
    }

    fn cell(&self, move_: Move) -> CellState {
        let idx = move_.board_major_idx();
        if self.occupied[Player::Player1 as usize].contains(idx) {
            CellState::Player1
        } else if self.occupied[Player::Player2 as usize].contains(idx) {
            CellState::Player2
        } else {
            CellState::Free
        }
    }

    fn board_status(&self, board: Index) -> BoardStatus {
        if self.won_boards[Player::Player1 as usize].is_set(board) {
            BoardStatus::Won(Player::Player1)
        } else if self.won_boards[Player::Player2 as usize].is_set(board) {
            BoardStatus::Won(Player::Player2)
        } else if self.drawn_boards.is_set(board) {
            BoardStatus::Drawn
        } else {
            BoardStatus::Undecided
        }
    }

    fn outcome(&self) -> Outcome {
        self.outcome
    }

    fn moves_played(&self) -> u8 {
        self.moves_played
    }

    fn legal_moves(&self) -> Vec<Move> {
        self.available().iter_moves().collect()
    }

    fn is_legal(&self, move_: Move) -> bool {
        move_.is_in_range() && self.available().contains(move_.board_major_idx())
    }

    fn apply(&self, move_: Move) -> Self {
        debug_assert!(
            self.is_legal(move_),
            "illegal move {move_} for position {self:?}"
        );
        let mut child_state = *self;
        let player = self.active_player;
        let board_idx = move_.board();
        let cell_idx = move_.cell();

        child_state.occupied[player as usize].set(move_.board_major_idx());
        child_state.moves_played += 1;

        // decided boards never change their status again
        if !self.decided_boards().is_set(board_idx) {
            let [own, other] = {
                let [player1, player2] = child_state.local_board(board_idx);
                match player {
                    Player::Player1 => [player1, player2],
                    Player::Player2 => [player2, player1],
                }
            };
            if own.has_won() {
                child_state.won_boards[player as usize].set_cell(board_idx);
                child_state.close_board(board_idx);
            } else if (own | other).is_full() {
                child_state.drawn_boards.set_cell(board_idx);
                child_state.close_board(board_idx);
            }
        }

        child_state.outcome = child_state.decide_outcome();
        // a full local board is always decided, so this also covers "target is full"
        child_state.forced_board = if child_state.decided_boards().is_set(cell_idx) {
            consts::NO_BOARD_FORCED
        } else {
            cell_idx
        };
        child_state.active_player = player.other();

        child_state
    }

    fn random_move<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Move> {
        let available = self.available();
        let n_moves = available.len();
        if n_moves == 0 {
            return None;
        }
        let rand_nth_setbit = rng.random_range(0..n_moves) as u8;
        Some(Move::from_board_major_idx(available.nth(rand_nth_setbit)))
    }
}

impl fmt::Display for PackedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn play(moves: &[(Index, Index)]) -> PackedState {
        moves
            .iter()
            .fold(PackedState::default(), |state, (row, col)| {
                state.apply(Move::new(*row, *col))
            })
    }

    #[test]
    fn empty_board_allows_every_cell() {
        let state = PackedState::default();
        assert_eq!(state.legal_moves().len(), 81);
        assert_eq!(state.forced_board(), None);
        assert_eq!(state.active_player(), Player::Player1);
        assert_eq!(state.outcome(), Outcome::Ongoing);
    }

    #[test]
    fn test_apply_move() {
        let state = play(&[(0, 0)]);
        assert_eq!(state.player_occupied(Player::Player1).get(), 0b1);
        assert_eq!(state.player_occupied(Player::Player2).get(), 0b0);
        assert_eq!(state.forced_board(), Some(0));
        assert_eq!(state.available().get(), 0b1_1111_1110);
        assert_eq!(state.active_player(), Player::Player2);

        let state = state.apply(Move::new(1, 1));
        assert_eq!(state.player_occupied(Player::Player2).get(), 0b1_0000);
        assert_eq!(state.forced_board(), Some(4));
        assert_eq!(
            state.available().get(),
            0b1_1111_1111 << (4 * consts::N_CELLS)
        );
        assert_eq!(state.moves_played(), 2);
    }

    #[test]
    fn winning_a_local_board_closes_it() {
        // X takes the top row of board 0, O answers in cell 0 of the boards X sends it to
        let state = play(&[(0, 1), (0, 3), (0, 2), (0, 6), (0, 0)]);
        assert_eq!(state.board_status(0), BoardStatus::Won(Player::Player1));
        assert_eq!(state.won_boards(Player::Player1).get(), 0b1);
        assert_eq!(state.outcome(), Outcome::Ongoing);
        // the winning cell sends O into the decided board 0
        assert_eq!(state.forced_board(), None);
        let legal = state.legal_moves();
        assert!(legal.iter().all(|move_| move_.board() != 0));
        assert_eq!(legal.len(), 81 - 9 - 2);
    }

    #[test]
    fn sent_to_open_board_is_forced() {
        let state = play(&[(0, 1), (0, 3), (0, 2), (0, 6), (0, 0)]);
        let state = state.apply(Move::new(1, 4));
        assert_eq!(state.forced_board(), Some(4));
        assert!(state.legal_moves().iter().all(|move_| move_.board() == 4));
        assert_eq!(state.legal_moves().len(), 9);
    }

    #[test]
    fn meta_line_wins_the_game() {
        let mut state = PackedState::default();
        state.won_boards[0] = OneBitBoard::new(0b000_000_011);
        state.won_boards[1] = OneBitBoard::new(0b000_110_000);
        state.won_boards[0].set_cell(2);
        assert_eq!(state.decide_outcome(), Outcome::Won(Player::Player1));
    }

    #[test]
    fn all_boards_decided_majority_wins() {
        let mut state = PackedState::default();
        // no line for either player: X 0,1,5,6 / O 2,3,4,7 / drawn 8
        state.won_boards[0] = OneBitBoard::new(0b001_100_011);
        state.won_boards[1] = OneBitBoard::new(0b010_011_100);
        state.drawn_boards = OneBitBoard::new(0b100_000_000);
        assert!(!state.won_boards[0].has_won());
        assert!(!state.won_boards[1].has_won());
        assert_eq!(state.decide_outcome(), Outcome::Draw);

        // board 8 goes to X instead of being drawn
        state.drawn_boards = OneBitBoard::new(0);
        state.won_boards[0].set_cell(8);
        assert!(!state.won_boards[0].has_won());
        assert_eq!(state.decide_outcome(), Outcome::Won(Player::Player1));

        state.won_boards[0] = OneBitBoard::new(0b001_100_011);
        state.won_boards[1].set_cell(8);
        assert!(!state.won_boards[1].has_won());
        assert_eq!(state.decide_outcome(), Outcome::Won(Player::Player2));
    }

    #[test]
    fn undecided_boards_keep_the_game_going() {
        let mut state = PackedState::default();
        state.won_boards[0] = OneBitBoard::new(0b001_100_011);
        state.won_boards[1] = OneBitBoard::new(0b010_011_100);
        assert_eq!(state.decide_outcome(), Outcome::Ongoing);
    }

    #[test]
    fn random_move_is_legal() {
        use rand::SeedableRng;
        let mut rng = rand::rngs::SmallRng::seed_from_u64(7);
        let mut state = PackedState::default();
        while let Some(move_) = state.random_move(&mut rng) {
            assert!(state.is_legal(move_));
            state = state.apply(move_);
        }
        assert!(state.is_terminal());
        assert!(state.legal_moves().is_empty());
    }
}
