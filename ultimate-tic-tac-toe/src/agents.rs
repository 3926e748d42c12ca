//! Opponents for self-play and the match runner that pits them against each other.

use std::fmt;

use anyhow::{Context, bail};
use rand::{Rng, RngCore, seq::IndexedRandom};
use tracing::{debug, info, trace};

use crate::{
    board::{self, GameState},
    consts::{self, UCBScore},
    search::{self, Budget},
    types::{Move, Outcome, Player},
};

pub trait Agent<S: GameState> {
    fn name(&self) -> &str;

    /// `None` only if `state` is terminal
    fn select_move(&mut self, state: &S, rng: &mut dyn RngCore) -> Option<Move>;
}

/// uniformly random legal moves
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomAgent;

impl<S: GameState> Agent<S> for RandomAgent {
    fn name(&self) -> &str {
        "random"
    }

    fn select_move(&mut self, state: &S, rng: &mut dyn RngCore) -> Option<Move> {
        state.random_move(rng)
    }
}

/// Greedy one-ply rules of thumb, in order:
/// 1. win a local board
/// 2. stop the opponent from winning the local board we play in
/// 3. a centre cell of any local board
/// 4. any cell of the centre board
/// 5. random
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicAgent;

impl HeuristicAgent {
    fn pick<R: Rng + ?Sized>(moves: &[Move], rng: &mut R) -> Option<Move> {
        moves.choose(rng).copied()
    }
}

impl<S: GameState> Agent<S> for HeuristicAgent {
    fn name(&self) -> &str {
        "heuristic"
    }

    fn select_move(&mut self, state: &S, rng: &mut dyn RngCore) -> Option<Move> {
        let legal = state.legal_moves();
        let me = state.active_player();

        let winning = legal
            .iter()
            .find(|move_| board::would_win_board(state, **move_, me));
        let blocking = || {
            legal
                .iter()
                .find(|move_| board::would_win_board(state, **move_, me.other()))
        };
        if let Some(move_) = winning.or_else(blocking) {
            return Some(*move_);
        }

        let centre_cells = legal
            .iter()
            .filter(|move_| move_.cell() == consts::CENTER_IDX)
            .copied()
            .collect::<Vec<_>>();
        if !centre_cells.is_empty() {
            return Self::pick(&centre_cells, rng);
        }
        let centre_board = legal
            .iter()
            .filter(|move_| move_.board() == consts::CENTER_IDX)
            .copied()
            .collect::<Vec<_>>();
        if !centre_board.is_empty() {
            return Self::pick(&centre_board, rng);
        }
        Self::pick(&legal, rng)
    }
}

/// plays the most visited move of a fresh search every turn
#[derive(Debug, Clone, Copy)]
pub struct MctsAgent {
    pub budget: Budget,
    pub exploration: UCBScore,
}

impl MctsAgent {
    pub fn new(budget: Budget) -> Self {
        Self {
            budget,
            exploration: consts::EXPLORATION_C,
        }
    }
}

impl<S: GameState> Agent<S> for MctsAgent {
    fn name(&self) -> &str {
        "mcts"
    }

    fn select_move(&mut self, state: &S, rng: &mut dyn RngCore) -> Option<Move> {
        let report = search::search(*state, self.budget, self.exploration, rng);
        search::choose_move(&report, &state.legal_moves(), rng)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord<S> {
    pub moves: Vec<Move>,
    pub outcome: Outcome,
    pub final_state: S,
}

/// Plays one game to the end, `first` moves as [`Player::Player1`].
///
/// # Errors
/// an agent returned no move or an illegal one
pub fn play_game<S: GameState>(
    first: &mut dyn Agent<S>,
    second: &mut dyn Agent<S>,
    rng: &mut dyn RngCore,
) -> anyhow::Result<GameRecord<S>> {
    let mut state = S::default();
    let mut moves = Vec::with_capacity(consts::N_CELLS_NESTED as usize);

    while !state.is_terminal() {
        let agent: &mut dyn Agent<S> = match state.active_player() {
            Player::Player1 => &mut *first,
            Player::Player2 => &mut *second,
        };
        let Some(move_) = agent.select_move(&state, rng) else {
            bail!(
                "agent {} returned no move in a running game after {} moves",
                agent.name(),
                moves.len()
            );
        };
        state = state
            .try_apply(move_)
            .with_context(|| format!("agent {} played an illegal move", agent.name()))?;
        moves.push(move_);
        trace!(%move_, "\n{}", board::render(&state));
    }

    Ok(GameRecord {
        moves,
        outcome: state.outcome(),
        final_state: state,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchStats {
    pub games: u32,
    pub wins_a: u32,
    pub wins_b: u32,
    pub draws: u32,
}

impl fmt::Display for MatchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} games: a won {}, b won {}, {} draws",
            self.games, self.wins_a, self.wins_b, self.draws
        )
    }
}

/// Plays `games` games between `a` and `b`, alternating who moves first.
pub fn run_matches<S: GameState>(
    a: &mut dyn Agent<S>,
    b: &mut dyn Agent<S>,
    games: u32,
    rng: &mut dyn RngCore,
) -> anyhow::Result<MatchStats> {
    let mut stats = MatchStats::default();
    for game in 0..games {
        let a_first = game % 2 == 0;
        let record = if a_first {
            play_game(a, b, rng)?
        } else {
            play_game(b, a, rng)?
        };
        let a_player = if a_first {
            Player::Player1
        } else {
            Player::Player2
        };

        stats.games += 1;
        match record.outcome.winner() {
            Some(winner) if winner == a_player => stats.wins_a += 1,
            Some(_) => stats.wins_b += 1,
            None => stats.draws += 1,
        }
        debug!(
            game,
            a_first,
            moves = record.moves.len(),
            outcome = ?record.outcome,
            "game finished"
        );
    }
    info!(a = a.name(), b = b.name(), %stats, "matches finished");
    Ok(stats)
}

#[cfg(test)]
mod test {
    use rand::{SeedableRng, rngs::SmallRng};

    use super::*;
    use crate::board::{grid::GridState, packed::PackedState};

    fn play(moves: &[(u8, u8)]) -> PackedState {
        moves
            .iter()
            .fold(PackedState::default(), |state, (row, col)| {
                state.apply(Move::new(*row, *col))
            })
    }

    #[test]
    fn heuristic_wins_a_local_board() {
        let mut rng = SmallRng::seed_from_u64(0);
        // O holds cells 0, 1, 6 and 8 of the centre board and is sent back into it
        let state = play(&[
            (4, 4),
            (3, 3),
            (1, 1),
            (3, 4),
            (1, 4),
            (5, 5),
            (7, 7),
            (5, 3),
            (7, 1),
        ]);
        assert_eq!(state.active_player(), Player::Player2);
        assert_eq!(state.forced_board(), Some(4));

        let chosen = HeuristicAgent.select_move(&state, &mut rng).unwrap();
        assert_eq!(chosen.board(), 4);
        assert!(board::would_win_board(&state, chosen, Player::Player2));
    }

    #[test]
    fn heuristic_blocks_the_opponent() {
        let mut rng = SmallRng::seed_from_u64(1);
        // O threatens the top row of board 1, X is sent there
        let state = play(&[(0, 1), (0, 3), (0, 0), (2, 2), (6, 7), (0, 4)]);
        assert_eq!(state.forced_board(), Some(1));
        let chosen = HeuristicAgent.select_move(&state, &mut rng).unwrap();
        assert_eq!(chosen, Move::new(0, 5));
    }

    #[test]
    fn heuristic_opens_in_a_centre_cell() {
        let mut rng = SmallRng::seed_from_u64(2);
        let chosen = HeuristicAgent
            .select_move(&PackedState::default(), &mut rng)
            .unwrap();
        assert_eq!(chosen.cell(), consts::CENTER_IDX);
    }

    #[test]
    fn game_record_replays_on_the_reference_encoding() {
        let mut rng = SmallRng::seed_from_u64(3);
        let record = play_game::<PackedState>(&mut RandomAgent, &mut HeuristicAgent, &mut rng)
            .unwrap();
        assert!(record.outcome.is_terminal());
        assert_eq!(record.final_state.moves_played() as usize, record.moves.len());

        let replayed = record
            .moves
            .iter()
            .try_fold(GridState::default(), |state, move_| state.try_apply(*move_))
            .unwrap();
        assert_eq!(replayed.outcome(), record.outcome);
    }

    #[test]
    fn match_stats_add_up() {
        let mut rng = SmallRng::seed_from_u64(4);
        let stats =
            run_matches::<PackedState>(&mut HeuristicAgent, &mut RandomAgent, 10, &mut rng)
                .unwrap();
        assert_eq!(stats.games, 10);
        assert_eq!(stats.wins_a + stats.wins_b + stats.draws, 10);
    }

    #[test]
    fn mcts_beats_random() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut mcts = MctsAgent::new(Budget::Iterations(300));
        let stats =
            run_matches::<PackedState>(&mut mcts, &mut RandomAgent, 6, &mut rng).unwrap();
        assert!(stats.wins_a > stats.wins_b, "{stats}");
    }
}
