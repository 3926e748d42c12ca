use anyhow::Context;
use rand::Rng;
use tracing::{debug, warn};

use crate::{
    board::GameState,
    search::{self, Budget, SearchConfig, SearchReport},
    types::Move,
};

/// Tracks the game across turns and answers every turn with one move.
///
/// Holds the only rng of the process. A fresh search tree is built every turn.
#[derive(Debug)]
pub struct TurnController<S, R> {
    state: S,
    rng: R,
    config: SearchConfig,
    turn: u32,
    last_report: Option<SearchReport>,
}

impl<S: GameState, R: Rng> TurnController<S, R> {
    pub fn new(config: SearchConfig, rng: R) -> Self {
        Self {
            state: S::default(),
            rng,
            config,
            turn: 0,
            last_report: None,
        }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    /// number of turns answered so far
    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn last_report(&self) -> Option<&SearchReport> {
        self.last_report.as_ref()
    }

    fn budget(&self) -> Budget {
        if self.turn == 0 {
            self.config.first_turn_budget
        } else {
            self.config.turn_budget
        }
    }

    /// Folds in the opponent's move, searches and plays the chosen move.
    ///
    /// `legal` is the list supplied from outside, the returned move is always one of its entries.
    /// A move the tracked position rejects is logged and skipped, the position stays at the
    /// last state both sides agreed on.
    ///
    /// # Errors
    /// `legal` is empty
    pub fn play_turn(&mut self, opponent: Option<Move>, legal: &[Move]) -> anyhow::Result<Move> {
        match opponent {
            Some(opponent) => self.resync("opponent", opponent),
            None if self.state.moves_played() != 0 => {
                warn!(turn = self.turn, "no opponent move reported in a running game");
            }
            None => {}
        }

        let budget = self.budget();
        let report = search::search(self.state, budget, self.config.exploration, &mut self.rng);
        let chosen = search::choose_move(&report, legal, &mut self.rng)
            .context("no legal moves were supplied for this turn")?;

        self.resync("own", chosen);
        debug!(turn = self.turn, %chosen, ?budget, "turn played");

        self.turn += 1;
        self.last_report = Some(report);
        Ok(chosen)
    }

    fn resync(&mut self, who: &str, move_: Move) {
        match self.state.try_apply(move_) {
            Ok(state) => self.state = state,
            Err(err) => warn!(
                turn = self.turn,
                %move_,
                %err,
                "tracked position rejects {who} move, keeping it unchanged"
            ),
        }
    }
}
