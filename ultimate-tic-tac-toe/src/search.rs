use std::time::{Duration, Instant};

use rand::Rng;
use tracing::{debug, warn};

use crate::{
    board::GameState,
    consts::{self, UCBScore},
    tree::Tree,
    types::Move,
};

/// how long one search may run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Budget {
    /// wall clock, checked once per completed iteration
    Time(Duration),
    /// fixed number of iterations, reproducible with a seeded rng
    Iterations(u32),
}

impl Budget {
    fn is_exhausted(&self, started: Instant, iterations: u32) -> bool {
        match self {
            Budget::Time(duration) => started.elapsed() >= *duration,
            Budget::Iterations(max) => iterations >= *max,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchConfig {
    pub exploration: UCBScore,
    /// used for the very first move of a game
    pub first_turn_budget: Budget,
    pub turn_budget: Budget,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            exploration: consts::EXPLORATION_C,
            first_turn_budget: Budget::Time(consts::FIRST_TURN_BUDGET),
            turn_budget: Budget::Time(consts::TURN_BUDGET),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchReport {
    /// most visited root child, `None` if nothing was expanded
    pub best_move: Option<Move>,
    pub iterations: u32,
    pub elapsed: Duration,
    /// size of the tree when the search stopped
    pub nodes: usize,
    pub root_visits: u32,
    /// (move, visits) of every root child
    pub children_visits: Vec<(Move, u32)>,
}

/// Runs MCTS iterations from `state` until `budget` is used up.
///
/// The tree only lives for this call. A terminal `state` is not searched at all.
pub fn search<S: GameState, R: Rng + ?Sized>(
    state: S,
    budget: Budget,
    exploration: UCBScore,
    rng: &mut R,
) -> SearchReport {
    let started = Instant::now();
    let mut tree = Tree::new(state, exploration);
    let mut iterations = 0;

    if !state.is_terminal() {
        while !budget.is_exhausted(started, iterations) {
            tree.iterate(rng);
            iterations += 1;
        }
    }

    let report = SearchReport {
        best_move: tree.best_move(),
        iterations,
        elapsed: started.elapsed(),
        nodes: tree.len(),
        root_visits: tree.root_visits(),
        children_visits: tree.children_visits(),
    };
    debug!(
        iterations = report.iterations,
        nodes = report.nodes,
        elapsed_ms = report.elapsed.as_millis() as u64,
        best_move = ?report.best_move,
        "search finished"
    );
    report
}

/// Picks the move to play from a finished search.
///
/// The searched move is only used if the externally supplied `legal` list contains it,
/// otherwise a uniformly random entry of `legal` is played.
/// `None` only if `legal` is empty.
pub fn choose_move<R: Rng + ?Sized>(
    report: &SearchReport,
    legal: &[Move],
    rng: &mut R,
) -> Option<Move> {
    match report.best_move {
        Some(best) if legal.contains(&best) => return Some(best),
        Some(best) => warn!(%best, "searched move is not in the supplied legal moves"),
        None => warn!(
            iterations = report.iterations,
            "search expanded nothing, playing a random move"
        ),
    }
    if legal.is_empty() {
        None
    } else {
        Some(legal[rng.random_range(0..legal.len())])
    }
}
