use crate::{
    board::GameState,
    consts::UCBScore,
    types::{Move, Player},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIdx(pub(crate) u32);

impl NodeIdx {
    pub const ROOT: NodeIdx = NodeIdx(0);

    pub(crate) const fn get(self) -> usize {
        self.0 as usize
    }
}

/// One position of the search tree.
///
/// Children are owned through the arena, `parent` is only a back-reference.
#[derive(Debug, Clone)]
pub struct Node<S> {
    pub(crate) state: S,
    pub(crate) parent: Option<NodeIdx>,
    /// move that led from the parent to this node, `None` for the root
    pub(crate) move_: Option<Move>,
    pub(crate) visits: u32,
    /// rollouts won by the player who made `move_`
    pub(crate) wins: f64,
    pub(crate) children: Vec<NodeIdx>,
    pub(crate) untried_moves: Vec<Move>,
}

impl<S: GameState> Node<S> {
    pub(crate) fn new(state: S, parent: Option<NodeIdx>, move_: Option<Move>) -> Self {
        Self {
            untried_moves: state.legal_moves(),
            state,
            parent,
            move_,
            visits: 0,
            wins: 0.,
            children: Vec::new(),
        }
    }

    pub fn state(&self) -> &S {
        &self.state
    }
    pub fn move_(&self) -> Option<Move> {
        self.move_
    }
    pub fn visits(&self) -> u32 {
        self.visits
    }
    pub fn wins(&self) -> f64 {
        self.wins
    }
    pub fn children(&self) -> &[NodeIdx] {
        &self.children
    }
    pub fn untried_moves(&self) -> &[Move] {
        &self.untried_moves
    }

    pub fn is_fully_expanded(&self) -> bool {
        self.untried_moves.is_empty()
    }

    /// the player that gets credited for wins of this node (the one who played `move_`)
    pub fn mover(&self) -> Player {
        self.state.active_player().other()
    }

    /// wins / visits, 0 for unvisited nodes
    pub fn win_rate(&self) -> f64 {
        if self.visits == 0 {
            0.
        } else {
            self.wins / self.visits as f64
        }
    }
}

/// https://en.wikipedia.org/wiki/Monte_Carlo_tree_search#Exploration_and_exploitation
pub fn upper_confidence_bound<S: GameState>(
    parent_visits_ln: UCBScore,
    exploration: UCBScore,
    child: &Node<S>,
) -> UCBScore {
    if child.visits == 0 {
        return UCBScore::INFINITY;
    }
    let exploitation = child.win_rate();
    let exploration = exploration * UCBScore::sqrt(parent_visits_ln / child.visits as UCBScore);

    exploitation + exploration
}
