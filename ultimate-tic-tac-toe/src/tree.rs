use rand::Rng;
use tracing::trace;

use crate::{
    board::GameState,
    consts::UCBScore,
    types::{Move, Outcome},
};

pub mod node;
pub mod simulation;

pub use node::{Node, NodeIdx};

/// MCTS tree over one root position.
///
/// All nodes live in one arena, children are referenced by index and every node knows its
/// parent index. The whole tree is dropped at once when the turn is over.
#[derive(Debug, Clone)]
pub struct Tree<S> {
    nodes: Vec<Node<S>>,
    exploration: UCBScore,
}

impl<S: GameState> Tree<S> {
    const INITIAL_N_NODES: usize = 16_384;

    pub fn new(root_state: S, exploration: UCBScore) -> Self {
        let mut nodes = Vec::with_capacity(Self::INITIAL_N_NODES);
        nodes.push(Node::new(root_state, None, None));
        Self { nodes, exploration }
    }

    pub fn root(&self) -> &Node<S> {
        &self.nodes[NodeIdx::ROOT.get()]
    }

    pub fn node(&self, idx: NodeIdx) -> &Node<S> {
        &self.nodes[idx.get()]
    }

    /// number of nodes in the arena, including the root
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn root_visits(&self) -> u32 {
        self.root().visits
    }

    pub fn root_children(&self) -> impl Iterator<Item = &Node<S>> + '_ {
        self.root()
            .children
            .iter()
            .map(|child_idx| self.node(*child_idx))
    }

    /// (move, visits) of every expanded root child in expansion order
    pub fn children_visits(&self) -> Vec<(Move, u32)> {
        self.root_children()
            .filter_map(|child| Some((child.move_?, child.visits)))
            .collect()
    }

    /// Root child with the most visits, the first one found on ties.
    ///
    /// `None` if nothing was expanded yet.
    pub fn best_move(&self) -> Option<Move> {
        let mut best: Option<&Node<S>> = None;
        for child in self.root_children() {
            if best.is_none_or(|best| child.visits > best.visits) {
                best = Some(child);
            }
        }
        best.and_then(|child| child.move_)
    }

    /// One select, expand, simulate, backpropagate cycle.
    ///
    /// # Returns
    /// the outcome of the rollout
    pub fn iterate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Outcome {
        let selected = self.select();
        let leaf = self.expand(selected, rng);
        let outcome = simulation::simulate_random(self.nodes[leaf.get()].state, rng);
        self.backpropagate(leaf, outcome);
        outcome
    }

    /// descends while the current node is fully expanded and has children
    fn select(&self) -> NodeIdx {
        let mut current = NodeIdx::ROOT;
        loop {
            let node = &self.nodes[current.get()];
            if !node.is_fully_expanded() || node.children.is_empty() {
                return current;
            }
            current = self.best_child_ucb(node);
        }
    }

    fn best_child_ucb(&self, parent: &Node<S>) -> NodeIdx {
        debug_assert!(!parent.children.is_empty());
        let parent_visits_ln = (parent.visits as UCBScore).ln();
        let (mut max_ucb, mut max_ucb_node) = (UCBScore::NEG_INFINITY, parent.children[0]);

        for &child_idx in &parent.children {
            let child_ucb =
                node::upper_confidence_bound(parent_visits_ln, self.exploration, self.node(child_idx));
            // strictly greater keeps the first maximal child
            if child_ucb > max_ucb {
                max_ucb = child_ucb;
                max_ucb_node = child_idx;
            }
        }
        max_ucb_node
    }

    /// Adds a child for a random untried move of `parent_idx`.
    ///
    /// # Returns
    /// the new child, or `parent_idx` itself if it has nothing left to try (terminal)
    fn expand<R: Rng + ?Sized>(&mut self, parent_idx: NodeIdx, rng: &mut R) -> NodeIdx {
        let parent = &mut self.nodes[parent_idx.get()];
        if parent.untried_moves.is_empty() {
            return parent_idx;
        }
        let untried_idx = rng.random_range(0..parent.untried_moves.len());
        let move_ = parent.untried_moves.swap_remove(untried_idx);
        let child_state = parent.state.apply(move_);

        let child_idx = NodeIdx(self.nodes.len() as u32);
        self.nodes[parent_idx.get()].children.push(child_idx);
        self.nodes
            .push(Node::new(child_state, Some(parent_idx), Some(move_)));
        trace!(%move_, child = child_idx.0, "expanded");

        child_idx
    }

    /// Walks from `leaf` up to the root, crediting each node if its mover won the rollout.
    fn backpropagate(&mut self, leaf: NodeIdx, outcome: Outcome) {
        debug_assert!(outcome.is_terminal(), "rollouts end in terminal positions");
        let winner = outcome.winner();
        let mut current = Some(leaf);
        while let Some(idx) = current {
            let node = &mut self.nodes[idx.get()];
            node.visits += 1;
            if winner == Some(node.mover()) {
                node.wins += 1.;
            }
            current = node.parent;
        }
    }
}
