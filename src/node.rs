//! Search tree node representation.
//!
//! Each node owns a snapshot of the game state reached by applying
//! `parent_action` to its parent's state, plus the win/loss/draw record of
//! every simulation that passed through it.

use crate::{GameState, PlayerId};

/// Index into the node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Categorical result of a simulation, relative to one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Win,
    Loss,
    Draw,
}

impl Outcome {
    /// Classifies `own` against `other`: strictly greater wins, strictly less loses.
    pub fn from_scores(own: i32, other: i32) -> Self {
        match own.cmp(&other) {
            std::cmp::Ordering::Greater => Outcome::Win,
            std::cmp::Ordering::Less => Outcome::Loss,
            std::cmp::Ordering::Equal => Outcome::Draw,
        }
    }

    /// The same result seen by the other player.
    #[inline]
    pub fn flip(self) -> Self {
        match self {
            Outcome::Win => Outcome::Loss,
            Outcome::Loss => Outcome::Win,
            Outcome::Draw => Outcome::Draw,
        }
    }
}

/// Visit and outcome counters owned by a node.
///
/// `visits == wins + losses + draws` always holds because `record` is the
/// only mutator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeStats {
    visits: u32,
    wins: u32,
    losses: u32,
    draws: u32,
}

impl NodeStats {
    /// Counts one simulation with the given outcome.
    #[inline]
    pub fn record(&mut self, outcome: Outcome) {
        self.visits += 1;
        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Loss => self.losses += 1,
            Outcome::Draw => self.draws += 1,
        }
    }

    /// Adds another record to this one (used to merge root-parallel trees).
    pub fn merge(&mut self, other: &NodeStats) {
        self.visits += other.visits;
        self.wins += other.wins;
        self.losses += other.losses;
        self.draws += other.draws;
    }

    #[inline]
    pub fn visits(&self) -> u32 {
        self.visits
    }

    pub fn count(&self, outcome: Outcome) -> u32 {
        match outcome {
            Outcome::Win => self.wins,
            Outcome::Loss => self.losses,
            Outcome::Draw => self.draws,
        }
    }

    /// Normalized advantage `(wins - losses) / visits`, in [-1, 1].
    /// Returns 0.0 if never visited.
    #[inline]
    pub fn advantage(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            (self.wins as f64 - self.losses as f64) / self.visits as f64
        }
    }

    /// UCB score of a child with these stats under a parent with
    /// `parent_visits` visits.
    ///
    /// Both visit counts must be at least 1; an unvisited child scores
    /// infinity so that it is never starved.
    #[inline]
    pub fn ucb(&self, parent_visits: u32, exploration: f64) -> f64 {
        if self.visits == 0 {
            return f64::INFINITY;
        }
        let bonus = if exploration == 0.0 {
            0.0
        } else {
            exploration * ((parent_visits as f64).ln() / self.visits as f64).sqrt()
        };
        self.advantage() + bonus
    }
}

/// A node in the search tree.
#[derive(Debug, Clone)]
pub struct TreeNode<S: GameState> {
    /// Owned snapshot of the game state at this node
    pub(crate) state: S,
    /// Player to move from this node
    pub(crate) acting_player: PlayerId,
    /// Parent node (None for root)
    pub(crate) parent: Option<NodeId>,
    /// Move applied to the parent's state to reach this node (None for root)
    pub(crate) parent_action: Option<S::Move>,
    /// Owned children, in creation order
    pub(crate) children: Vec<NodeId>,
    /// Legal moves not yet materialized as children, in pop order
    pub(crate) untried_moves: Vec<S::Move>,
    pub(crate) stats: NodeStats,
}

impl<S: GameState> TreeNode<S> {
    pub(crate) fn new(
        state: S,
        acting_player: PlayerId,
        parent: Option<NodeId>,
        parent_action: Option<S::Move>,
        untried_moves: Vec<S::Move>,
    ) -> Self {
        Self {
            state,
            acting_player,
            parent,
            parent_action,
            children: Vec::new(),
            untried_moves,
            stats: NodeStats::default(),
        }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn acting_player(&self) -> PlayerId {
        self.acting_player
    }

    /// The player whose move led here. Outcome counts are relative to this player.
    #[inline]
    pub fn mover(&self) -> PlayerId {
        self.acting_player.opponent()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn parent_action(&self) -> Option<&S::Move> {
        self.parent_action.as_ref()
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn untried_moves(&self) -> &[S::Move] {
        &self.untried_moves
    }

    pub fn stats(&self) -> &NodeStats {
        &self.stats
    }

    /// The round is over at this node: a ready simulation point.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        !self.state.tiles_remaining()
    }

    /// Every legal move has a corresponding child.
    #[inline]
    pub fn is_fully_expanded(&self) -> bool {
        self.untried_moves.is_empty()
    }
}
