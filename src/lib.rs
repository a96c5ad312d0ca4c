//! # Tile Game MCTS Engine
//!
//! Monte Carlo Tree Search move selection for two-player, perfect-information,
//! alternating-turn, score-based tile games.
//!
//! The engine only knows a game through the [`GameState`] trait: it enumerates
//! moves for a player, applies them to owned copies of the state, asks whether
//! the round still has tiles to play, and finally scores both players to
//! classify a playout as a win, loss or draw.
//!
//! ## Search
//! Each iteration runs the classic four phases:
//! 1. **Selection / Expansion**: walk down fully expanded nodes with the UCB
//!    rule and materialize one untried move as a new child
//! 2. **Simulation**: play the round to completion with a [`RolloutPolicy`]
//! 3. **Backpropagation**: record the outcome on every ancestor
//! 4. **Extraction**: after the budget is spent, the root child with the best
//!    win/loss advantage is returned
//!
//! ## Example
//! ```
//! use mcts::{GameState, GreedyPolicy, Mcts, PlayerId, SearchConfig};
//! use mcts::games::tile_line::TileLineState;
//!
//! let state = TileLineState::new(vec![3, 9, 1, 2]);
//! let player = PlayerId::FIRST;
//! let legal = state.get_available_moves(player);
//!
//! let mut engine = Mcts::new(SearchConfig::for_analysis(), GreedyPolicy).unwrap();
//! let mv = engine.select_move(&legal, &state, player).unwrap();
//! assert!(legal.contains(&mv));
//! ```

use std::fmt;
use std::hash::Hash;

pub mod config;
pub mod error;
pub mod games;
pub mod node;
pub mod rollout;
pub mod search;
pub mod tree;

pub use config::{MoveOrder, SearchConfig};
pub use error::SearchError;
pub use node::{NodeId, NodeStats, Outcome, TreeNode};
pub use rollout::{GreedyPolicy, HeuristicPolicy, RandomPolicy, RolloutPolicy};
pub use search::{ChildStatistics, Mcts, SearchResult, SearchStatistics};
pub use tree::{SearchTree, TreeStats};

/// The state of a two-player tile game. Must be cloneable so that every tree
/// node and every simulation owns an independent copy.
/// `Send` and `Sync` are required for root-parallel search.
pub trait GameState: Clone + Send + Sync {
    /// The type of a move in the game.
    type Move: Clone + Eq + Hash + fmt::Debug + Send + Sync;

    /// Returns all legal moves for `player` at this state.
    fn get_available_moves(&self, player: PlayerId) -> Vec<Self::Move>;
    /// Applies a move on behalf of `player`, modifying the state.
    fn execute_move(&mut self, player: PlayerId, mv: &Self::Move);
    /// Returns true while the round still has tiles to play.
    fn tiles_remaining(&self) -> bool;
    /// Scores the finished round for `player`, updating its score.
    fn score_round(&mut self, player: PlayerId);
    /// Adds the end-of-game bonus for `player` to its score.
    fn end_of_game_score(&mut self, player: PlayerId);
    /// Returns the current score of `player`.
    fn score(&self, player: PlayerId) -> i32;
}

/// Identifies one of the two players.
///
/// Move enumeration and scoring are delegated to the [`GameState`], so a
/// player is nothing more than its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(u8);

impl PlayerId {
    pub const FIRST: PlayerId = PlayerId(0);
    pub const SECOND: PlayerId = PlayerId(1);

    /// Creates a player id from 0 or 1. Returns `None` for anything else.
    pub fn new(id: u8) -> Option<Self> {
        match id {
            0 | 1 => Some(PlayerId(id)),
            _ => None,
        }
    }

    /// The other player.
    #[inline]
    pub fn opponent(self) -> Self {
        PlayerId(1 - self.0)
    }

    /// The id as an index into per-player arrays.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Legal moves for this player at `state`.
    pub fn available_moves<S: GameState>(self, state: &S) -> Vec<S::Move> {
        state.get_available_moves(self)
    }

    /// Finalizes this player's score on `state`: round score first, then the
    /// end-of-game bonus.
    pub fn final_score<S: GameState>(self, state: &mut S) -> i32 {
        state.score_round(self);
        state.end_of_game_score(self);
        state.score(self)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}
