//! Search configuration parameters.

use rand::seq::SliceRandom;
use rand_xoshiro::rand_core::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::error::SearchError;

/// Order in which a node's untried moves are expanded.
///
/// Expansion order changes which children exist after a small budget, so it
/// is fixed explicitly instead of following container iteration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoveOrder {
    /// Moves are expanded in the order the game enumerated them.
    #[default]
    Insertion,
    /// Moves are expanded from the back of the enumerated list.
    Reverse,
    /// Moves are shuffled with a seeded generator before expansion.
    Shuffled { seed: u64 },
}

impl MoveOrder {
    /// Creates the generator a search tree uses for shuffling, if any.
    /// `stream` separates the generators of independent workers.
    pub(crate) fn rng(self, stream: u64) -> Option<Xoshiro256PlusPlus> {
        match self {
            MoveOrder::Shuffled { seed } => {
                Some(Xoshiro256PlusPlus::seed_from_u64(seed.wrapping_add(stream)))
            }
            _ => None,
        }
    }

    /// Arranges `moves` so that repeated `pop()` yields them in expansion order.
    pub(crate) fn arrange<M>(
        self,
        mut moves: Vec<M>,
        rng: Option<&mut Xoshiro256PlusPlus>,
    ) -> Vec<M> {
        match (self, rng) {
            (MoveOrder::Insertion, _) => moves.reverse(),
            (MoveOrder::Reverse, _) => {}
            (MoveOrder::Shuffled { .. }, Some(rng)) => moves.shuffle(rng),
            (MoveOrder::Shuffled { seed }, None) => {
                moves.shuffle(&mut Xoshiro256PlusPlus::seed_from_u64(seed));
            }
        }
        moves
    }
}

/// Configuration for a Monte Carlo Tree Search.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Number of iterations (select, simulate, backpropagate) per search.
    /// This is the only termination control: there is no timeout.
    pub iterations: u32,

    /// Exploration weight `c` in the UCB rule.
    /// The exploitation term lies in [-1, 1]; 0.0 turns selection greedy.
    pub exploration: f64,

    /// Expansion order of untried moves.
    pub move_order: MoveOrder,

    /// Number of root-parallel workers. 1 runs the sequential search,
    /// 0 uses one worker per logical CPU.
    pub num_threads: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            iterations: 100,
            exploration: std::f64::consts::SQRT_2,
            move_order: MoveOrder::Insertion,
            num_threads: 1,
        }
    }
}

impl SearchConfig {
    /// Cheap config for analysis runs over many games.
    pub fn for_analysis() -> Self {
        Self::default()
    }

    /// Strong config for a single serious match.
    pub fn for_play() -> Self {
        Self {
            iterations: 10_000,
            ..Self::default()
        }
    }

    /// Builder pattern: set the iteration budget.
    pub fn with_iterations(mut self, n: u32) -> Self {
        self.iterations = n;
        self
    }

    /// Builder pattern: set the exploration weight.
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration = c;
        self
    }

    /// Builder pattern: set the expansion order.
    pub fn with_move_order(mut self, order: MoveOrder) -> Self {
        self.move_order = order;
        self
    }

    /// Builder pattern: set the number of root-parallel workers.
    pub fn with_threads(mut self, n: usize) -> Self {
        self.num_threads = n;
        self
    }

    /// Worker count after resolving 0 to the number of logical CPUs.
    pub fn effective_threads(&self) -> usize {
        if self.num_threads == 0 {
            num_cpus::get()
        } else {
            self.num_threads
        }
    }

    pub fn validate(&self) -> Result<(), SearchError> {
        if self.iterations == 0 {
            return Err(SearchError::InvalidConfig(
                "iteration budget must be at least 1".to_string(),
            ));
        }
        if !self.exploration.is_finite() || self.exploration < 0.0 {
            return Err(SearchError::InvalidConfig(format!(
                "exploration weight must be finite and non-negative, got {}",
                self.exploration
            )));
        }
        Ok(())
    }
}
