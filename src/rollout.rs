//! Rollout policies: how moves are chosen during simulation playouts.
//!
//! The policy is injected into the engine once at construction. The default
//! [`GreedyPolicy`] is a deterministic heuristic player, which keeps playout
//! variance much lower than uniform random choice.

use rand::Rng;
use rand_xoshiro::rand_core::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::{GameState, PlayerId};

/// Chooses a move during simulation playouts.
pub trait RolloutPolicy<S: GameState>: Clone + Send {
    /// Picks one of `moves` for `player` at `state`.
    ///
    /// `moves` is never empty. Returning a move outside `moves` aborts the
    /// search with `SearchError::IllegalRolloutMove`.
    fn choose_move(&mut self, moves: &[S::Move], state: &S, player: PlayerId) -> S::Move;

    /// Returns an independent policy for root-parallel worker `worker`.
    fn fork(&self, _worker: usize) -> Self {
        self.clone()
    }
}

/// Returns the move with the highest key, keeping the first on ties.
fn first_best<M: Clone>(moves: &[M], mut key: impl FnMut(&M) -> i64) -> M {
    let mut best = &moves[0];
    let mut best_key = key(best);
    for mv in &moves[1..] {
        let k = key(mv);
        if k > best_key {
            best = mv;
            best_key = k;
        }
    }
    best.clone()
}

/// Greedy heuristic player.
///
/// Plays each candidate on a copy of the state, scores the round for the
/// acting player and keeps the move with the best resulting score.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyPolicy;

impl<S: GameState> RolloutPolicy<S> for GreedyPolicy {
    fn choose_move(&mut self, moves: &[S::Move], state: &S, player: PlayerId) -> S::Move {
        first_best(moves, |mv| {
            let mut next = state.clone();
            next.execute_move(player, mv);
            next.score_round(player);
            next.score(player) as i64
        })
    }
}

/// Heuristic player driven by a game-specific scoring closure.
///
/// The closure rates a candidate move for the acting player; the highest
/// rating wins and the first candidate is kept on ties.
#[derive(Clone)]
pub struct HeuristicPolicy<F> {
    heuristic: F,
}

impl<F> HeuristicPolicy<F> {
    pub fn new(heuristic: F) -> Self {
        Self { heuristic }
    }
}

impl<S, F> RolloutPolicy<S> for HeuristicPolicy<F>
where
    S: GameState,
    F: Fn(&S, PlayerId, &S::Move) -> i64 + Clone + Send,
{
    fn choose_move(&mut self, moves: &[S::Move], state: &S, player: PlayerId) -> S::Move {
        first_best(moves, |mv| (self.heuristic)(state, player, mv))
    }
}

/// Uniform random player with a seeded generator.
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    rng: Xoshiro256PlusPlus,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        }
    }
}

impl<S: GameState> RolloutPolicy<S> for RandomPolicy {
    fn choose_move(&mut self, moves: &[S::Move], _state: &S, _player: PlayerId) -> S::Move {
        moves[self.rng.random_range(0..moves.len())].clone()
    }

    /// Each worker gets a non-overlapping subsequence of the stream.
    fn fork(&self, worker: usize) -> Self {
        let mut forked = self.clone();
        for _ in 0..worker {
            forked.rng.jump();
        }
        forked
    }
}
