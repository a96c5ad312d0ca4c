//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use mcts::{GameState, PlayerId, RolloutPolicy};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Moves of the fork game.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ForkMove {
    /// Forced win for the player who picks it
    Good,
    /// Forced loss for the player who picks it
    Bad,
    /// The only reply available to the other player
    Pass,
}

/// Two-ply game: the first player picks `Good` or `Bad`, the second can only
/// pass, and the round is over. `Bad` is enumerated first so that picking
/// `Good` is never an artifact of tie-breaking.
#[derive(Clone, Debug, Default)]
pub struct ForkGame {
    chooser: Option<(PlayerId, ForkMove)>,
    passed: bool,
    scores: [i32; 2],
}

impl GameState for ForkGame {
    type Move = ForkMove;

    fn get_available_moves(&self, _player: PlayerId) -> Vec<ForkMove> {
        match (self.chooser, self.passed) {
            (None, _) => vec![ForkMove::Bad, ForkMove::Good],
            (Some(_), false) => vec![ForkMove::Pass],
            (Some(_), true) => Vec::new(),
        }
    }

    fn execute_move(&mut self, player: PlayerId, mv: &ForkMove) {
        match mv {
            ForkMove::Pass => self.passed = true,
            choice => self.chooser = Some((player, *choice)),
        }
    }

    fn tiles_remaining(&self) -> bool {
        !(self.chooser.is_some() && self.passed)
    }

    fn score_round(&mut self, player: PlayerId) {
        if let Some((chooser, choice)) = self.chooser {
            let chooser_wins = choice == ForkMove::Good;
            if (player == chooser) == chooser_wins {
                self.scores[player.index()] += 10;
            }
        }
    }

    fn end_of_game_score(&mut self, _player: PlayerId) {}

    fn score(&self, player: PlayerId) -> i32 {
        self.scores[player.index()]
    }
}

/// Game where both players always finish with the same score.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MirrorGame {
    plies_left: u8,
    scores: [i32; 2],
}

impl MirrorGame {
    pub fn new(plies: u8) -> Self {
        Self {
            plies_left: plies,
            scores: [0, 0],
        }
    }
}

impl GameState for MirrorGame {
    type Move = u8;

    fn get_available_moves(&self, _player: PlayerId) -> Vec<u8> {
        if self.plies_left == 0 {
            Vec::new()
        } else {
            vec![1, 2, 3]
        }
    }

    fn execute_move(&mut self, _player: PlayerId, _mv: &u8) {
        self.plies_left -= 1;
    }

    fn tiles_remaining(&self) -> bool {
        self.plies_left > 0
    }

    fn score_round(&mut self, player: PlayerId) {
        self.scores[player.index()] += 5;
    }

    fn end_of_game_score(&mut self, player: PlayerId) {
        self.scores[player.index()] += 1;
    }

    fn score(&self, player: PlayerId) -> i32 {
        self.scores[player.index()]
    }
}

/// Game whose round never ends, but which runs out of moves after one ply.
#[derive(Clone, Debug, Default)]
pub struct StuckGame {
    plies: u8,
}

impl GameState for StuckGame {
    type Move = u8;

    fn get_available_moves(&self, _player: PlayerId) -> Vec<u8> {
        if self.plies == 0 {
            vec![1, 2]
        } else {
            Vec::new()
        }
    }

    fn execute_move(&mut self, _player: PlayerId, _mv: &u8) {
        self.plies += 1;
    }

    fn tiles_remaining(&self) -> bool {
        true
    }

    fn score_round(&mut self, _player: PlayerId) {}

    fn end_of_game_score(&mut self, _player: PlayerId) {}

    fn score(&self, _player: PlayerId) -> i32 {
        0
    }
}

/// Plays the first offered move and counts how often it was asked.
#[derive(Clone, Default)]
pub struct CountingPolicy {
    calls: Arc<AtomicUsize>,
}

impl CountingPolicy {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<S: GameState> RolloutPolicy<S> for CountingPolicy {
    fn choose_move(&mut self, moves: &[S::Move], _state: &S, _player: PlayerId) -> S::Move {
        self.calls.fetch_add(1, Ordering::SeqCst);
        moves[0].clone()
    }
}

/// Always answers with a fixed fork-game move, legal or not.
#[derive(Clone)]
pub struct StubbornPolicy(pub ForkMove);

impl RolloutPolicy<ForkGame> for StubbornPolicy {
    fn choose_move(
        &mut self,
        _moves: &[ForkMove],
        _state: &ForkGame,
        _player: PlayerId,
    ) -> ForkMove {
        self.0
    }
}
