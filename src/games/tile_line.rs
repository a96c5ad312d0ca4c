//! # Tile Line Game Implementation
//!
//! A small score-based tile drafting game used to exercise the search engine.
//! A row of valued tiles lies on the table and the players take turns drafting
//! a tile from either end of the row.
//!
//! ## Rules
//! - Players alternate taking the leftmost or rightmost tile
//! - Drafted tiles are banked into the player's score when the round is scored
//! - The round ends when no tiles remain
//! - End-of-game bonus: 2 points for every pair of tiles with the same value
//! - Highest final score wins; equal scores are a draw

use crate::{GameState, PlayerId};
use rand::Rng;
use rand_xoshiro::rand_core::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::str::FromStr;

/// Points awarded per matching pair of tile values at the end of the game.
pub const PAIR_BONUS: i32 = 2;

/// Highest tile value produced by [`TileLineState::random`].
pub const MAX_TILE_VALUE: u8 = 9;

/// Represents a move in the tile line game
///
/// Which end of the row to draft from.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum TileLineMove {
    Left,
    Right,
}

/// Per-player part of the game state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TilePlayer {
    /// Tiles drafted this round, not yet scored
    pending: Vec<u8>,
    /// Tiles already banked by `score_round`
    collected: Vec<u8>,
    score: i32,
}

impl TilePlayer {
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }

    pub fn collected(&self) -> &[u8] {
        &self.collected
    }
}

/// Represents the complete state of a tile line game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileLineState {
    /// Tiles still on the table, left to right
    tiles: VecDeque<u8>,
    players: [TilePlayer; 2],
}

impl TileLineState {
    /// Creates a new game with the given row of tile values
    pub fn new(tiles: Vec<u8>) -> Self {
        Self {
            tiles: tiles.into(),
            players: [TilePlayer::default(), TilePlayer::default()],
        }
    }

    /// Creates a new game with `len` tiles drawn from a seeded generator
    ///
    /// Values are in `1..=MAX_TILE_VALUE`. The same seed always deals the same row.
    pub fn random(len: usize, seed: u64) -> Self {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let tiles = (0..len)
            .map(|_| rng.random_range(1..=MAX_TILE_VALUE))
            .collect();
        Self::new(tiles)
    }

    /// Tiles still on the table, left to right
    pub fn tiles(&self) -> impl Iterator<Item = u8> + '_ {
        self.tiles.iter().copied()
    }

    pub fn player(&self, player: PlayerId) -> &TilePlayer {
        &self.players[player.index()]
    }

    /// Value of the tile `mv` would draft, if any
    pub fn tile_for(&self, mv: TileLineMove) -> Option<u8> {
        match mv {
            TileLineMove::Left => self.tiles.front().copied(),
            TileLineMove::Right => self.tiles.back().copied(),
        }
    }
}

impl GameState for TileLineState {
    type Move = TileLineMove;

    fn get_available_moves(&self, _player: PlayerId) -> Vec<Self::Move> {
        match self.tiles.len() {
            0 => Vec::new(),
            // Both ends are the same tile
            1 => vec![TileLineMove::Left],
            _ => vec![TileLineMove::Left, TileLineMove::Right],
        }
    }

    fn execute_move(&mut self, player: PlayerId, mv: &Self::Move) {
        let tile = match mv {
            TileLineMove::Left => self.tiles.pop_front(),
            TileLineMove::Right => self.tiles.pop_back(),
        };
        if let Some(tile) = tile {
            self.players[player.index()].pending.push(tile);
        }
    }

    fn tiles_remaining(&self) -> bool {
        !self.tiles.is_empty()
    }

    fn score_round(&mut self, player: PlayerId) {
        let p = &mut self.players[player.index()];
        p.score += p.pending.iter().map(|&t| t as i32).sum::<i32>();
        p.collected.append(&mut p.pending);
    }

    fn end_of_game_score(&mut self, player: PlayerId) {
        let p = &mut self.players[player.index()];
        let mut counts: HashMap<u8, i32> = HashMap::new();
        for &tile in &p.collected {
            *counts.entry(tile).or_insert(0) += 1;
        }
        p.score += counts.values().map(|&n| (n / 2) * PAIR_BONUS).sum::<i32>();
    }

    fn score(&self, player: PlayerId) -> i32 {
        self.players[player.index()].score
    }
}

impl fmt::Display for TileLineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, tile) in self.tiles.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", tile)?;
        }
        write!(f, "]")?;
        for (i, p) in self.players.iter().enumerate() {
            write!(f, " P{}: {} ({} pending)", i, p.score, p.pending.len())?;
        }
        Ok(())
    }
}

impl fmt::Display for TileLineMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TileLineMove::Left => write!(f, "L"),
            TileLineMove::Right => write!(f, "R"),
        }
    }
}

impl FromStr for TileLineMove {
    type Err = String;

    /// Parses "l"/"left" or "r"/"right", case-insensitive
    ///
    /// # Examples
    /// ```
    /// use std::str::FromStr;
    /// use mcts::games::tile_line::TileLineMove;
    /// assert_eq!(TileLineMove::from_str("R").unwrap(), TileLineMove::Right);
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "l" | "left" => Ok(TileLineMove::Left),
            "r" | "right" => Ok(TileLineMove::Right),
            other => Err(format!("Expected 'l' or 'r', got '{}'", other)),
        }
    }
}
