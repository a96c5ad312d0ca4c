//! # Game Implementations Module
//!
//! Concrete games live outside the engine; the engine only sees them through
//! the `GameState` trait. This module carries a small demo game so the search
//! can be benchmarked and tested end to end.
//!
//! ## Included Games
//! - **Tile Line**: two players draft tiles from either end of a row and
//!   score their values plus a pair bonus
//!
//! ## Adding New Games
//! To plug a new game into the engine, implement:
//! 1. A move type (`Clone + Eq + Hash + Debug`)
//! 2. A game state type with the `GameState` trait
//! 3. Round scoring and end-of-game bonus scoring per player

pub mod tile_line;
