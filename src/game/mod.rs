//! Core game logic module for Snake
//!
//! This module contains the whole simulation without any I/O or rendering
//! dependencies. Frames, key presses and storage are all supplied by the caller.

pub mod action;
pub mod clock;
pub mod collision;
pub mod config;
pub mod engine;
pub mod input;
pub mod score;
pub mod state;

// Re-export commonly used types
pub use action::{Action, Direction};
pub use clock::GameClock;
pub use collision::{Collision, CollisionDetector};
pub use config::{ConfigError, Difficulty, GameConfig};
pub use engine::{GameController, GameState, Snapshot, TickOutcome};
pub use input::InputQueue;
pub use score::{JsonFileStore, MemoryStore, ScoreKeeper, ScoreStore, StoreError, HIGH_SCORE_KEY};
pub use state::{Board, Cell, Snake};
