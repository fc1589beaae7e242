//! Snake - a fixed-tick grid snake game
//!
//! This library provides:
//! - The simulation engine (game module): board, input buffering, collisions,
//!   scoring with persisted high scores, and the Ready/Running/Paused/GameOver
//!   state machine advanced by external frame timestamps
//! - Terminal collaborators for the `snake` binary (input, render, modes)

pub mod game;
pub mod input;
pub mod modes;
pub mod render;
