//! Pokeai - Monte Carlo action selection for simultaneous-move battles

pub mod ai;
pub mod core;
pub mod engine;
pub mod game;
pub mod rating;
pub mod record;
pub mod sim;
pub mod utils;

// Re-export commonly used items
pub use core::{Error, Result};
pub use engine::Engine;
pub use game::GameState;
