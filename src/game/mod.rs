//! Engine contract and the game state adapter used by search

pub mod simulator;
pub mod state;

pub use simulator::Simulator;
pub use state::{GameState, Snapshot};
