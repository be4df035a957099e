use crate::core::{Action, Request, Result, Side};

use serde::{de::DeserializeOwned, Serialize};

/// Contract the search layer needs from a battle engine.
///
/// Implementations must be deterministic: the same start parties, seed and
/// sequence of choices always produce the same requests, log and outcome.
/// `Clone` must be a deep copy, since every speculative branch clones.
pub trait Simulator: Clone + Serialize + DeserializeOwned {
    type Party: Clone;

    /// Set up a battle between two parties
    fn start(p1: &Self::Party, p2: &Self::Party, seed: u64) -> Result<Self>;

    /// Commit one side's choice. The engine resolves the phase once every side
    /// that owes an action has committed. Rejected choices are `IllegalAction`.
    fn choose(&mut self, side: Side, action: Action) -> Result<()>;

    fn ended(&self) -> bool;

    fn winner(&self) -> Option<Side>;

    /// Current turn, 1 at the start of the battle
    fn turn(&self) -> u32;

    fn request(&self, side: Side) -> Request;

    /// Append-only event log since the battle started
    fn log(&self) -> &[String];
}
