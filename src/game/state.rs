//! Value-semantics wrapper over a battle engine used by every search strategy

use super::simulator::Simulator;
use crate::core::{Action, Request, Result, Side};
use crate::sim::Battle;
use crate::utils::make_rng;

use rand::prelude::*;
use std::fmt;

/// Serialized, independently owned copy of a battle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot(String);

impl Snapshot {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for Snapshot {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Full battle state. Cloning yields a deep copy that shares nothing with
/// the source, so speculative branches never alias.
#[derive(Debug, Clone)]
pub struct GameState<S: Simulator = Battle> {
    sim: S,
}

impl<S: Simulator> GameState<S> {
    pub fn new(sim: S) -> Self {
        Self { sim }
    }

    /// Start a battle. Without a seed one is drawn from the default RNG.
    pub fn from_parties(p1: &S::Party, p2: &S::Party, seed: Option<u64>) -> Result<Self> {
        let seed = seed.unwrap_or_else(|| make_rng(None).random());
        Ok(Self::new(S::start(p1, p2, seed)?))
    }

    /// Apply both sides' actions. `None` submits nothing for that side.
    /// If either action is rejected the state is left unchanged.
    pub fn advance(&mut self, p1: Option<Action>, p2: Option<Action>) -> Result<()> {
        let mut next = self.sim.clone();
        for (side, action) in [(Side::P1, p1), (Side::P2, p2)] {
            if let Some(action) = action {
                next.choose(side, action)?;
            }
        }
        self.sim = next;
        Ok(())
    }

    /// Apply an action pair given from `side`'s point of view
    pub fn advance_as(
        &mut self,
        side: Side,
        own: Option<Action>,
        other: Option<Action>,
    ) -> Result<()> {
        match side {
            Side::P1 => self.advance(own, other),
            Side::P2 => self.advance(other, own),
        }
    }

    pub fn is_ended(&self) -> bool {
        self.sim.ended()
    }

    pub fn winner(&self) -> Option<Side> {
        self.sim.winner()
    }

    pub fn turn(&self) -> u32 {
        self.sim.turn()
    }

    pub fn request(&self, side: Side) -> Request {
        self.sim.request(side)
    }

    pub fn event_log(&self) -> &[String] {
        self.sim.log()
    }

    /// Log lines appended after `offset`
    pub fn log_since(&self, offset: usize) -> &[String] {
        let log = self.sim.log();
        &log[offset.min(log.len())..]
    }

    pub fn simulator(&self) -> &S {
        &self.sim
    }

    pub fn serialize(&self) -> Result<Snapshot> {
        Ok(Snapshot(serde_json::to_string(&self.sim)?))
    }

    pub fn deserialize(snapshot: &Snapshot) -> Result<Self> {
        Ok(Self::new(serde_json::from_str(snapshot.as_str())?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{enumerate, Error};
    use crate::sim::presets;

    fn state() -> GameState {
        GameState::from_parties(&presets::electric(), &presets::water(), Some(42)).unwrap()
    }

    fn first_action(state: &GameState, side: Side) -> Option<Action> {
        enumerate(&state.request(side)).unwrap().actions().next()
    }

    #[test]
    fn test_clone_is_independent() {
        let original = state();
        let before = original.serialize().unwrap();

        let mut branch = original.clone();
        branch
            .advance(Some(Action::Move(1)), Some(Action::Switch(2)))
            .unwrap();

        assert_eq!(original.serialize().unwrap(), before);
        assert_eq!(original.turn(), 1);
        assert_eq!(branch.turn(), 2);
        assert!(branch.event_log().len() > original.event_log().len());
    }

    #[test]
    fn test_snapshot_roundtrip_replays() {
        let mut direct = state();
        let mut restored = GameState::<Battle>::deserialize(&direct.serialize().unwrap()).unwrap();

        while !direct.is_ended() && direct.turn() < 60 {
            let p1 = first_action(&direct, Side::P1);
            let p2 = first_action(&direct, Side::P2);
            direct.advance(p1, p2).unwrap();
            restored.advance(p1, p2).unwrap();
            assert_eq!(direct.turn(), restored.turn());
        }

        assert_eq!(direct.is_ended(), restored.is_ended());
        assert_eq!(direct.winner(), restored.winner());
        assert_eq!(direct.event_log(), restored.event_log());
    }

    #[test]
    fn test_log_since() {
        let mut state = state();
        let offset = state.event_log().len();
        assert!(state.log_since(offset).is_empty());
        assert!(state.log_since(offset + 10).is_empty());

        state.advance(Some(Action::Move(2)), Some(Action::Move(2))).unwrap();
        let delta = state.log_since(offset);
        assert!(delta.iter().any(|line| line.starts_with("|move|")));
        assert_eq!(delta.last().map(String::as_str), Some("|turn|2"));
    }

    #[test]
    fn test_advance_as_orders_pair() {
        let mut a = state();
        let mut b = state();
        a.advance(Some(Action::Move(1)), Some(Action::Move(3))).unwrap();
        b.advance_as(Side::P2, Some(Action::Move(3)), Some(Action::Move(1)))
            .unwrap();
        assert_eq!(a.simulator(), b.simulator());
    }

    #[test]
    fn test_illegal_action_surfaces() {
        let mut state = state();
        let result = state.advance(Some(Action::Move(9)), Some(Action::Move(1)));
        assert!(matches!(result, Err(Error::IllegalAction { side: Side::P1, .. })));
    }

    #[test]
    fn test_rejected_pair_leaves_state_unchanged() {
        let mut state = state();
        let before = state.serialize().unwrap();

        let result = state.advance(Some(Action::Move(1)), Some(Action::Move(9)));
        assert!(matches!(result, Err(Error::IllegalAction { side: Side::P2, .. })));
        assert_eq!(state.serialize().unwrap(), before);
        assert!(!matches!(state.request(Side::P1), Request::Wait { .. }));

        state.advance(Some(Action::Move(1)), Some(Action::Move(1))).unwrap();
        assert_eq!(state.turn(), 2);
    }

    #[test]
    fn test_invalid_party() {
        let result = GameState::<Battle>::from_parties(&vec![], &presets::water(), None);
        assert!(matches!(result, Err(Error::Initialization(_))));
    }
}
