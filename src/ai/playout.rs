//! Play a battle to completion with one policy per side

use super::{
    policy::Policy,
    search_log::{LogLevel, NullLog, SearchTrace},
};
use crate::core::{Action, Error, Result, Side, SideArray};
use crate::game::{GameState, Simulator};
use crate::record::{BattleEvent, ChoiceRecord};

use rand::prelude::*;
use std::time::Instant;

/// Default turn cap, after which a battle counts as a draw
pub const MAX_TURNS: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayoutOptions {
    pub turn_cap: u32,
    /// collect battle events
    pub record: bool,
    /// detail of the search traces attached to recorded choices
    pub log_level: LogLevel,
}

impl Default for PlayoutOptions {
    fn default() -> Self {
        Self {
            turn_cap: MAX_TURNS,
            record: false,
            log_level: LogLevel::Disabled,
        }
    }
}

impl PlayoutOptions {
    pub fn with_turn_cap(turn_cap: u32) -> Self {
        Self {
            turn_cap,
            ..Self::default()
        }
    }

    pub fn recorded(turn_cap: u32, log_level: LogLevel) -> Self {
        Self {
            turn_cap,
            record: true,
            log_level,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayoutResult {
    /// `None` on a draw, including the turn cap being reached
    pub winner: Option<Side>,
    pub turns: u32,
    /// number of actual (non-pass) actions per side
    pub action_counts: SideArray<u32>,
    pub events: Option<Vec<BattleEvent>>,
}

fn decide<S: Simulator, P: Policy>(
    state: &GameState<S>,
    side: Side,
    policy: &P,
    rng: &mut StdRng,
    options: &PlayoutOptions,
    events: Option<&mut Vec<BattleEvent>>,
) -> Result<Option<Action>> {
    let Some(events) = events else {
        return policy.select(state, side, rng, &mut NullLog);
    };

    let request = state.request(side);
    let mut trace = SearchTrace::new(options.log_level);
    let start = Instant::now();
    let action = policy.select(state, side, rng, &mut trace)?;
    let search_time = start.elapsed().as_secs_f64();

    if !request.is_wait() {
        events.push(BattleEvent::Choice {
            choice: ChoiceRecord {
                player: side,
                request,
                choice: action,
                search_log: trace.take_entries(),
                search_time,
            },
        });
    }

    Ok(action)
}

/// Play until the battle ends or reaches `options.turn_cap`. Fails with
/// `Error::Stalled` when both policies pass on the same step.
pub fn playout<S, A, B>(
    mut state: GameState<S>,
    p1: &A,
    p2: &B,
    rng: &mut StdRng,
    options: &PlayoutOptions,
) -> Result<PlayoutResult>
where
    S: Simulator,
    A: Policy,
    B: Policy,
{
    let mut action_counts = SideArray::<u32>::default();
    let mut events = options.record.then(Vec::new);
    if let Some(events) = events.as_mut() {
        events.push(BattleEvent::update(state.event_log()));
    }
    let mut offset = state.event_log().len();

    while !state.is_ended() && state.turn() < options.turn_cap {
        let a1 = decide(&state, Side::P1, p1, rng, options, events.as_mut())?;
        let a2 = decide(&state, Side::P2, p2, rng, options, events.as_mut())?;

        if a1.is_none() && a2.is_none() {
            return Err(Error::Stalled(state.turn()));
        }

        for (side, action) in [(Side::P1, a1), (Side::P2, a2)] {
            if action.is_some() {
                action_counts[side] += 1;
            }
        }

        state.advance(a1, a2)?;

        if let Some(events) = events.as_mut() {
            events.push(BattleEvent::update(state.log_since(offset)));
        }
        offset = state.event_log().len();
    }

    Ok(PlayoutResult {
        winner: if state.is_ended() { state.winner() } else { None },
        turns: state.turn(),
        action_counts,
        events,
    })
}

/// Unrecorded playout with the same policy on both sides; returns the winner
pub fn rollout<S: Simulator, P: Policy>(
    state: GameState<S>,
    policy: &P,
    rng: &mut StdRng,
    turn_cap: u32,
) -> Result<Option<Side>> {
    let result = playout(state, policy, policy, rng, &PlayoutOptions::with_turn_cap(turn_cap))?;
    Ok(result.winner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::random::{RandomPolicy, WeightedRandom};
    use crate::ai::SearchLog;
    use crate::sim::presets;
    use crate::utils::make_rng;

    fn state(seed: u64) -> GameState {
        GameState::from_parties(&presets::electric(), &presets::ground(), Some(seed)).unwrap()
    }

    #[test]
    fn test_playout_finishes() {
        let mut rng = make_rng(Some(3));
        let result = playout(state(1), &RandomPolicy, &RandomPolicy, &mut rng, &PlayoutOptions::default()).unwrap();
        assert!(result.winner.is_some());
        assert!(result.turns < MAX_TURNS);
        assert!(result.action_counts.iter().all(|&n| n > 0));
        assert!(result.events.is_none());
    }

    struct PassPolicy;

    impl Policy for PassPolicy {
        fn select<S: Simulator>(
            &self,
            _: &GameState<S>,
            _: Side,
            _: &mut StdRng,
            _: &mut dyn SearchLog,
        ) -> Result<Option<Action>> {
            Ok(None)
        }
    }

    #[test]
    fn test_both_passing_stalls() {
        let mut rng = make_rng(Some(3));
        let result = playout(state(1), &PassPolicy, &PassPolicy, &mut rng, &PlayoutOptions::default());
        assert!(matches!(result, Err(Error::Stalled(1))));
    }

    #[test]
    fn test_turn_cap_draw() {
        let mut rng = make_rng(Some(3));
        let options = PlayoutOptions::with_turn_cap(1);
        let result = playout(state(1), &RandomPolicy, &RandomPolicy, &mut rng, &options).unwrap();
        assert_eq!(result.winner, None);
        assert_eq!(result.turns, 1);
        assert_eq!(result.action_counts, SideArray::new(0, 0));
    }

    #[test]
    fn test_recorded_events_alternate() {
        let mut rng = make_rng(Some(4));
        let weighted = WeightedRandom::new(0.2).unwrap();
        let options = PlayoutOptions::recorded(MAX_TURNS, LogLevel::Info);
        let result = playout(state(2), &weighted, &RandomPolicy, &mut rng, &options).unwrap();
        let events = result.events.unwrap();

        assert!(matches!(&events[0], BattleEvent::Update { update } if update.iter().any(|l| l == "|start")));
        assert!(matches!(events.last(), Some(BattleEvent::Update { .. })));

        let choices = events
            .iter()
            .filter(|e| matches!(e, BattleEvent::Choice { .. }))
            .count() as u32;
        assert_eq!(choices, result.action_counts.iter().sum::<u32>());
    }

    #[test]
    fn test_rollout_reproducible() {
        let weighted = WeightedRandom::new(0.1).unwrap();
        let a = rollout(state(9), &weighted, &mut make_rng(Some(11)), MAX_TURNS).unwrap();
        let b = rollout(state(9), &weighted, &mut make_rng(Some(11)), MAX_TURNS).unwrap();
        assert_eq!(a, b);
    }
}
