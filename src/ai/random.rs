//! Search-free baseline policies, also used as rollout policies

use super::{policy::Policy, search_log::SearchLog};
use crate::core::{enumerate, Action, Error, Result, Side};
use crate::game::{GameState, Simulator};

use rand::prelude::*;

/// Uniformly random legal action
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RandomPolicy;

impl Policy for RandomPolicy {
    fn select<S: Simulator>(
        &self,
        state: &GameState<S>,
        side: Side,
        rng: &mut StdRng,
        _log: &mut dyn SearchLog,
    ) -> Result<Option<Action>> {
        let choices = enumerate(&state.request(side))?;
        let actions: Vec<Action> = choices.actions().collect();
        Ok(actions.choose(rng).copied())
    }
}

/// Random legal action, switching with probability `switch_bias` whenever
/// both options and switches are available.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedRandom {
    switch_bias: f64,
}

impl WeightedRandom {
    pub fn new(switch_bias: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&switch_bias) {
            return Err(Error::Config(format!(
                "switch ratio must be within [0, 1], got {}",
                switch_bias
            )));
        }
        Ok(Self { switch_bias })
    }

    pub fn switch_bias(&self) -> f64 {
        self.switch_bias
    }
}

impl Policy for WeightedRandom {
    fn select<S: Simulator>(
        &self,
        state: &GameState<S>,
        side: Side,
        rng: &mut StdRng,
        _log: &mut dyn SearchLog,
    ) -> Result<Option<Action>> {
        let choices = enumerate(&state.request(side))?;
        let options: Vec<Action> = choices.options().map(|c| c.action).collect();
        let switches: Vec<Action> = choices.switches().map(|c| c.action).collect();

        let pool = match (options.is_empty(), switches.is_empty()) {
            (false, false) => {
                if rng.random::<f64>() < self.switch_bias {
                    &switches
                } else {
                    &options
                }
            }
            (true, _) => &switches,
            (false, true) => &options,
        };

        Ok(pool.choose(rng).copied())
    }
}
