//! Flat Monte Carlo: sample every root action evenly, keep the best win count

use super::{
    playout::{rollout, MAX_TURNS},
    policy::Policy,
    random::WeightedRandom,
    search_log::{ChoiceWinRate, LogLevel, NullLog, SearchLog, SearchLogEntry},
};
use crate::core::{enumerate, Action, ChoiceSet, Error, Result, Side};
use crate::game::{GameState, Simulator};

use log::debug;
use rand::prelude::*;
use std::time::Instant;

#[derive(Debug, Clone, PartialEq)]
pub struct FlatMonteCarlo {
    playout_count: u32,
    rollout: WeightedRandom,
    turn_cap: u32,
}

/// Per-candidate results of one flat search
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub choices: ChoiceSet,
    pub wins: Vec<u32>,
    /// trials run for every candidate
    pub trials: u32,
}

impl Evaluation {
    /// Index of the highest win count. The last candidate wins a tie.
    pub fn best_index(&self) -> Option<usize> {
        let mut best: Option<(usize, u32)> = None;
        for (i, &wins) in self.wins.iter().enumerate() {
            match best {
                Some((_, most)) if wins < most => {}
                _ => best = Some((i, wins)),
            }
        }
        best.map(|(i, _)| i)
    }

    pub fn best(&self) -> Option<Action> {
        self.best_index()
            .and_then(|i| self.choices.get(i))
            .map(|c| c.action)
    }

    pub fn winrate(&self, index: usize) -> Option<f64> {
        let wins = *self.wins.get(index)?;
        (self.trials > 0).then(|| f64::from(wins) / f64::from(self.trials))
    }

    pub fn winrates(&self) -> Vec<ChoiceWinRate> {
        self.choices
            .iter()
            .enumerate()
            .map(|(i, choice)| ChoiceWinRate {
                choice: choice.clone(),
                winrate: self.winrate(i),
            })
            .collect()
    }
}

impl FlatMonteCarlo {
    pub fn new(playout_count: u32, switch_bias: f64) -> Result<Self> {
        if playout_count == 0 {
            return Err(Error::Config("playoutCount must be positive".into()));
        }
        Ok(Self {
            playout_count,
            rollout: WeightedRandom::new(switch_bias)?,
            turn_cap: MAX_TURNS,
        })
    }

    pub fn with_turn_cap(mut self, turn_cap: u32) -> Self {
        self.turn_cap = turn_cap;
        self
    }

    pub fn playout_count(&self) -> u32 {
        self.playout_count
    }

    /// Run `playout_count / choices` trials for every root choice
    pub fn evaluate<S: Simulator>(
        &self,
        state: &GameState<S>,
        side: Side,
        rng: &mut StdRng,
        log: &mut dyn SearchLog,
    ) -> Result<Evaluation> {
        let choices = enumerate(&state.request(side))?;
        if choices.is_empty() {
            return Ok(Evaluation {
                choices,
                wins: vec![],
                trials: 0,
            });
        }

        let trials = self.playout_count / choices.len() as u32;
        let mut wins = vec![0; choices.len()];

        for (i, action) in choices.actions().enumerate() {
            for _ in 0..trials {
                let mut next = state.clone();
                let other = self.rollout.select(&next, side.opponent(), rng, &mut NullLog)?;
                next.advance_as(side, Some(action), other)?;

                if rollout(next, &self.rollout, rng, self.turn_cap)? == Some(side) {
                    wins[i] += 1;
                }
                log.on_rollout();
            }
        }

        Ok(Evaluation {
            choices,
            wins,
            trials,
        })
    }
}

impl Policy for FlatMonteCarlo {
    fn select<S: Simulator>(
        &self,
        state: &GameState<S>,
        side: Side,
        rng: &mut StdRng,
        log: &mut dyn SearchLog,
    ) -> Result<Option<Action>> {
        let choices = enumerate(&state.request(side))?;
        if choices.len() <= 1 {
            return Ok(choices.actions().next());
        }

        let start = Instant::now();
        let evaluation = self.evaluate(state, side, rng, log)?;
        let best = evaluation.best();

        debug!(
            "flat mc for {}: {} trials x {} choices in {:.3}s, best {}",
            side,
            evaluation.trials,
            evaluation.choices.len(),
            start.elapsed().as_secs_f64(),
            Action::optional_key(best)
        );

        if log.wants(LogLevel::Info) {
            log.emit(SearchLogEntry::WinRates {
                winrates: evaluation.winrates(),
            });
        }

        Ok(best)
    }
}
