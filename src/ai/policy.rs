//! Policy capability and declarative agent construction

use super::{
    flat_mc::FlatMonteCarlo,
    mcts::Mcts,
    playout::MAX_TURNS,
    random::{RandomPolicy, WeightedRandom},
    search_log::SearchLog,
};
use crate::core::{Action, Error, Result, Side};
use crate::game::{GameState, Simulator};

use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Something that picks an action for one side. `None` means no action is
/// possible at this decision point.
pub trait Policy {
    fn select<S: Simulator>(
        &self,
        state: &GameState<S>,
        side: Side,
        rng: &mut StdRng,
        log: &mut dyn SearchLog,
    ) -> Result<Option<Action>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolicyKind {
    #[serde(alias = "AIRandom")]
    Random,
    #[serde(alias = "AIRandom2")]
    WeightedRandom,
    #[serde(rename = "FlatMC", alias = "AIMC")]
    FlatMc,
    #[serde(rename = "MCTS", alias = "AIMCTS")]
    Mcts,
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PolicyKind::Random => "Random",
            PolicyKind::WeightedRandom => "WeightedRandom",
            PolicyKind::FlatMc => "FlatMC",
            PolicyKind::Mcts => "MCTS",
        };
        f.write_str(name)
    }
}

impl FromStr for PolicyKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Random" | "AIRandom" => Ok(PolicyKind::Random),
            "WeightedRandom" | "AIRandom2" => Ok(PolicyKind::WeightedRandom),
            "FlatMC" | "AIMC" => Ok(PolicyKind::FlatMc),
            "MCTS" | "AIMCTS" => Ok(PolicyKind::Mcts),
            _ => Err(Error::Config(format!("unknown policy kind: {}", s))),
        }
    }
}

/// Kind-specific parameters. Which ones are required depends on the kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentParameters {
    #[serde(alias = "playoutSwitchRatio", skip_serializing_if = "Option::is_none")]
    pub switch_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playout_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turn_cap: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentConfig {
    pub id: String,
    pub policy_kind: PolicyKind,
    #[serde(default)]
    pub parameters: AgentParameters,
}

impl AgentConfig {
    pub fn new(id: impl Into<String>, policy_kind: PolicyKind, parameters: AgentParameters) -> Self {
        Self {
            id: id.into(),
            policy_kind,
            parameters,
        }
    }

    pub fn build(&self) -> Result<Agent> {
        Agent::from_config(self)
    }
}

fn require<T>(value: Option<T>, name: &str, kind: PolicyKind) -> Result<T> {
    value.ok_or_else(|| Error::Config(format!("{} requires parameter '{}'", kind, name)))
}

/// The closed set of selectable policies
#[derive(Debug, Clone, PartialEq)]
pub enum Agent {
    Random(RandomPolicy),
    WeightedRandom(WeightedRandom),
    FlatMc(FlatMonteCarlo),
    Mcts(Mcts),
}

impl Agent {
    pub fn from_config(config: &AgentConfig) -> Result<Self> {
        let kind = config.policy_kind;
        let params = &config.parameters;
        let turn_cap = params.turn_cap.unwrap_or(MAX_TURNS);

        let agent = match kind {
            PolicyKind::Random => Agent::Random(RandomPolicy),
            PolicyKind::WeightedRandom => {
                let ratio = require(params.switch_ratio, "switchRatio", kind)?;
                Agent::WeightedRandom(WeightedRandom::new(ratio)?)
            }
            PolicyKind::FlatMc => {
                let count = require(params.playout_count, "playoutCount", kind)?;
                let ratio = require(params.switch_ratio, "switchRatio", kind)?;
                Agent::FlatMc(FlatMonteCarlo::new(count, ratio)?.with_turn_cap(turn_cap))
            }
            PolicyKind::Mcts => {
                let count = require(params.playout_count, "playoutCount", kind)?;
                let ratio = require(params.switch_ratio, "switchRatio", kind)?;
                let temperature = require(params.temperature, "temperature", kind)?;
                let mut mcts = Mcts::new(count, temperature, ratio)?.with_turn_cap(turn_cap);
                if let Some(seed) = params.seed {
                    mcts = mcts.with_seed(seed);
                }
                Agent::Mcts(mcts)
            }
        };

        Ok(agent)
    }

    pub fn kind(&self) -> PolicyKind {
        match self {
            Agent::Random(_) => PolicyKind::Random,
            Agent::WeightedRandom(_) => PolicyKind::WeightedRandom,
            Agent::FlatMc(_) => PolicyKind::FlatMc,
            Agent::Mcts(_) => PolicyKind::Mcts,
        }
    }
}

impl Policy for Agent {
    fn select<S: Simulator>(
        &self,
        state: &GameState<S>,
        side: Side,
        rng: &mut StdRng,
        log: &mut dyn SearchLog,
    ) -> Result<Option<Action>> {
        match self {
            Agent::Random(policy) => policy.select(state, side, rng, log),
            Agent::WeightedRandom(policy) => policy.select(state, side, rng, log),
            Agent::FlatMc(policy) => policy.select(state, side, rng, log),
            Agent::Mcts(policy) => policy.select(state, side, rng, log),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use test_case::test_case;

    fn parse(json: &str) -> AgentConfig {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_parse_agent_file() {
        let configs: Vec<AgentConfig> = serde_json::from_str(indoc! {r#"
            [
                { "id": "rand", "policyKind": "Random" },
                { "id": "rand2", "policyKind": "AIRandom2", "parameters": { "switchRatio": 0.2 } },
                { "id": "mc", "policyKind": "FlatMC",
                  "parameters": { "playoutCount": 40, "playoutSwitchRatio": 0.1 } },
                { "id": "mcts", "policyKind": "AIMCTS",
                  "parameters": { "playoutCount": 100, "switchRatio": 0.1, "temperature": 0.5, "seed": 7 } }
            ]
        "#})
        .unwrap();

        let kinds: Vec<_> = configs.iter().map(|c| c.build().unwrap().kind()).collect();
        assert_eq!(
            kinds,
            vec![PolicyKind::Random, PolicyKind::WeightedRandom, PolicyKind::FlatMc, PolicyKind::Mcts]
        );
        assert_eq!(configs[2].parameters.switch_ratio, Some(0.1));
    }

    #[test_case(r#"{"id":"a","policyKind":"WeightedRandom"}"#; "weighted without ratio")]
    #[test_case(r#"{"id":"a","policyKind":"FlatMC","parameters":{"switchRatio":0.1}}"#; "flat without count")]
    #[test_case(r#"{"id":"a","policyKind":"FlatMC","parameters":{"playoutCount":10}}"#; "flat without ratio")]
    #[test_case(r#"{"id":"a","policyKind":"MCTS","parameters":{"playoutCount":10,"switchRatio":0.1}}"#; "mcts without temperature")]
    #[test_case(r#"{"id":"a","policyKind":"MCTS","parameters":{"temperature":1.0,"switchRatio":0.1}}"#; "mcts without count")]
    #[test_case(r#"{"id":"a","policyKind":"MCTS","parameters":{"playoutCount":0,"temperature":1.0,"switchRatio":0.1}}"#; "zero playouts")]
    #[test_case(r#"{"id":"a","policyKind":"MCTS","parameters":{"playoutCount":5,"temperature":-1.0,"switchRatio":0.1}}"#; "negative temperature")]
    fn test_missing_or_invalid_parameters(json: &str) {
        assert!(matches!(parse(json).build(), Err(Error::Config(_))));
    }

    #[test_case("AIMC", PolicyKind::FlatMc)]
    #[test_case("MCTS", PolicyKind::Mcts)]
    #[test_case("Random", PolicyKind::Random)]
    fn test_kind_from_str(s: &str, expected: PolicyKind) {
        assert_eq!(s.parse::<PolicyKind>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_kind() {
        assert!("Minimax".parse::<PolicyKind>().is_err());
        assert!(serde_json::from_str::<AgentConfig>(r#"{"id":"a","policyKind":"Minimax"}"#).is_err());
    }
}
