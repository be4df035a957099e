use crate::ai::search_log::ChoiceWinRate;
use crate::core::{Action, Side};

use anyhow::{bail, Context};
use std::str::FromStr;

/// Arguments of a `go` command: which side to decide for, and with which agent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    pub side: Side,
    pub agent: String,
}

impl FromStr for SearchOptions {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s.split_whitespace().collect::<Vec<_>>();

        match parts.as_slice() {
            [side, agent] => Ok(SearchOptions {
                side: side.parse().context("invalid side")?,
                agent: agent.to_string(),
            }),
            _ => bail!("go expects <p1|p2> <agentId>, got '{}'", s),
        }
    }
}

/// Outcome of one decision
#[derive(Debug, Clone, PartialEq)]
pub struct SearchReport {
    pub action: Option<Action>,
    pub winrates: Vec<ChoiceWinRate>,
    pub rollouts: u64,
    /// seconds
    pub time: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let options: SearchOptions = "p2 mcts".parse().unwrap();
        assert_eq!(options.side, Side::P2);
        assert_eq!(options.agent, "mcts");

        assert!("p3 mcts".parse::<SearchOptions>().is_err());
        assert!("p1".parse::<SearchOptions>().is_err());
        assert!("p1 mc extra".parse::<SearchOptions>().is_err());
    }
}
