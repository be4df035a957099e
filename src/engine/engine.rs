use crate::ai::{AgentConfig, AgentParameters, PlayoutResult, Policy, PolicyKind, SearchTrace};
use crate::game::GameState;
use crate::core::{Action, Side};
use crate::rating::{
    play_match, players, tournament::battle_record, MatchOptions, Player, Rating, Tournament,
    TournamentOptions,
};
use crate::record::BattleLogWriter;
use crate::sim::{party, presets, PartyEntry};
use crate::utils::make_rng;

use super::options::EngineOptions;
use super::search::{SearchOptions, SearchReport};

use anyhow::{bail, ensure, Context, Result};
use log::debug;
use rand::prelude::*;
use std::{fs, path::Path, time::Instant};

/// Agents available before any agent file is loaded
pub fn default_agents() -> Vec<AgentConfig> {
    let params = |switch_ratio, playout_count, temperature| AgentParameters {
        switch_ratio,
        playout_count,
        temperature,
        ..AgentParameters::default()
    };

    vec![
        AgentConfig::new("random", PolicyKind::Random, params(None, None, None)),
        AgentConfig::new("weighted", PolicyKind::WeightedRandom, params(Some(0.1), None, None)),
        AgentConfig::new("mc", PolicyKind::FlatMc, params(Some(0.1), Some(100), None)),
        AgentConfig::new("mcts", PolicyKind::Mcts, params(Some(0.1), Some(100), Some(0.7))),
    ]
}

/// Engine holds loaded parties and agents plus the battle under analysis
pub struct Engine {
    pub options: EngineOptions,
    pub parties: Vec<PartyEntry>,
    pub agents: Vec<AgentConfig>,
    pub state: Option<GameState>,
    rng: StdRng,
}

impl Engine {
    /// Create a new engine with the preset parties and default agents
    pub fn new() -> Self {
        let options = EngineOptions::default();
        Self {
            rng: make_rng(options.seed),
            options,
            parties: presets::entries(),
            agents: default_agents(),
            state: None,
        }
    }

    pub fn set_option(&mut self, name: &str, value: &str) -> Result<()> {
        self.options.set_option(name, value)?;
        if name == "seed" {
            self.rng = make_rng(self.options.seed);
        }
        Ok(())
    }

    /// Replace the known parties with the contents of a party file
    pub fn load_parties(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read party file {}", path.display()))?;
        let parties: Vec<PartyEntry> = serde_json::from_str(&text)
            .with_context(|| format!("Invalid party file {}", path.display()))?;

        for entry in &parties {
            party::validate(&entry.party).with_context(|| format!("Invalid party '{}'", entry.id))?;
        }

        self.parties = parties;
        Ok(self.parties.len())
    }

    /// Replace the known agents with the contents of an agent file
    pub fn load_agents(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read agent file {}", path.display()))?;
        let agents: Vec<AgentConfig> = serde_json::from_str(&text)
            .with_context(|| format!("Invalid agent file {}", path.display()))?;

        for config in &agents {
            config
                .build()
                .with_context(|| format!("Invalid agent '{}'", config.id))?;
        }

        self.agents = agents;
        Ok(self.agents.len())
    }

    pub fn party(&self, id: &str) -> Result<&PartyEntry> {
        self.parties
            .iter()
            .find(|entry| entry.id == id)
            .with_context(|| format!("Unknown party: {}", id))
    }

    /// Agent config with the engine's turn cap filled in where the agent sets none
    pub fn agent(&self, id: &str) -> Result<AgentConfig> {
        let mut config = self
            .agents
            .iter()
            .find(|config| config.id == id)
            .cloned()
            .with_context(|| format!("Unknown agent: {}", id))?;
        config.parameters.turn_cap.get_or_insert(self.options.turn_cap);
        Ok(config)
    }

    /// Look up a player by `"<agentId>+<partyId>"`
    pub fn player(&self, id: &str) -> Result<Player> {
        let Some((agent_id, party_id)) = id.split_once('+') else {
            bail!("Player ids look like <agent>+<party>, got '{}'", id);
        };

        Ok(Player {
            id: id.to_string(),
            agent: self.agent(agent_id)?.build()?,
            party: self.party(party_id)?.party.clone(),
        })
    }

    fn next_seed(&mut self, seed: Option<u64>) -> u64 {
        seed.unwrap_or_else(|| self.rng.random())
    }

    /// Start a new battle between two parties
    pub fn new_battle(&mut self, p1: &str, p2: &str, seed: Option<u64>) -> Result<()> {
        let seed = self.next_seed(seed);
        let state: GameState = GameState::from_parties(&self.party(p1)?.party, &self.party(p2)?.party, Some(seed))?;
        self.state = Some(state);
        Ok(())
    }

    pub fn state(&self) -> Result<&GameState> {
        self.state.as_ref().context("No battle in progress")
    }

    /// Advance the current battle; returns the log lines it produced
    pub fn choose(&mut self, p1: Option<Action>, p2: Option<Action>) -> Result<Vec<String>> {
        let state = self.state.as_mut().context("No battle in progress")?;
        ensure!(!state.is_ended(), "Battle is already over");

        let offset = state.event_log().len();
        state.advance(p1, p2)?;
        Ok(state.log_since(offset).to_vec())
    }

    /// Run an agent on the current battle for one side
    pub fn go(&mut self, search: &SearchOptions) -> Result<SearchReport> {
        let agent = self.agent(&search.agent)?.build()?;
        let seed = self.next_seed(None);
        let state = self.state()?;

        let mut trace = SearchTrace::new(self.options.log_level);
        let mut rng = make_rng(Some(seed));
        let start = Instant::now();
        let action = agent.select(state, search.side, &mut rng, &mut trace)?;
        let time = start.elapsed().as_secs_f64();

        debug!("{} chose {} for {}", search.agent, Action::optional_key(action), search.side);

        Ok(SearchReport {
            action,
            winrates: trace.last_winrates().map(<[_]>::to_vec).unwrap_or_default(),
            rollouts: trace.rollouts,
            time,
        })
    }

    pub fn display(&self) -> Result<()> {
        println!("{}", self.state()?.simulator());
        Ok(())
    }

    /// Play a full battle between two players, optionally appending it to a battle log
    pub fn battle(&mut self, p1: &str, p2: &str, log: Option<&Path>) -> Result<PlayoutResult> {
        let (p1, p2) = (self.player(p1)?, self.player(p2)?);
        let seed = self.next_seed(None);
        let options = MatchOptions {
            turn_cap: self.options.turn_cap,
            record: log.is_some(),
            log_level: self.options.log_level,
        };

        let result = play_match(&p1, &p2, seed, &options)?;
        if let Some(path) = log {
            BattleLogWriter::open(path)?.append(&battle_record(&p1, &p2, &result))?;
        }

        Ok(result)
    }

    /// Rate every agent and party combination; writes the ratings as JSON
    pub fn rate(&mut self, rounds: u32, result_path: &Path, log: Option<&Path>) -> Result<Vec<Rating>> {
        let players = players(&self.agents_with_cap(), &self.parties)?;
        ensure!(players.len() >= 2, "Rating needs at least two players");

        let options = TournamentOptions {
            rounds,
            threads: self.options.threads,
            seed: Some(self.next_seed(None)),
            matches: MatchOptions {
                turn_cap: self.options.turn_cap,
                record: log.is_some(),
                log_level: self.options.log_level,
            },
        };

        let mut writer = log.map(BattleLogWriter::open).transpose()?;
        let ratings = Tournament::new(&players, options).run(writer.as_mut())?;

        let json = serde_json::to_string_pretty(&ratings)?;
        fs::write(result_path, json)
            .with_context(|| format!("Failed to write ratings to {}", result_path.display()))?;
        Ok(ratings)
    }

    fn agents_with_cap(&self) -> Vec<AgentConfig> {
        self.agents
            .iter()
            .map(|config| {
                let mut config = config.clone();
                config.parameters.turn_cap.get_or_insert(self.options.turn_cap);
                config
            })
            .collect()
    }

    pub fn winner(&self) -> Option<Side> {
        self.state.as_ref().and_then(|s| s.winner())
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
