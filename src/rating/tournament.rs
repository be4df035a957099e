//! Noisy-ranking round robin between agent and party combinations

use super::elo::{self, INITIAL_RATING};
use crate::ai::{playout, Agent, AgentConfig, LogLevel, PlayoutOptions, PlayoutResult, MAX_TURNS};
use crate::game::GameState;
use crate::record::{BattleEnd, BattleLogWriter, BattleRecord, PlayerRecord, Players};
use crate::sim::{Party, PartyEntry};

use anyhow::{Context, Result};
use log::info;
use rand::prelude::*;
use rand_distr::{Distribution, Normal};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Standard deviation of the noise added to ratings before pairing
pub const PAIRING_NOISE: f64 = 200.0;

/// An agent playing a fixed party
#[derive(Debug, Clone)]
pub struct Player {
    pub id: String,
    pub agent: Agent,
    pub party: Party,
}

impl Player {
    pub fn record(&self) -> PlayerRecord {
        PlayerRecord {
            player_id: self.id.clone(),
            party: self.party.clone(),
        }
    }
}

/// Every agent paired with every party, ids `"<agent>+<party>"`
pub fn players(agents: &[AgentConfig], parties: &[PartyEntry]) -> Result<Vec<Player>> {
    let mut players = Vec::with_capacity(agents.len() * parties.len());
    for config in agents {
        let agent = config
            .build()
            .with_context(|| format!("Failed to build agent '{}'", config.id))?;
        for entry in parties {
            players.push(Player {
                id: format!("{}+{}", config.id, entry.id),
                agent: agent.clone(),
                party: entry.party.clone(),
            });
        }
    }
    Ok(players)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOptions {
    pub turn_cap: u32,
    pub record: bool,
    pub log_level: LogLevel,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            turn_cap: MAX_TURNS,
            record: false,
            log_level: LogLevel::Disabled,
        }
    }
}

/// Play one battle between two players. Everything random derives from `seed`.
pub fn play_match(p1: &Player, p2: &Player, seed: u64, options: &MatchOptions) -> Result<PlayoutResult> {
    let mut rng = StdRng::seed_from_u64(seed);
    let state: GameState = GameState::from_parties(&p1.party, &p2.party, Some(rng.random()))
        .with_context(|| format!("Failed to start {} vs {}", p1.id, p2.id))?;

    let playout_options = PlayoutOptions {
        turn_cap: options.turn_cap,
        record: options.record,
        log_level: options.log_level,
    };
    let result = playout(state, &p1.agent, &p2.agent, &mut rng, &playout_options)
        .with_context(|| format!("Battle {} vs {} failed", p1.id, p2.id))?;
    Ok(result)
}

/// Turn a recorded result into a persisted battle record
pub fn battle_record(p1: &Player, p2: &Player, result: &PlayoutResult) -> BattleRecord {
    BattleRecord {
        agents: Players {
            p1: p1.record(),
            p2: p2.record(),
        },
        events: result.events.clone().unwrap_or_default(),
        end: BattleEnd::new(result.winner),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub id: String,
    pub rate: f64,
}

#[derive(Debug, Clone)]
pub struct TournamentOptions {
    pub rounds: u32,
    pub threads: usize,
    pub seed: Option<u64>,
    pub matches: MatchOptions,
}

impl Default for TournamentOptions {
    fn default() -> Self {
        Self {
            rounds: 10,
            threads: 0,
            seed: None,
            matches: MatchOptions::default(),
        }
    }
}

pub struct Tournament<'a> {
    players: &'a [Player],
    ratings: Vec<f64>,
    rng: StdRng,
    options: TournamentOptions,
}

impl<'a> Tournament<'a> {
    pub fn new(players: &'a [Player], options: TournamentOptions) -> Self {
        Self {
            players,
            ratings: vec![INITIAL_RATING; players.len()],
            rng: crate::utils::make_rng(options.seed),
            options,
        }
    }

    pub fn ratings(&self) -> Vec<Rating> {
        self.players
            .iter()
            .zip(&self.ratings)
            .map(|(player, &rate)| Rating {
                id: player.id.clone(),
                rate,
            })
            .collect()
    }

    /// Rank players by rating plus noise and pair neighbours; an odd one out sits.
    /// The lower ranked player of each pair plays p1.
    pub fn pairings(&mut self) -> Result<Vec<(usize, usize)>> {
        let noise = Normal::new(0.0, PAIRING_NOISE).context("Invalid pairing noise")?;
        let noisy: Vec<f64> = self
            .ratings
            .iter()
            .map(|&r| r + noise.sample(&mut self.rng))
            .collect();

        let mut ranking: Vec<usize> = (0..noisy.len()).collect();
        ranking.sort_by(|&a, &b| noisy[a].total_cmp(&noisy[b]));

        Ok(ranking
            .chunks_exact(2)
            .map(|pair| (pair[0], pair[1]))
            .collect())
    }

    /// Play one round on `pool`. Results are applied in pairing order.
    pub fn play_round(
        &mut self,
        pool: &rayon::ThreadPool,
        mut writer: Option<&mut BattleLogWriter>,
    ) -> Result<Vec<PlayoutResult>> {
        let jobs: Vec<((usize, usize), u64)> = self
            .pairings()?
            .into_iter()
            .map(|pair| (pair, self.rng.random()))
            .collect();

        let players = self.players;
        let options = self.options.matches;
        let results: Vec<PlayoutResult> = pool.install(|| {
            jobs.par_iter()
                .map(|&((left, right), seed)| play_match(&players[left], &players[right], seed, &options))
                .collect::<Result<Vec<_>>>()
        })?;

        for (&((left, right), _), result) in jobs.iter().zip(&results) {
            let (mut a, mut b) = (self.ratings[left], self.ratings[right]);
            elo::update(&mut a, &mut b, result.winner);
            self.ratings[left] = a;
            self.ratings[right] = b;

            if let Some(writer) = writer.as_deref_mut() {
                writer.append(&battle_record(&players[left], &players[right], result))?;
            }
        }

        Ok(results)
    }

    /// Play every round and return the final ratings
    pub fn run(mut self, mut writer: Option<&mut BattleLogWriter>) -> Result<Vec<Rating>> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.options.threads)
            .build()
            .context("Failed to build thread pool")?;

        for round in 0..self.options.rounds {
            info!("round {}/{}", round + 1, self.options.rounds);
            let results = self.play_round(&pool, writer.as_deref_mut())?;
            let draws = results.iter().filter(|r| r.winner.is_none()).count();
            info!("round {} done: {} battles, {} draws", round + 1, results.len(), draws);
        }

        Ok(self.ratings())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{AgentParameters, PolicyKind};
    use crate::record::read_records;
    use crate::sim::presets;

    fn configs() -> Vec<AgentConfig> {
        vec![
            AgentConfig::new("random", PolicyKind::Random, AgentParameters::default()),
            AgentConfig::new(
                "weighted",
                PolicyKind::WeightedRandom,
                AgentParameters {
                    switch_ratio: Some(0.1),
                    ..Default::default()
                },
            ),
        ]
    }

    fn options(seed: u64) -> TournamentOptions {
        TournamentOptions {
            rounds: 3,
            threads: 2,
            seed: Some(seed),
            matches: MatchOptions::default(),
        }
    }

    #[test]
    fn test_players_cartesian() {
        let players = players(&configs(), &presets::entries()).unwrap();
        assert_eq!(players.len(), 6);
        assert_eq!(players[0].id, "random+electric");
        assert_eq!(players[5].id, "weighted+ground");
    }

    #[test]
    fn test_pairings_cover_everyone_once() {
        let players = players(&configs(), &presets::entries()[..2]).unwrap();
        let mut tournament = Tournament::new(&players[..3], options(1));
        let pairs = tournament.pairings().unwrap();
        assert_eq!(pairs.len(), 1);
        let (a, b) = pairs[0];
        assert_ne!(a, b);
    }

    #[test]
    fn test_pairings_follow_seeded_noise() {
        let players = players(&configs(), &presets::entries()).unwrap();
        let mut a = Tournament::new(&players, options(5));
        let mut b = Tournament::new(&players, options(5));

        let rounds: Vec<_> = (0..8).map(|_| a.pairings().unwrap()).collect();
        for pairs in &rounds {
            assert_eq!(*pairs, b.pairings().unwrap());
            assert_eq!(pairs.len(), 3);
        }
        assert!(rounds.iter().any(|pairs| *pairs != rounds[0]));
    }

    #[test]
    fn test_rating_sum_conserved() {
        let players = players(&configs(), &presets::entries()).unwrap();
        let ratings = Tournament::new(&players, options(7)).run(None).unwrap();
        let total: f64 = ratings.iter().map(|r| r.rate).sum();
        assert!((total - INITIAL_RATING * players.len() as f64).abs() < 1e-6);
    }

    #[test]
    fn test_reproducible_regardless_of_threads() {
        let players = players(&configs(), &presets::entries()).unwrap();
        let a = Tournament::new(&players, options(11)).run(None).unwrap();
        let mut single = options(11);
        single.threads = 1;
        let b = Tournament::new(&players, single).run(None).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_records_written_in_pairing_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.jsonl");
        let players = players(&configs(), &presets::entries()).unwrap();

        let mut opts = options(3);
        opts.rounds = 2;
        opts.matches.record = true;
        let mut writer = BattleLogWriter::open(&path).unwrap();
        Tournament::new(&players, opts).run(Some(&mut writer)).unwrap();

        let records = read_records(&path).unwrap();
        assert_eq!(records.len(), 6);
        assert!(records.iter().all(|r| !r.events.is_empty()));
    }
}
