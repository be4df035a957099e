//! Skill ratings from repeated battles between agents

pub mod elo;
pub mod tournament;

pub use tournament::{play_match, players, MatchOptions, Player, Rating, Tournament, TournamentOptions};
