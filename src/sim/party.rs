//! Party format accepted by the built-in engine

use super::dex;
use crate::core::{Error, Result};

use serde::{Deserialize, Serialize};

pub const MAX_PARTY_SIZE: usize = 6;
pub const MAX_MOVES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub hp: u32,
    pub atk: u32,
    pub def: u32,
    pub spe: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSpec {
    pub name: String,
    pub species: String,
    pub level: u32,
    pub stats: Stats,
    pub moves: Vec<String>,
}

pub type Party = Vec<UnitSpec>;

/// Named party as stored in a party file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyEntry {
    #[serde(rename = "_id")]
    pub id: String,
    pub party: Party,
}

/// Structural validation performed when a battle starts
pub fn validate(party: &Party) -> Result<()> {
    if party.is_empty() || party.len() > MAX_PARTY_SIZE {
        return Err(Error::Initialization(format!(
            "party must have 1 to {} units, got {}",
            MAX_PARTY_SIZE,
            party.len()
        )));
    }

    for unit in party {
        if unit.moves.is_empty() || unit.moves.len() > MAX_MOVES {
            return Err(Error::Initialization(format!(
                "{} must know 1 to {} moves",
                unit.name, MAX_MOVES
            )));
        }
        if let Some(unknown) = unit.moves.iter().find(|m| dex::lookup(m).is_none()) {
            return Err(Error::Initialization(format!(
                "{} knows unknown move '{}'",
                unit.name, unknown
            )));
        }
        if !(1..=100).contains(&unit.level) {
            return Err(Error::Initialization(format!(
                "{} has invalid level {}",
                unit.name, unit.level
            )));
        }
        let Stats { hp, atk, def, spe } = unit.stats;
        if [hp, atk, def, spe].contains(&0) {
            return Err(Error::Initialization(format!("{} has a zero stat", unit.name)));
        }
    }

    Ok(())
}
