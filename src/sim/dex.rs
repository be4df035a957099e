//! Static move data for the built-in engine

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveEffect {
    None,
    /// heals the user for half the damage dealt
    Drain,
    /// target cannot switch while both units stay in
    Trap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveData {
    pub id: &'static str,
    pub name: &'static str,
    pub power: u32,
    /// percent
    pub accuracy: u32,
    pub pp: u32,
    pub effect: MoveEffect,
}

const fn data(
    id: &'static str,
    name: &'static str,
    power: u32,
    accuracy: u32,
    pp: u32,
    effect: MoveEffect,
) -> MoveData {
    MoveData { id, name, power, accuracy, pp, effect }
}

/// Used when the active unit has no PP left
pub const STRUGGLE: MoveData = data("struggle", "Struggle", 50, 100, 1, MoveEffect::None);

const MOVES: &[MoveData] = &[
    data("tackle", "Tackle", 35, 95, 35, MoveEffect::None),
    data("bodyslam", "Body Slam", 85, 100, 15, MoveEffect::None),
    data("return", "Return", 102, 100, 20, MoveEffect::None),
    data("hyperbeam", "Hyper Beam", 150, 90, 5, MoveEffect::None),
    data("thunderbolt", "Thunderbolt", 95, 100, 15, MoveEffect::None),
    data("thunder", "Thunder", 120, 70, 10, MoveEffect::None),
    data("flamethrower", "Flamethrower", 95, 100, 15, MoveEffect::None),
    data("fireblast", "Fire Blast", 120, 85, 5, MoveEffect::None),
    data("surf", "Surf", 95, 100, 15, MoveEffect::None),
    data("bubblebeam", "Bubble Beam", 65, 100, 20, MoveEffect::None),
    data("hydropump", "Hydro Pump", 120, 80, 5, MoveEffect::None),
    data("earthquake", "Earthquake", 100, 100, 10, MoveEffect::None),
    data("rockslide", "Rock Slide", 75, 90, 10, MoveEffect::None),
    data("dynamicpunch", "Dynamic Punch", 100, 50, 5, MoveEffect::None),
    data("megadrain", "Mega Drain", 40, 100, 10, MoveEffect::Drain),
    data("gigadrain", "Giga Drain", 60, 100, 5, MoveEffect::Drain),
    data("wrap", "Wrap", 15, 85, 20, MoveEffect::Trap),
    data("meanlook", "Mean Look", 0, 100, 5, MoveEffect::Trap),
    data("splash", "Splash", 0, 100, 40, MoveEffect::None),
];

lazy_static! {
    static ref MOVE_INDEX: HashMap<&'static str, &'static MoveData> =
        MOVES.iter().map(|m| (m.id, m)).collect();
}

/// Normalise a move name to its id: lower-case alphanumerics only
pub fn to_id(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

pub fn lookup(name: &str) -> Option<&'static MoveData> {
    MOVE_INDEX.get(to_id(name).as_str()).copied()
}
