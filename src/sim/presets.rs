//! Ready-made parties for tests, benches and quick protocol sessions

use super::party::{Party, PartyEntry, Stats, UnitSpec};

pub fn unit(name: &str, stats: [u32; 4], moves: &[&str]) -> UnitSpec {
    let [hp, atk, def, spe] = stats;
    UnitSpec {
        name: name.to_lowercase(),
        species: name.to_string(),
        level: 50,
        stats: Stats { hp, atk, def, spe },
        moves: moves.iter().map(|m| m.to_string()).collect(),
    }
}

pub fn electric() -> Party {
    vec![
        unit("Raichu", [135, 110, 75, 120], &["thunderbolt", "bodyslam", "thunder", "megadrain"]),
        unit("Jolteon", [140, 85, 80, 150], &["thunderbolt", "return", "wrap"]),
        unit("Electrode", [130, 70, 90, 160], &["thunder", "hyperbeam"]),
    ]
}

pub fn water() -> Party {
    vec![
        unit("Lapras", [205, 105, 100, 80], &["surf", "bodyslam", "hydropump", "meanlook"]),
        unit("Octillery", [150, 125, 95, 65], &["bubblebeam", "flamethrower", "hyperbeam"]),
        unit("Starmie", [135, 95, 105, 135], &["surf", "thunderbolt", "megadrain"]),
    ]
}

pub fn ground() -> Party {
    vec![
        unit("Rhydon", [180, 150, 140, 60], &["earthquake", "rockslide", "bodyslam"]),
        unit("Granbull", [165, 140, 95, 65], &["dynamicpunch", "return", "thunderbolt", "earthquake"]),
    ]
}

pub fn entries() -> Vec<PartyEntry> {
    [("electric", electric()), ("water", water()), ("ground", ground())]
        .into_iter()
        .map(|(id, party)| PartyEntry {
            id: id.to_string(),
            party,
        })
        .collect()
}
