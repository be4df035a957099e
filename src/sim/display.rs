use super::battle::{Battle, UnitState};
use crate::core::Side;
use crate::game::Simulator;

use colored::{ColoredString, Colorize};
use std::fmt;

const BAR_WIDTH: u32 = 20;

fn hp_bar(unit: &UnitState) -> ColoredString {
    let filled = (unit.hp * BAR_WIDTH).div_ceil(unit.max_hp.max(1));
    let bar = format!(
        "{}{}",
        "#".repeat(filled as usize),
        "-".repeat((BAR_WIDTH - filled) as usize)
    );

    match unit.hp * 4 / unit.max_hp.max(1) {
        0 => bar.red(),
        1 => bar.yellow(),
        _ => bar.green(),
    }
}

fn side_label(side: Side) -> ColoredString {
    match side {
        Side::P1 => side.id().bright_blue(),
        Side::P2 => side.id().bright_red(),
    }
}

impl fmt::Display for Battle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Turn {}", self.turn())?;

        for (side, state) in self.sides().sides() {
            let mut header = format!("{} ({}/{} left)", side_label(side), state.remaining(), state.units.len());
            if state.trapped {
                header.push_str(&format!(" {}", "trapped".magenta()));
            }
            writeln!(f, "{}", header)?;

            for (i, unit) in state.units.iter().enumerate() {
                let marker = if i == state.active { "*" } else { " " };
                let name = if unit.fainted() {
                    unit.species.dimmed()
                } else {
                    unit.species.normal()
                };
                writeln!(f, " {} {:<12} [{}] {}", marker, name, hp_bar(unit), unit.condition())?;

                if i == state.active {
                    for m in &unit.moves {
                        writeln!(f, "     {:<14} {}/{}", m.name, m.pp, m.max_pp)?;
                    }
                }
            }
        }

        if self.ended() {
            match self.winner() {
                Some(side) => writeln!(f, "Winner: {}", side_label(side))?,
                None => writeln!(f, "Draw")?,
            }
        }

        Ok(())
    }
}
