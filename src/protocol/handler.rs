//! Protocol command handling

use super::command::{parse_action_pair, parse_log_path};

use anyhow::{bail, ensure, Context, Result};
use pokeai::{
    core::{Action, Side},
    engine::{Engine, EngineOptions, SearchOptions},
};
use std::{
    io::{self, Write},
    path::Path,
};

fn winner_name(winner: Option<Side>) -> String {
    winner.map_or_else(|| "draw".to_string(), |side| side.to_string())
}

/// Handle one command. Returns `false` once the session should end.
pub fn handle_command(cmd: &str, engine: &mut Engine) -> Result<bool> {
    let parts: Vec<&str> = cmd.split_whitespace().collect();

    if parts.is_empty() {
        return Ok(true);
    }

    match parts[0] {
        "pokeai" => {
            println!("id name pokeai");
            for line in EngineOptions::describe() {
                println!("{}", line);
            }
            println!("pokeaiok");
        }
        "isready" => {
            println!("readyok");
        }
        "setoption" => {
            ensure!(
                parts.len() == 5 && parts[1] == "name" && parts[3] == "value",
                "invalid setoption command"
            );

            engine.set_option(parts[2], parts[4])?;
        }
        "parties" => {
            ensure!(parts.len() == 2, "parties command requires a path");
            let count = engine.load_parties(parts[1])?;
            println!("info parties {}", count);
        }
        "agents" => {
            ensure!(parts.len() == 2, "agents command requires a path");
            let count = engine.load_agents(parts[1])?;
            println!("info agents {}", count);
        }
        "position" => {
            let seed = match parts.len() {
                3 => None,
                5 if parts[3] == "seed" => Some(parts[4].parse().context("invalid seed")?),
                _ => bail!("usage: position <party> <party> [seed <n>]"),
            };

            engine.new_battle(parts[1], parts[2], seed)?;
            println!("turn {}", engine.state()?.turn());
        }
        "choose" => {
            let (p1, p2) = parse_action_pair(&parts[1..])?;
            for line in engine.choose(p1, p2)? {
                println!("log {}", line);
            }

            let state = engine.state()?;
            if state.is_ended() {
                println!("end {}", winner_name(state.winner()));
            } else {
                println!("turn {}", state.turn());
            }
        }
        "go" => {
            let args = parts[1..].join(" ");
            let search_options = args.parse::<SearchOptions>()?;

            let report = engine.go(&search_options)?;
            for rate in &report.winrates {
                let value = rate.winrate.map_or_else(|| "none".to_string(), |w| format!("{:.4}", w));
                println!("info winrate {} {}", rate.choice.action, value);
            }
            println!("info rollouts {} time {:.3}", report.rollouts, report.time);
            println!("bestaction {}", Action::optional_key(report.action));
        }
        "display" => {
            engine.display()?;
        }
        "log" => {
            for line in engine.state()?.event_log() {
                println!("log {}", line);
            }
        }
        "battle" => {
            ensure!(parts.len() >= 3, "usage: battle <player> <player> [log <path>]");
            let log = parse_log_path(&parts[3..])?;

            let result = engine.battle(parts[1], parts[2], log.as_deref())?;
            println!("result winner {} turns {}", winner_name(result.winner), result.turns);
        }
        "rate" => {
            ensure!(parts.len() >= 3, "usage: rate <rounds> <resultPath> [log <path>]");
            let rounds: u32 = parts[1].parse().context("invalid round count")?;
            let log = parse_log_path(&parts[3..])?;

            for rating in engine.rate(rounds, Path::new(parts[2]), log.as_deref())? {
                println!("rating {} {:.1}", rating.id, rating.rate);
            }
        }
        "quit" => {
            return Ok(false);
        }
        cmd => {
            bail!("Unknown command: {}", cmd);
        }
    }

    io::stdout().flush()?;
    Ok(true)
}
