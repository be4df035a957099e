use log::warn;
use pokeai::Engine;
use std::io::{self, BufRead};
use std::process;

mod protocol;
use protocol::command::parse_command;
use protocol::handler::handle_command;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let stdin = io::stdin();
    let mut engine = Engine::new();

    for line in stdin.lock().lines() {
        let input = match line {
            Ok(input) => input,
            Err(err) => {
                eprintln!("Failed to read input: {}", err);
                process::exit(1);
            }
        };

        if let Some(cmd) = parse_command(&input) {
            match handle_command(&cmd, &mut engine) {
                Ok(true) => {}
                Ok(false) => break,
                Err(err) => {
                    if engine.options.strict_mode {
                        eprintln!("Error: {:#}", err);
                        process::exit(1);
                    } else {
                        warn!("ignored '{}': {:#}", cmd, err);
                    }
                }
            }
        }
    }
}
