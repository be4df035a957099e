//! Command line parsing

use anyhow::{bail, ensure, Result};
use pokeai::core::Action;
use std::path::PathBuf;

/// Trim a protocol line; blank lines and `#` comments yield nothing
pub fn parse_command(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() || input.starts_with('#') {
        return None;
    }
    Some(input.to_string())
}

/// Parse exactly two actions, each `move N`, `switch N` or `pass`
pub fn parse_action_pair(args: &[&str]) -> Result<(Option<Action>, Option<Action>)> {
    let mut actions = Vec::new();
    let mut i = 0;

    while i < args.len() {
        match args[i] {
            "pass" => {
                actions.push(None);
                i += 1;
            }
            kind @ ("move" | "switch") if i + 1 < args.len() => {
                actions.push(Some(format!("{} {}", kind, args[i + 1]).parse::<Action>()?));
                i += 2;
            }
            other => bail!("invalid action near '{}'", other),
        }
    }

    ensure!(actions.len() == 2, "expected one action per side, got {}", actions.len());
    Ok((actions[0], actions[1]))
}

/// Trailing `log <path>` argument
pub fn parse_log_path(args: &[&str]) -> Result<Option<PathBuf>> {
    match args {
        [] => Ok(None),
        ["log", path] => Ok(Some(PathBuf::from(path))),
        _ => bail!("expected 'log <path>', got '{}'", args.join(" ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("  isready \n"), Some("isready".to_string()));
        assert_eq!(parse_command("   "), None);
        assert_eq!(parse_command("# comment"), None);
    }

    #[test_case("move 1 switch 2", Some(Action::Move(1)), Some(Action::Switch(2)))]
    #[test_case("pass move 3", None, Some(Action::Move(3)))]
    #[test_case("switch 4 pass", Some(Action::Switch(4)), None)]
    fn test_action_pair(args: &str, p1: Option<Action>, p2: Option<Action>) {
        let parts: Vec<_> = args.split_whitespace().collect();
        assert_eq!(parse_action_pair(&parts).unwrap(), (p1, p2));
    }

    #[test_case("move 1"; "one action")]
    #[test_case("move 1 move 2 pass"; "three actions")]
    #[test_case("move 0 pass"; "zero slot")]
    #[test_case("attack 1 pass"; "unknown kind")]
    #[test_case("move"; "missing slot")]
    fn test_action_pair_rejects(args: &str) {
        let parts: Vec<_> = args.split_whitespace().collect();
        assert!(parse_action_pair(&parts).is_err());
    }

    #[test]
    fn test_log_path() {
        assert_eq!(parse_log_path(&[]).unwrap(), None);
        assert_eq!(parse_log_path(&["log", "a.jsonl"]).unwrap(), Some(PathBuf::from("a.jsonl")));
        assert!(parse_log_path(&["log"]).is_err());
    }
}
