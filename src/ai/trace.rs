//! One character per action encoding of search paths.
//!
//! A playout is written as its winner code followed by the actions taken along
//! the selection path: `a`..`d` for options 1-4, `A`..`F` for switches 1-6 and
//! `-` for a pass. Anything outside that alphabet is rejected.

use crate::core::{Action, Error, Result, Side};

const PASS: char = '-';
const MAX_MOVE_SLOT: u8 = 4;
const MAX_SWITCH_SLOT: u8 = 6;

fn encode_action(action: Option<Action>) -> Result<char> {
    match action {
        None => Ok(PASS),
        Some(Action::Move(n)) if (1..=MAX_MOVE_SLOT).contains(&n) => Ok((b'a' + n - 1) as char),
        Some(Action::Switch(n)) if (1..=MAX_SWITCH_SLOT).contains(&n) => Ok((b'A' + n - 1) as char),
        Some(other) => Err(Error::Encoding(format!("no code for action '{}'", other))),
    }
}

fn decode_action(c: char) -> Result<Option<Action>> {
    match c {
        PASS => Ok(None),
        'a'..='d' => Ok(Some(Action::Move(c as u8 - b'a' + 1))),
        'A'..='F' => Ok(Some(Action::Switch(c as u8 - b'A' + 1))),
        _ => Err(Error::Encoding(format!("unknown action code '{}'", c))),
    }
}

fn encode_winner(winner: Side) -> char {
    match winner {
        Side::P1 => '1',
        Side::P2 => '2',
    }
}

fn decode_winner(c: char) -> Result<Side> {
    match c {
        '1' => Ok(Side::P1),
        '2' => Ok(Side::P2),
        _ => Err(Error::Encoding(format!("unknown winner code '{}'", c))),
    }
}

pub fn encode(winner: Side, path: &[Option<Action>]) -> Result<String> {
    let mut out = String::with_capacity(path.len() + 1);
    out.push(encode_winner(winner));
    for &action in path {
        out.push(encode_action(action)?);
    }
    Ok(out)
}

pub fn decode(code: &str) -> Result<(Side, Vec<Option<Action>>)> {
    let mut chars = code.chars();
    let winner = chars
        .next()
        .ok_or_else(|| Error::Encoding("empty playout code".into()))
        .and_then(decode_winner)?;
    let path = chars.map(decode_action).collect::<Result<Vec<_>>>()?;
    Ok((winner, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_roundtrip_mixed_path() {
        let path = vec![Some(Action::Move(1)), Some(Action::Switch(3)), None];
        let code = encode(Side::P1, &path).unwrap();
        assert_eq!(code, "1aC-");
        assert_eq!(decode(&code).unwrap(), (Side::P1, path));
    }

    #[test_case(Action::Move(5); "fifth option")]
    #[test_case(Action::Switch(7); "seventh switch")]
    fn test_encode_rejects(action: Action) {
        let result = encode(Side::P2, &[Some(action)]);
        assert!(matches!(result, Err(Error::Encoding(_))));
    }

    #[test_case(""; "empty")]
    #[test_case("3a"; "bad winner")]
    #[test_case("1ae"; "bad option")]
    #[test_case("2G"; "bad switch")]
    fn test_decode_rejects(code: &str) {
        assert!(matches!(decode(code), Err(Error::Encoding(_))));
    }

    #[test]
    fn test_winner_only() {
        assert_eq!(decode("2").unwrap(), (Side::P2, vec![]));
    }
}
