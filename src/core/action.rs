//! Battle actions as submitted to the engine

use super::error::{Error, Result};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single choice for one side: use option N of the active unit, or switch
/// to party slot N. Slots are 1-based, matching the engine's command strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Action {
    Move(u8),
    Switch(u8),
}

impl Action {
    /// Engine command string, e.g. `"move 1"`
    pub fn key(&self) -> String {
        self.to_string()
    }

    pub fn is_switch(&self) -> bool {
        matches!(self, Action::Switch(_))
    }

    pub fn slot(&self) -> u8 {
        match self {
            Action::Move(n) | Action::Switch(n) => *n,
        }
    }

    /// Parse an optional action where `pass` means no action
    pub fn parse_optional(s: &str) -> Result<Option<Action>> {
        match s.trim() {
            "pass" => Ok(None),
            other => other.parse().map(Some),
        }
    }

    /// Render an optional action, `pass` for none
    pub fn optional_key(action: Option<Action>) -> String {
        action.map_or_else(|| "pass".to_string(), |a| a.key())
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Move(n) => write!(f, "move {}", n),
            Action::Switch(n) => write!(f, "switch {}", n),
        }
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split_whitespace();
        let (Some(kind), Some(slot), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(Error::Config(format!("malformed action: '{}'", s)));
        };

        let slot: u8 = slot
            .parse()
            .map_err(|_| Error::Config(format!("invalid slot in action: '{}'", s)))?;

        if slot == 0 {
            return Err(Error::Config(format!("slots are 1-based: '{}'", s)));
        }

        match kind {
            "move" => Ok(Action::Move(slot)),
            "switch" => Ok(Action::Switch(slot)),
            _ => Err(Error::Config(format!("unknown action kind: '{}'", s))),
        }
    }
}

impl TryFrom<String> for Action {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Action> for String {
    fn from(action: Action) -> Self {
        action.key()
    }
}
