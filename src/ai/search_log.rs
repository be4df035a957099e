//! Optional search trace output passed into every policy

use crate::core::{Choice, Error, Result};

use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    #[default]
    Disabled = 0,
    /// root win rates only
    Info = 1,
    /// win rates plus the root snapshot and every encoded playout
    Verbose = 2,
}

impl FromStr for LogLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "0" | "disabled" => Ok(LogLevel::Disabled),
            "1" | "info" => Ok(LogLevel::Info),
            "2" | "verbose" => Ok(LogLevel::Verbose),
            _ => Err(Error::Config(format!("unknown log level: {}", s))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceWinRate {
    pub choice: Choice,
    /// `None` when the choice was never sampled
    pub winrate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum SearchLogEntry {
    #[serde(rename = "MC")]
    WinRates { winrates: Vec<ChoiceWinRate> },
    #[serde(rename = "MCTSTrace")]
    Playouts {
        /// serialized root battle
        root: String,
        /// one compact code per playout, see `ai::trace`
        playouts: Vec<String>,
    },
}

/// Sink for search traces. `enabled` gates everything, `level` picks detail.
pub trait SearchLog {
    fn enabled(&self) -> bool;

    fn level(&self) -> LogLevel;

    fn emit(&mut self, entry: SearchLogEntry);

    /// Called once per completed rollout
    fn on_rollout(&mut self) {}

    fn wants(&self, level: LogLevel) -> bool {
        self.enabled() && self.level() >= level
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLog;

impl SearchLog for NullLog {
    fn enabled(&self) -> bool {
        false
    }

    fn level(&self) -> LogLevel {
        LogLevel::Disabled
    }

    fn emit(&mut self, _: SearchLogEntry) {}
}

/// Collects entries in memory and counts rollouts
#[derive(Debug, Clone, Default)]
pub struct SearchTrace {
    pub level: LogLevel,
    pub entries: Vec<SearchLogEntry>,
    pub rollouts: u64,
}

impl SearchTrace {
    pub fn new(level: LogLevel) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }

    pub fn take_entries(&mut self) -> Vec<SearchLogEntry> {
        std::mem::take(&mut self.entries)
    }

    /// Win rates of the most recent summary entry
    pub fn last_winrates(&self) -> Option<&[ChoiceWinRate]> {
        self.entries.iter().rev().find_map(|entry| match entry {
            SearchLogEntry::WinRates { winrates } => Some(winrates.as_slice()),
            _ => None,
        })
    }
}

impl SearchLog for SearchTrace {
    fn enabled(&self) -> bool {
        self.level != LogLevel::Disabled
    }

    fn level(&self) -> LogLevel {
        self.level
    }

    fn emit(&mut self, entry: SearchLogEntry) {
        if self.enabled() {
            self.entries.push(entry);
        }
    }

    fn on_rollout(&mut self) {
        self.rollouts += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Action, ChoiceKind};
    use test_case::test_case;

    #[test_case("0", LogLevel::Disabled)]
    #[test_case("1", LogLevel::Info)]
    #[test_case("verbose", LogLevel::Verbose)]
    fn test_parse_level(s: &str, expected: LogLevel) {
        assert_eq!(s.parse::<LogLevel>().unwrap(), expected);
    }

    #[test]
    fn test_trace_gating() {
        let mut trace = SearchTrace::new(LogLevel::Info);
        assert!(trace.wants(LogLevel::Info));
        assert!(!trace.wants(LogLevel::Verbose));

        let mut disabled = SearchTrace::new(LogLevel::Disabled);
        disabled.emit(SearchLogEntry::WinRates { winrates: vec![] });
        assert!(disabled.entries.is_empty());

        trace.emit(SearchLogEntry::WinRates { winrates: vec![] });
        assert_eq!(trace.last_winrates().map(|w| w.len()), Some(0));
        assert!(!NullLog.wants(LogLevel::Info));
    }

    #[test]
    fn test_entry_wire_format() {
        let entry = SearchLogEntry::WinRates {
            winrates: vec![ChoiceWinRate {
                choice: Choice {
                    action: Action::Move(1),
                    kind: ChoiceKind::Move,
                    label: "Surf".into(),
                },
                winrate: Some(0.5),
            }],
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["type"], "MC");
        assert_eq!(value["payload"]["winrates"][0]["choice"]["key"], "move 1");
        assert_eq!(value["payload"]["winrates"][0]["choice"]["type"], "move");
        assert_eq!(value["payload"]["winrates"][0]["winrate"], 0.5);
    }
}
