//! Structured battle records, persisted one JSON object per line

use crate::ai::search_log::SearchLogEntry;
use crate::core::{Action, Request, Result, Side};
use crate::sim::Party;

use serde::{Deserialize, Serialize};
use std::{
    fs::{File, OpenOptions},
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceRecord {
    pub player: Side,
    pub request: Request,
    pub choice: Option<Action>,
    pub search_log: Vec<SearchLogEntry>,
    /// seconds spent deciding
    pub search_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BattleEvent {
    Update { update: Vec<String> },
    Choice { choice: ChoiceRecord },
}

impl BattleEvent {
    pub fn update(lines: &[String]) -> Self {
        BattleEvent::Update {
            update: lines.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord<P = Party> {
    pub player_id: String,
    pub party: P,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Players<P = Party> {
    pub p1: PlayerRecord<P>,
    pub p2: PlayerRecord<P>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleEnd {
    /// `"p1"`, `"p2"`, or empty for a draw
    pub winner: String,
}

impl BattleEnd {
    pub fn new(winner: Option<Side>) -> Self {
        Self {
            winner: winner.map(|s| s.id().to_string()).unwrap_or_default(),
        }
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner.parse().ok()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleRecord<P = Party> {
    pub agents: Players<P>,
    pub events: Vec<BattleEvent>,
    pub end: BattleEnd,
}

/// Append-only writer for battle records
pub struct BattleLogWriter {
    out: BufWriter<File>,
}

impl BattleLogWriter {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            out: BufWriter::new(file),
        })
    }

    pub fn append<P: Serialize>(&mut self, record: &BattleRecord<P>) -> Result<()> {
        serde_json::to_writer(&mut self.out, record)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}

pub fn read_records(path: impl AsRef<Path>) -> Result<Vec<BattleRecord>> {
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if !line.trim().is_empty() {
            records.push(serde_json::from_str(&line)?);
        }
    }
    Ok(records)
}
