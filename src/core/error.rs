//! Error types shared by the enumerator, the engine adapter and the policies

use super::{action::Action, side::Side};

use thiserror::Error;

/// Errors raised while enumerating, simulating or searching
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("illegal action '{action}' for {side}: {reason}")]
    IllegalAction {
        side: Side,
        action: Action,
        reason: String,
    },

    #[error("expansion requested on a node with no unvisited moves")]
    NoUnvisitedMoves,

    #[error("selection requested on a node without children")]
    NoChildren,

    #[error("neither side can act on turn {0}")]
    Stalled(u32),

    #[error("battle ended without a winner")]
    MissingWinner,

    #[error("failed to initialize battle: {0}")]
    Initialization(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("cannot encode playout: {0}")]
    Encoding(String),

    #[error("snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
