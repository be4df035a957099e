//! Action selection: baseline policies, playouts and the two search strategies
pub mod flat_mc;
pub mod mcts;
pub mod playout;
pub mod policy;
pub mod random;
pub mod search_log;
pub mod trace;

// Re-export key types
pub use flat_mc::FlatMonteCarlo;
pub use mcts::Mcts;
pub use playout::{playout, rollout, PlayoutOptions, PlayoutResult, MAX_TURNS};
pub use policy::{Agent, AgentConfig, AgentParameters, Policy, PolicyKind};
pub use random::{RandomPolicy, WeightedRandom};
pub use search_log::{LogLevel, NullLog, SearchLog, SearchLogEntry, SearchTrace};
