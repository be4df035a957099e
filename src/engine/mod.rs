mod engine;
mod options;
mod search;

pub use engine::{default_agents, Engine};
pub use options::EngineOptions;
pub use search::{SearchOptions, SearchReport};
