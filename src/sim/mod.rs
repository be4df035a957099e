//! Built-in deterministic battle engine

pub mod battle;
pub mod dex;
pub mod display;
pub mod party;
pub mod presets;

pub use battle::Battle;
pub use party::{Party, PartyEntry, Stats, UnitSpec};
