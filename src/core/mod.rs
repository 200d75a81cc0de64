//! Session state and tuning constants.

pub mod constants;
pub mod game_state;

pub use game_state::{upgrade_cost, GameState, Scores, UpgradeKind, Upgrades};
