//! Arena - adaptive turn-based battle engine.
//!
//! A player fights a scaling enemy whose action policy is learned from the
//! player's own habits. The engine here is presentation-free: it exposes
//! the session state, an event stream, and a cooperative clock; rendering
//! and page wiring live elsewhere.

pub mod ai;
pub mod combat;
pub mod core;
pub mod persistence;
pub mod round;

pub use crate::combat::types::ActionKind;
pub use crate::core::game_state::{GameState, UpgradeKind};
pub use crate::persistence::{HttpStore, MemoryStore, PersistedState, PlayerId, Store};
pub use crate::round::controller::{ActionError, BattleController, TurnPhase};
pub use crate::round::events::BattleEvent;
