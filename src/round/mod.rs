//! Round lifecycle: the controller, its scheduler, and the event stream.

pub mod controller;
pub mod events;
pub mod scheduler;

pub use controller::{ActionError, BattleController, TurnPhase};
pub use events::{BattleEvent, BattleLog, BattleLogEntry};
pub use scheduler::{Scheduler, TaskKind};
