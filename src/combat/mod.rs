//! Combatants, hit resolution, and status effects.

pub mod math;
pub mod status;
pub mod types;

pub use math::{resolve_hit, HitOutcome};
pub use status::{consume_stun, tick_enemy_status, BleedTick};
pub use types::{
    ActionKind, Combatant, CritProfile, Enemy, EnemyTemplate, Player, StatusFlags, TemplateId,
    ENEMY_TEMPLATES,
};
