use serde::{Deserialize, Serialize};

use crate::ai::policy::PolicyTable;
use crate::combat::types::{ActionKind, Enemy, Player};
use crate::core::constants::*;

/// Win counters and the composite score shown on the scoreboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores {
    pub player_wins: u32,
    pub enemy_wins: u32,
    pub score: u32,
}

/// The four permanent upgrade tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpgradeKind {
    Attack,
    Special,
    Defense,
    PassiveRegen,
}

impl UpgradeKind {
    pub const ALL: [UpgradeKind; 4] = [
        UpgradeKind::Attack,
        UpgradeKind::Special,
        UpgradeKind::Defense,
        UpgradeKind::PassiveRegen,
    ];

    pub fn name(self) -> &'static str {
        match self {
            UpgradeKind::Attack => "Attack",
            UpgradeKind::Special => "Special",
            UpgradeKind::Defense => "Defense",
            UpgradeKind::PassiveRegen => "Passive Regen",
        }
    }

    fn base_cost(self) -> u32 {
        match self {
            UpgradeKind::Attack => UPGRADE_ATTACK_BASE_COST,
            UpgradeKind::Special => UPGRADE_SPECIAL_BASE_COST,
            UpgradeKind::Defense => UPGRADE_DEFENSE_BASE_COST,
            UpgradeKind::PassiveRegen => UPGRADE_REGEN_BASE_COST,
        }
    }
}

/// Purchased upgrade levels. All start at zero and survive every round;
/// only a hard reset clears them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Upgrades {
    pub attack: u32,
    pub special: u32,
    pub defense: u32,
    pub passive_regen: u32,
}

impl Upgrades {
    pub fn level(&self, kind: UpgradeKind) -> u32 {
        match kind {
            UpgradeKind::Attack => self.attack,
            UpgradeKind::Special => self.special,
            UpgradeKind::Defense => self.defense,
            UpgradeKind::PassiveRegen => self.passive_regen,
        }
    }

    pub fn level_mut(&mut self, kind: UpgradeKind) -> &mut u32 {
        match kind {
            UpgradeKind::Attack => &mut self.attack,
            UpgradeKind::Special => &mut self.special,
            UpgradeKind::Defense => &mut self.defense,
            UpgradeKind::PassiveRegen => &mut self.passive_regen,
        }
    }
}

/// Token price of the next level of an upgrade track.
pub fn upgrade_cost(kind: UpgradeKind, current_level: u32) -> u32 {
    kind.base_cost() * (current_level + 1)
}

/// The whole battle session: combatants, economy, learned policy, and the
/// round bookkeeping. Owned and mutated exclusively by the controller;
/// other components receive only the slices they need.
#[derive(Debug, Clone)]
pub struct GameState {
    pub scores: Scores,
    pub wallet_tokens: u32,
    pub player: Player,
    pub enemy: Enemy,
    pub upgrades: Upgrades,
    pub policy: PolicyTable,
    pub last_player_action: Option<ActionKind>,
    pub round_over: bool,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// A fresh session at baseline: full stats, starting tokens, untrained
    /// enemy at the first tier.
    pub fn new() -> Self {
        Self {
            scores: Scores::default(),
            wallet_tokens: STARTING_TOKENS,
            player: Player::new(),
            enemy: Enemy::default(),
            upgrades: Upgrades::default(),
            policy: PolicyTable::new(),
            last_player_action: None,
            round_over: false,
        }
    }

    /// Recomputes the player stats that derive from upgrade levels.
    pub fn apply_upgrades(&mut self) {
        self.player.apply_defense_upgrade(self.upgrades.defense);
    }
}
