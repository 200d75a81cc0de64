//! Events produced by the battle engine.
//!
//! The engine never touches a rendering surface; it reports everything that
//! happened as [`BattleEvent`] values and keeps a bounded, timestamped log
//! a presentation layer can show verbatim.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};

use crate::combat::types::TemplateId;
use crate::core::constants::BATTLE_LOG_CAPACITY;
use crate::core::game_state::UpgradeKind;

/// A single thing that happened during an exchange, tick, or transition.
///
/// Each variant carries a pre-formatted message for display alongside the
/// raw numbers a front end might want to animate.
#[derive(Debug, Clone)]
pub enum BattleEvent {
    PlayerAttack {
        damage: u32,
        was_crit: bool,
        message: String,
    },
    PlayerDefend {
        mana_gained: u32,
        message: String,
    },
    PlayerSpecial {
        damage: u32,
        was_crit: bool,
        inflicted_bleed: bool,
        message: String,
    },
    PlayerHeal {
        amount: u32,
        message: String,
    },
    /// Player's turn was forfeited to a pending stun.
    PlayerStunned {
        message: String,
    },
    EnemyAttack {
        damage: u32,
        message: String,
    },
    EnemyDefend {
        mana_gained: u32,
        message: String,
    },
    EnemySpecial {
        damage: u32,
        stunned_player: bool,
        message: String,
    },
    EnemyHeal {
        amount: u32,
        message: String,
    },
    /// Enemy's turn was forfeited to a pending stun.
    EnemyStunned {
        message: String,
    },
    BleedTick {
        damage: u32,
        turns_remaining: u32,
        message: String,
    },
    RoundWon {
        tokens_earned: u32,
        message: String,
    },
    RoundLost {
        message: String,
    },
    DoubleKo {
        message: String,
    },
    /// Within-tier stat growth after a win.
    EnemyScaled {
        max_hp: u32,
        defense: u32,
        message: String,
    },
    /// The enemy moved to a new tier template.
    TierChanged {
        template: TemplateId,
        message: String,
    },
    NewRound {
        message: String,
    },
    UpgradePurchased {
        kind: UpgradeKind,
        level: u32,
        cost: u32,
        message: String,
    },
    SessionRestored {
        message: String,
    },
    LoadFailed {
        message: String,
    },
    SaveFailed {
        message: String,
    },
    HardReset {
        message: String,
    },
}

impl BattleEvent {
    pub fn message(&self) -> &str {
        match self {
            BattleEvent::PlayerAttack { message, .. }
            | BattleEvent::PlayerDefend { message, .. }
            | BattleEvent::PlayerSpecial { message, .. }
            | BattleEvent::PlayerHeal { message, .. }
            | BattleEvent::PlayerStunned { message }
            | BattleEvent::EnemyAttack { message, .. }
            | BattleEvent::EnemyDefend { message, .. }
            | BattleEvent::EnemySpecial { message, .. }
            | BattleEvent::EnemyHeal { message, .. }
            | BattleEvent::EnemyStunned { message }
            | BattleEvent::BleedTick { message, .. }
            | BattleEvent::RoundWon { message, .. }
            | BattleEvent::RoundLost { message }
            | BattleEvent::DoubleKo { message }
            | BattleEvent::EnemyScaled { message, .. }
            | BattleEvent::TierChanged { message, .. }
            | BattleEvent::NewRound { message }
            | BattleEvent::UpgradePurchased { message, .. }
            | BattleEvent::SessionRestored { message }
            | BattleEvent::LoadFailed { message }
            | BattleEvent::SaveFailed { message }
            | BattleEvent::HardReset { message } => message,
        }
    }
}

/// One line of the battle log.
#[derive(Debug, Clone)]
pub struct BattleLogEntry {
    pub at: DateTime<Utc>,
    pub message: String,
}

/// Bounded battle log; oldest lines fall off the front.
#[derive(Debug, Default)]
pub struct BattleLog {
    entries: VecDeque<BattleLogEntry>,
}

impl BattleLog {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(BATTLE_LOG_CAPACITY),
        }
    }

    pub fn push(&mut self, message: String) {
        if self.entries.len() >= BATTLE_LOG_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(BattleLogEntry {
            at: Utc::now(),
            message,
        });
    }

    pub fn entries(&self) -> impl Iterator<Item = &BattleLogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
