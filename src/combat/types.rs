use serde::{Deserialize, Serialize};

use crate::core::constants::*;

/// The four battle actions. Player and enemy share the same action set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Attack,
    Defend,
    Special,
    Heal,
}

impl ActionKind {
    pub const ALL: [ActionKind; 4] = [
        ActionKind::Attack,
        ActionKind::Defend,
        ActionKind::Special,
        ActionKind::Heal,
    ];

    /// Stable index into policy tables. Matches declaration order.
    pub fn index(self) -> usize {
        match self {
            ActionKind::Attack => 0,
            ActionKind::Defend => 1,
            ActionKind::Special => 2,
            ActionKind::Heal => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ActionKind::Attack => "Attack",
            ActionKind::Defend => "Defend",
            ActionKind::Special => "Special",
            ActionKind::Heal => "Heal",
        }
    }
}

/// Transient status flags carried by both combatants.
///
/// Bleed ticks down on the status schedule; stun is consumed the next time
/// the afflicted combatant's turn comes up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusFlags {
    pub stunned: bool,
    pub bleed_turns: u32,
}

impl StatusFlags {
    pub fn clear(&mut self) {
        self.stunned = false;
        self.bleed_turns = 0;
    }
}

/// Crit parameters exposed by a combatant that can land critical hits.
#[derive(Debug, Clone, Copy)]
pub struct CritProfile {
    pub chance: f64,
    pub multiplier: f64,
}

/// Common surface over the two combatant types.
///
/// Hit resolution and the status engine only see this trait, so they never
/// care which side of the board they are mutating. All mutation clamps to
/// `[0, max]`.
pub trait Combatant {
    fn hp(&self) -> u32;
    fn max_hp(&self) -> u32;
    fn mp(&self) -> u32;
    fn max_mp(&self) -> u32;
    fn defense(&self) -> u32;
    fn set_hp(&mut self, hp: u32);
    fn set_mp(&mut self, mp: u32);
    fn status(&self) -> &StatusFlags;
    fn status_mut(&mut self) -> &mut StatusFlags;

    /// Crit parameters, if this combatant can crit at all.
    fn crit(&self) -> Option<CritProfile> {
        None
    }

    fn is_alive(&self) -> bool {
        self.hp() > 0
    }

    fn take_damage(&mut self, amount: u32) {
        self.set_hp(self.hp().saturating_sub(amount));
    }

    /// Restores hp, capped at max. Returns the amount actually gained.
    fn restore_hp(&mut self, amount: u32) -> u32 {
        let gained = amount.min(self.max_hp() - self.hp());
        self.set_hp(self.hp() + gained);
        gained
    }

    fn gain_mp(&mut self, amount: u32) {
        self.set_mp((self.mp() + amount).min(self.max_mp()));
    }

    /// Spends mana. Callers check affordability first; this saturates rather
    /// than underflows if they don't.
    fn spend_mp(&mut self, amount: u32) {
        self.set_mp(self.mp().saturating_sub(amount));
    }
}

/// The player combatant. Max stats are fixed; the defense stat is derived
/// from the defense upgrade level via [`Player::apply_defense_upgrade`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub hp: u32,
    pub mp: u32,
    pub defense: u32,
    pub crit_chance: f64,
    pub crit_multiplier: f64,
    pub status: StatusFlags,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    pub fn new() -> Self {
        Self {
            hp: PLAYER_MAX_HP,
            mp: PLAYER_MAX_MP,
            defense: PLAYER_BASE_DEFENSE,
            crit_chance: PLAYER_BASE_CRIT_CHANCE,
            crit_multiplier: PLAYER_CRIT_MULTIPLIER,
            status: StatusFlags::default(),
        }
    }

    /// Recomputes defense from the defense upgrade level.
    pub fn apply_defense_upgrade(&mut self, level: u32) {
        self.defense = PLAYER_BASE_DEFENSE + level * DEFENSE_PER_UPGRADE_LEVEL;
    }

    /// Restores hp/mp to max and clears statuses for a fresh round.
    pub fn reset_for_round(&mut self) {
        self.hp = PLAYER_MAX_HP;
        self.mp = PLAYER_MAX_MP;
        self.status.clear();
    }
}

impl Combatant for Player {
    fn hp(&self) -> u32 {
        self.hp
    }
    fn max_hp(&self) -> u32 {
        PLAYER_MAX_HP
    }
    fn mp(&self) -> u32 {
        self.mp
    }
    fn max_mp(&self) -> u32 {
        PLAYER_MAX_MP
    }
    fn defense(&self) -> u32 {
        self.defense
    }
    fn set_hp(&mut self, hp: u32) {
        self.hp = hp.min(PLAYER_MAX_HP);
    }
    fn set_mp(&mut self, mp: u32) {
        self.mp = mp.min(PLAYER_MAX_MP);
    }
    fn status(&self) -> &StatusFlags {
        &self.status
    }
    fn status_mut(&mut self) -> &mut StatusFlags {
        &mut self.status
    }
    fn crit(&self) -> Option<CritProfile> {
        Some(CritProfile {
            chance: self.crit_chance,
            multiplier: self.crit_multiplier,
        })
    }
}

/// Identifier for the enemy difficulty tier in effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemplateId {
    Grunt,
    Bruiser,
    Enforcer,
    BossCore,
}

impl TemplateId {
    /// Selects the template for a cumulative player win count.
    pub fn for_wins(wins: u32) -> TemplateId {
        if wins < TIER_WIN_THRESHOLDS[0] {
            TemplateId::Grunt
        } else if wins < TIER_WIN_THRESHOLDS[1] {
            TemplateId::Bruiser
        } else if wins < TIER_WIN_THRESHOLDS[2] {
            TemplateId::Enforcer
        } else {
            TemplateId::BossCore
        }
    }

    pub fn template(self) -> &'static EnemyTemplate {
        match self {
            TemplateId::Grunt => &ENEMY_TEMPLATES[0],
            TemplateId::Bruiser => &ENEMY_TEMPLATES[1],
            TemplateId::Enforcer => &ENEMY_TEMPLATES[2],
            TemplateId::BossCore => &ENEMY_TEMPLATES[3],
        }
    }
}

/// Immutable per-tier stat template. Enemy stats reset to one of these only
/// when the win count crosses a tier threshold; within a tier, wins apply
/// flat increments instead.
#[derive(Debug, Clone, Copy)]
pub struct EnemyTemplate {
    pub max_hp: u32,
    pub max_mp: u32,
    pub defense: u32,
    pub iq_start: f64,
    pub tier: u8,
    pub name: &'static str,
}

pub const ENEMY_TEMPLATES: [EnemyTemplate; 4] = [
    EnemyTemplate {
        max_hp: 200,
        max_mp: 50,
        defense: 5,
        iq_start: 0.0,
        tier: 1,
        name: "Standard Grunt",
    },
    EnemyTemplate {
        max_hp: 350,
        max_mp: 80,
        defense: 15,
        iq_start: 20.0,
        tier: 2,
        name: "The Bruiser",
    },
    EnemyTemplate {
        max_hp: 500,
        max_mp: 120,
        defense: 25,
        iq_start: 40.0,
        tier: 3,
        name: "The Enforcer",
    },
    EnemyTemplate {
        max_hp: 1000,
        max_mp: 200,
        defense: 40,
        iq_start: 60.0,
        tier: 4,
        name: "The Adaptive Core",
    },
];

/// The enemy combatant. Max stats scale with wins and tier transitions;
/// intelligence drives the policy's exploration rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub hp: u32,
    pub max_hp: u32,
    pub mp: u32,
    pub max_mp: u32,
    pub defense: u32,
    pub intelligence: f64,
    pub template: TemplateId,
    pub status: StatusFlags,
}

impl Default for Enemy {
    fn default() -> Self {
        Self::from_template(TemplateId::Grunt)
    }
}

impl Enemy {
    pub fn from_template(id: TemplateId) -> Self {
        let t = id.template();
        Self {
            hp: t.max_hp,
            max_hp: t.max_hp,
            mp: t.max_mp,
            max_mp: t.max_mp,
            defense: t.defense,
            intelligence: t.iq_start,
            template: id,
            status: StatusFlags::default(),
        }
    }

    /// Swaps to a new tier template, resetting max stats, defense, and
    /// intelligence to the template baseline. Hp/mp snap to the new max.
    pub fn apply_template(&mut self, id: TemplateId) {
        let t = id.template();
        self.template = id;
        self.max_hp = t.max_hp;
        self.max_mp = t.max_mp;
        self.defense = t.defense;
        self.intelligence = t.iq_start;
        self.hp = t.max_hp;
        self.mp = t.max_mp;
    }

    pub fn adjust_intelligence(&mut self, delta: f64) {
        self.intelligence = (self.intelligence + delta).clamp(0.0, IQ_MAX);
    }

    /// Refills hp/mp to current max and clears statuses for a fresh round.
    pub fn reset_for_round(&mut self) {
        self.hp = self.max_hp;
        self.mp = self.max_mp;
        self.status.clear();
    }
}

impl Combatant for Enemy {
    fn hp(&self) -> u32 {
        self.hp
    }
    fn max_hp(&self) -> u32 {
        self.max_hp
    }
    fn mp(&self) -> u32 {
        self.mp
    }
    fn max_mp(&self) -> u32 {
        self.max_mp
    }
    fn defense(&self) -> u32 {
        self.defense
    }
    fn set_hp(&mut self, hp: u32) {
        self.hp = hp.min(self.max_hp);
    }
    fn set_mp(&mut self, mp: u32) {
        self.mp = mp.min(self.max_mp);
    }
    fn status(&self) -> &StatusFlags {
        &self.status
    }
    fn status_mut(&mut self) -> &mut StatusFlags {
        &mut self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_baseline() {
        let player = Player::new();
        assert_eq!(player.hp, PLAYER_MAX_HP);
        assert_eq!(player.mp, PLAYER_MAX_MP);
        assert_eq!(player.defense, PLAYER_BASE_DEFENSE);
        assert!(player.is_alive());
        assert!(player.crit().is_some());
    }

    #[test]
    fn test_enemy_has_no_crit_profile() {
        let enemy = Enemy::default();
        assert!(enemy.crit().is_none());
    }

    #[test]
    fn test_take_damage_no_underflow() {
        let mut enemy = Enemy::default();
        enemy.take_damage(enemy.max_hp + 500);
        assert_eq!(enemy.hp, 0);
        assert!(!enemy.is_alive());
    }

    #[test]
    fn test_set_hp_clamps_to_max() {
        let mut player = Player::new();
        player.set_hp(PLAYER_MAX_HP + 100);
        assert_eq!(player.hp, PLAYER_MAX_HP);

        let mut enemy = Enemy::default();
        enemy.set_hp(enemy.max_hp + 100);
        assert_eq!(enemy.hp, enemy.max_hp);
    }

    #[test]
    fn test_restore_hp_caps_at_max() {
        let mut player = Player::new();
        player.hp = 180;
        let gained = player.restore_hp(HEAL_AMOUNT);
        assert_eq!(gained, 20);
        assert_eq!(player.hp, PLAYER_MAX_HP);
    }

    #[test]
    fn test_gain_mp_clamps() {
        let mut enemy = Enemy::default();
        enemy.mp = enemy.max_mp - 2;
        enemy.gain_mp(10);
        assert_eq!(enemy.mp, enemy.max_mp);
    }

    #[test]
    fn test_template_for_wins_thresholds() {
        assert_eq!(TemplateId::for_wins(0), TemplateId::Grunt);
        assert_eq!(TemplateId::for_wins(2), TemplateId::Grunt);
        assert_eq!(TemplateId::for_wins(3), TemplateId::Bruiser);
        assert_eq!(TemplateId::for_wins(5), TemplateId::Bruiser);
        assert_eq!(TemplateId::for_wins(6), TemplateId::Enforcer);
        assert_eq!(TemplateId::for_wins(8), TemplateId::Enforcer);
        assert_eq!(TemplateId::for_wins(9), TemplateId::BossCore);
        assert_eq!(TemplateId::for_wins(42), TemplateId::BossCore);
    }

    #[test]
    fn test_apply_template_resets_stats() {
        let mut enemy = Enemy::default();
        enemy.max_hp = 600;
        enemy.defense = 30;
        enemy.intelligence = 55.0;
        enemy.hp = 12;

        enemy.apply_template(TemplateId::Bruiser);
        assert_eq!(enemy.template, TemplateId::Bruiser);
        assert_eq!(enemy.max_hp, 350);
        assert_eq!(enemy.max_mp, 80);
        assert_eq!(enemy.defense, 15);
        assert_eq!(enemy.intelligence, 20.0);
        assert_eq!(enemy.hp, 350);
        assert_eq!(enemy.mp, 80);
    }

    #[test]
    fn test_adjust_intelligence_clamps() {
        let mut enemy = Enemy::default();
        enemy.adjust_intelligence(-5.0);
        assert_eq!(enemy.intelligence, 0.0);
        enemy.adjust_intelligence(250.0);
        assert_eq!(enemy.intelligence, IQ_MAX);
    }

    #[test]
    fn test_reset_for_round_clears_status() {
        let mut enemy = Enemy::default();
        enemy.hp = 1;
        enemy.mp = 0;
        enemy.status.bleed_turns = 2;
        enemy.status.stunned = true;

        enemy.reset_for_round();
        assert_eq!(enemy.hp, enemy.max_hp);
        assert_eq!(enemy.mp, enemy.max_mp);
        assert_eq!(enemy.status, StatusFlags::default());
    }

    #[test]
    fn test_action_kind_index_order() {
        for (i, action) in ActionKind::ALL.iter().enumerate() {
            assert_eq!(action.index(), i);
        }
    }
}
