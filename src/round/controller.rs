//! Round lifecycle, turn exchange, progression, and the token economy.

use std::error::Error;
use std::fmt;

use rand::Rng;

use crate::ai::decision::{decide, record_outcome};
use crate::combat::math::resolve_hit;
use crate::combat::status::{consume_stun, tick_enemy_status};
use crate::combat::types::{ActionKind, Combatant, TemplateId};
use crate::core::constants::*;
use crate::core::game_state::{upgrade_cost, GameState, Scores, UpgradeKind, Upgrades};
use crate::persistence::{PersistedState, PlayerId, Store};
use crate::round::events::{BattleEvent, BattleLog};
use crate::round::scheduler::{Scheduler, TaskKind};

/// Why a player input was rejected. A rejected input never mutates state
/// and never consumes the turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionError {
    InsufficientMana,
    AlreadyAtFullHealth,
    RoundOver,
    NotPlayersTurn,
    NotEnoughTokens,
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ActionError::InsufficientMana => "not enough mana",
            ActionError::AlreadyAtFullHealth => "hp is already full",
            ActionError::RoundOver => "the round is over",
            ActionError::NotPlayersTurn => "waiting on the enemy turn",
            ActionError::NotEnoughTokens => "not enough tokens",
        };
        f.write_str(msg)
    }
}

impl Error for ActionError {}

/// Whose move the controller is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    WaitingForPlayer,
    EnemyTurnQueued,
}

/// Owns the session and drives it: resolves player input, schedules and
/// resolves the enemy response, ticks regen and status effects, detects
/// round ends, and persists after every state-changing event.
pub struct BattleController {
    state: GameState,
    scheduler: Scheduler,
    phase: TurnPhase,
    player_id: PlayerId,
    store: Option<Box<dyn Store>>,
    log: BattleLog,
}

impl BattleController {
    /// Fresh session at baseline with the regen and status schedules armed.
    pub fn new(player_id: PlayerId) -> Self {
        let mut controller = Self {
            state: GameState::new(),
            scheduler: Scheduler::new(),
            phase: TurnPhase::WaitingForPlayer,
            player_id,
            store: None,
            log: BattleLog::new(),
        };
        controller.arm_recurring();
        controller
    }

    /// Attaches a persistence backend and restores any saved session.
    /// A failed or empty load leaves the baseline session in place.
    pub fn attach_store(&mut self, store: Box<dyn Store>) -> Vec<BattleEvent> {
        let mut events = Vec::new();
        match store.load(&self.player_id) {
            Ok(Some(payload)) => {
                self.state = payload.restore();
                let name = self.state.enemy.template.template().name;
                self.emit(
                    &mut events,
                    BattleEvent::SessionRestored {
                        message: format!("Session restored. Current foe: {name}"),
                    },
                );
            }
            Ok(None) => {}
            Err(e) => {
                self.emit(
                    &mut events,
                    BattleEvent::LoadFailed {
                        message: format!("Load failed ({e}), starting from defaults"),
                    },
                );
            }
        }
        self.store = Some(store);
        events
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn player_id(&self) -> &PlayerId {
        &self.player_id
    }

    pub fn log(&self) -> &BattleLog {
        &self.log
    }

    pub fn now(&self) -> f64 {
        self.scheduler.now()
    }

    /// Resolves one player input.
    ///
    /// A pending stun forfeits the turn instead (that is a successful
    /// submission, not an error). On success the action is recorded for
    /// the policy, the termination check and save run, and the enemy turn
    /// is queued unless the round just ended.
    pub fn submit_action(
        &mut self,
        action: ActionKind,
        rng: &mut impl Rng,
    ) -> Result<Vec<BattleEvent>, ActionError> {
        if self.state.round_over {
            return Err(ActionError::RoundOver);
        }
        if self.phase != TurnPhase::WaitingForPlayer {
            return Err(ActionError::NotPlayersTurn);
        }

        let mut events = Vec::new();

        if consume_stun(&mut self.state.player) {
            self.emit(
                &mut events,
                BattleEvent::PlayerStunned {
                    message: "Player is stunned and forfeits the turn".to_string(),
                },
            );
            self.queue_enemy_turn();
            return Ok(events);
        }

        match action {
            ActionKind::Attack => {
                let roll = rng.gen_range(PLAYER_ATTACK_DAMAGE.0..=PLAYER_ATTACK_DAMAGE.1);
                let base = roll as f64 * (1.0 + self.state.upgrades.attack as f64 / 100.0);
                let outcome = resolve_hit(&self.state.player, &mut self.state.enemy, base, rng);
                let message = if outcome.was_crit {
                    format!("CRIT! Player attacks the enemy for {} damage", outcome.damage)
                } else {
                    format!("Player attacks the enemy for {} damage", outcome.damage)
                };
                self.emit(
                    &mut events,
                    BattleEvent::PlayerAttack {
                        damage: outcome.damage,
                        was_crit: outcome.was_crit,
                        message,
                    },
                );
            }
            ActionKind::Defend => {
                self.state.player.gain_mp(DEFEND_MANA_GAIN);
                self.emit(
                    &mut events,
                    BattleEvent::PlayerDefend {
                        mana_gained: DEFEND_MANA_GAIN,
                        message: format!("Player defends and regains {DEFEND_MANA_GAIN} MP"),
                    },
                );
            }
            ActionKind::Special => {
                if self.state.player.mp < SPECIAL_COST {
                    return Err(ActionError::InsufficientMana);
                }
                self.state.player.spend_mp(SPECIAL_COST);
                let roll = rng.gen_range(PLAYER_SPECIAL_DAMAGE.0..=PLAYER_SPECIAL_DAMAGE.1);
                let base = roll as f64
                    * SPECIAL_UPGRADE_MULTIPLIER.powi(self.state.upgrades.special as i32);
                let outcome = resolve_hit(&self.state.player, &mut self.state.enemy, base, rng);
                let inflicted_bleed = rng.gen::<f64>() < BLEED_PROC_CHANCE;
                if inflicted_bleed {
                    self.state.enemy.status.bleed_turns = BLEED_DURATION;
                }
                let mut message = if outcome.was_crit {
                    format!("CRIT! Player unleashes a special for {} damage", outcome.damage)
                } else {
                    format!("Player unleashes a special for {} damage", outcome.damage)
                };
                if inflicted_bleed {
                    message.push_str(". The enemy is bleeding!");
                }
                self.emit(
                    &mut events,
                    BattleEvent::PlayerSpecial {
                        damage: outcome.damage,
                        was_crit: outcome.was_crit,
                        inflicted_bleed,
                        message,
                    },
                );
            }
            ActionKind::Heal => {
                if self.state.player.hp >= PLAYER_MAX_HP {
                    return Err(ActionError::AlreadyAtFullHealth);
                }
                if self.state.player.mp < HEAL_COST {
                    return Err(ActionError::InsufficientMana);
                }
                self.state.player.spend_mp(HEAL_COST);
                let amount = self.state.player.restore_hp(HEAL_AMOUNT);
                self.emit(
                    &mut events,
                    BattleEvent::PlayerHeal {
                        amount,
                        message: format!("Player heals {amount} HP"),
                    },
                );
            }
        }

        self.state.last_player_action = Some(action);
        self.check_end(&mut events, rng);
        self.save(&mut events);
        if !self.state.round_over {
            self.queue_enemy_turn();
        }
        Ok(events)
    }

    /// Advances the clock, resolving every scheduled task that comes due:
    /// the queued enemy turn, mana regen, status ticks, and the pause
    /// before a new round.
    pub fn advance(&mut self, dt: f64, rng: &mut impl Rng) -> Vec<BattleEvent> {
        let mut events = Vec::new();
        let deadline = self.scheduler.now() + dt;
        while let Some(task) = self.scheduler.poll(deadline) {
            match task {
                TaskKind::EnemyTurn => self.enemy_turn(&mut events, rng),
                TaskKind::ManaRegen => self.regen_tick(),
                TaskKind::StatusTick => self.status_tick(&mut events, rng),
                TaskKind::RoundTransition => self.new_round(&mut events),
            }
        }
        events
    }

    /// Buys the next level of an upgrade track with wallet tokens.
    pub fn purchase_upgrade(
        &mut self,
        kind: UpgradeKind,
    ) -> Result<Vec<BattleEvent>, ActionError> {
        let cost = upgrade_cost(kind, self.state.upgrades.level(kind));
        if self.state.wallet_tokens < cost {
            return Err(ActionError::NotEnoughTokens);
        }

        let mut events = Vec::new();
        self.state.wallet_tokens -= cost;
        *self.state.upgrades.level_mut(kind) += 1;
        self.state.apply_upgrades();
        let level = self.state.upgrades.level(kind);
        self.emit(
            &mut events,
            BattleEvent::UpgradePurchased {
                kind,
                level,
                cost,
                message: format!(
                    "{} upgraded to level {level} for {cost} tokens",
                    kind.name()
                ),
            },
        );
        self.save(&mut events);
        Ok(events)
    }

    /// Zeroes all progression and starts a fresh round immediately.
    pub fn hard_reset(&mut self) -> Vec<BattleEvent> {
        let mut events = Vec::new();

        self.state.scores = Scores::default();
        self.state.wallet_tokens = STARTING_TOKENS;
        self.state.upgrades = Upgrades::default();
        self.state.enemy.apply_template(TemplateId::Grunt);
        self.state.policy.reset();
        self.state.apply_upgrades();

        // Nothing queued before the reset may fire into the fresh session.
        self.scheduler.clear();

        self.emit(
            &mut events,
            BattleEvent::HardReset {
                message: "Hard reset: tokens, upgrades, and enemy memory cleared".to_string(),
            },
        );
        self.save(&mut events);
        self.new_round(&mut events);
        events
    }

    fn queue_enemy_turn(&mut self) {
        self.scheduler
            .schedule_once(TaskKind::EnemyTurn, ENEMY_TURN_DELAY_SECONDS);
        self.phase = TurnPhase::EnemyTurnQueued;
    }

    fn enemy_turn(&mut self, events: &mut Vec<BattleEvent>, rng: &mut impl Rng) {
        if self.state.round_over || self.phase != TurnPhase::EnemyTurnQueued {
            return;
        }
        self.phase = TurnPhase::WaitingForPlayer;

        if consume_stun(&mut self.state.enemy) {
            self.emit(
                events,
                BattleEvent::EnemyStunned {
                    message: "Enemy is stunned and forfeits the turn".to_string(),
                },
            );
            return;
        }

        let hp_before = self.state.player.hp;
        let last = self.state.last_player_action;
        let action = decide(&self.state.policy, &self.state.enemy, last, rng);

        match action {
            ActionKind::Attack => {
                let roll = rng.gen_range(ENEMY_ATTACK_DAMAGE.0..=ENEMY_ATTACK_DAMAGE.1);
                let outcome =
                    resolve_hit(&self.state.enemy, &mut self.state.player, roll as f64, rng);
                self.emit(
                    events,
                    BattleEvent::EnemyAttack {
                        damage: outcome.damage,
                        message: format!("Enemy attacks the player for {} damage", outcome.damage),
                    },
                );
            }
            ActionKind::Defend => {
                self.state.enemy.gain_mp(DEFEND_MANA_GAIN);
                self.emit(
                    events,
                    BattleEvent::EnemyDefend {
                        mana_gained: DEFEND_MANA_GAIN,
                        message: format!("Enemy defends and regains {DEFEND_MANA_GAIN} MP"),
                    },
                );
            }
            ActionKind::Special => {
                self.state.enemy.spend_mp(SPECIAL_COST);
                let roll = rng.gen_range(ENEMY_SPECIAL_DAMAGE.0..=ENEMY_SPECIAL_DAMAGE.1);
                let outcome =
                    resolve_hit(&self.state.enemy, &mut self.state.player, roll as f64, rng);
                let stunned_player = rng.gen::<f64>() < STUN_PROC_CHANCE;
                if stunned_player {
                    self.state.player.status.stunned = true;
                }
                let mut message =
                    format!("Enemy unleashes a special for {} damage", outcome.damage);
                if stunned_player {
                    message.push_str(". The player is stunned!");
                }
                self.emit(
                    events,
                    BattleEvent::EnemySpecial {
                        damage: outcome.damage,
                        stunned_player,
                        message,
                    },
                );
            }
            ActionKind::Heal => {
                self.state.enemy.spend_mp(HEAL_COST);
                let amount = self.state.enemy.restore_hp(HEAL_AMOUNT);
                self.emit(
                    events,
                    BattleEvent::EnemyHeal {
                        amount,
                        message: format!("Enemy heals {amount} HP"),
                    },
                );
            }
        }

        let reward = hp_before as f64 - self.state.player.hp as f64;
        if let Some(last) = last {
            record_outcome(
                &mut self.state.policy,
                &mut self.state.enemy,
                last,
                action,
                reward,
            );
        }

        self.check_end(events, rng);
        self.save(events);
    }

    fn regen_tick(&mut self) {
        let player_regen = MP_REGEN_PER_TICK + self.state.upgrades.passive_regen;
        self.state.player.gain_mp(player_regen);
        self.state.enemy.gain_mp(MP_REGEN_PER_TICK);
    }

    fn status_tick(&mut self, events: &mut Vec<BattleEvent>, rng: &mut impl Rng) {
        if let Some(tick) = tick_enemy_status(&mut self.state.enemy) {
            self.emit(
                events,
                BattleEvent::BleedTick {
                    damage: tick.damage,
                    turns_remaining: tick.turns_remaining,
                    message: format!("Enemy takes {} damage from bleed", tick.damage),
                },
            );
            self.check_end(events, rng);
            self.save(events);
        }
    }

    fn check_end(&mut self, events: &mut Vec<BattleEvent>, rng: &mut impl Rng) {
        if self.state.round_over {
            return;
        }
        let player_down = self.state.player.hp == 0;
        let enemy_down = self.state.enemy.hp == 0;
        if !player_down && !enemy_down {
            return;
        }

        self.state.round_over = true;
        self.scheduler.cancel_recurring();

        if player_down && enemy_down {
            self.state.enemy.adjust_intelligence(IQ_DOUBLE_KO_BONUS);
            self.emit(
                events,
                BattleEvent::DoubleKo {
                    message: "Double KO! No winner this round".to_string(),
                },
            );
        } else if enemy_down {
            self.state.scores.player_wins += 1;
            self.state.scores.score += WIN_SCORE;
            let tokens_earned = WIN_TOKEN_BASE + rng.gen_range(0..=WIN_TOKEN_BONUS_MAX);
            self.state.wallet_tokens += tokens_earned;
            self.emit(
                events,
                BattleEvent::RoundWon {
                    tokens_earned,
                    message: format!("Player wins the round and earns {tokens_earned} tokens"),
                },
            );
            self.scale_enemy_after_win(events);
        } else {
            self.state.scores.enemy_wins += 1;
            self.state.scores.score = self.state.scores.score.saturating_sub(LOSS_SCORE_PENALTY);
            self.state.enemy.adjust_intelligence(-IQ_LOSS_PENALTY);
            self.emit(
                events,
                BattleEvent::RoundLost {
                    message: "Enemy wins the round".to_string(),
                },
            );
        }

        self.scheduler
            .schedule_once(TaskKind::RoundTransition, ROUND_TRANSITION_SECONDS);
    }

    /// Within-tier growth after a player win. At a tier threshold the
    /// increments are skipped; the template swap itself happens when the
    /// next round starts.
    fn scale_enemy_after_win(&mut self, events: &mut Vec<BattleEvent>) {
        let wins = self.state.scores.player_wins;
        if !TIER_WIN_THRESHOLDS.contains(&wins) {
            self.state.enemy.adjust_intelligence(IQ_PER_WIN);
            self.state.enemy.max_hp += WIN_SCALING_MAX_HP;
            self.state.enemy.max_mp += WIN_SCALING_MAX_MP;
            self.state.enemy.defense += WIN_SCALING_DEFENSE;
            let (max_hp, defense) = (self.state.enemy.max_hp, self.state.enemy.defense);
            self.emit(
                events,
                BattleEvent::EnemyScaled {
                    max_hp,
                    defense,
                    message: format!(
                        "Enemy grows stronger: {max_hp} max HP, {defense} defense"
                    ),
                },
            );
        }

        // Refill to (possibly just increased) max for the coming round.
        self.state.enemy.hp = self.state.enemy.max_hp;
        self.state.enemy.mp = self.state.enemy.max_mp;
    }

    fn new_round(&mut self, events: &mut Vec<BattleEvent>) {
        let target = TemplateId::for_wins(self.state.scores.player_wins);
        if target != self.state.enemy.template {
            self.state.enemy.apply_template(target);
            self.state.policy.reset();
            let t = target.template();
            self.emit(
                events,
                BattleEvent::TierChanged {
                    template: target,
                    message: format!("A new foe appears: {} (tier {})", t.name, t.tier),
                },
            );
        }

        self.state.player.reset_for_round();
        self.state.enemy.reset_for_round();
        self.state.last_player_action = None;
        self.state.round_over = false;
        self.phase = TurnPhase::WaitingForPlayer;
        self.scheduler.cancel(TaskKind::EnemyTurn);
        self.arm_recurring();

        self.emit(
            events,
            BattleEvent::NewRound {
                message: "A new round begins".to_string(),
            },
        );
        self.save(events);
    }

    fn arm_recurring(&mut self) {
        self.scheduler
            .schedule_every(TaskKind::ManaRegen, MANA_REGEN_INTERVAL_SECONDS);
        self.scheduler
            .schedule_every(TaskKind::StatusTick, STATUS_TICK_INTERVAL_SECONDS);
    }

    /// Fire-and-forget save. Failures are reported and otherwise ignored.
    fn save(&mut self, events: &mut Vec<BattleEvent>) {
        let result = match &self.store {
            None => return,
            Some(store) => store.save(&self.player_id, &PersistedState::capture(&self.state)),
        };
        if let Err(e) = result {
            self.emit(
                events,
                BattleEvent::SaveFailed {
                    message: format!("Save failed: {e}"),
                },
            );
        }
    }

    fn emit(&mut self, events: &mut Vec<BattleEvent>, event: BattleEvent) {
        self.log.push(event.message().to_string());
        events.push(event);
    }
}
