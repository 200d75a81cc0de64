//! Time-based status effects.
//!
//! Bleed ticks on the recurring status schedule; stun is not ticked at all,
//! it is consumed when the stunned combatant's turn comes up.

use crate::combat::types::{Combatant, Enemy};
use crate::core::constants::BLEED_DAMAGE;

/// What one bleed tick did to the enemy.
#[derive(Debug, Clone, Copy)]
pub struct BleedTick {
    pub damage: u32,
    pub turns_remaining: u32,
}

/// Applies one status tick to the enemy. Returns `Some` only if state
/// changed, so the caller knows to run the termination check and save.
pub fn tick_enemy_status(enemy: &mut Enemy) -> Option<BleedTick> {
    if enemy.status.bleed_turns == 0 {
        return None;
    }

    enemy.take_damage(BLEED_DAMAGE);
    enemy.status.bleed_turns -= 1;

    Some(BleedTick {
        damage: BLEED_DAMAGE,
        turns_remaining: enemy.status.bleed_turns,
    })
}

/// Consumes a stun if one is pending: the flag clears and the turn is
/// forfeited. Returns whether a stun was consumed.
pub fn consume_stun<C: Combatant + ?Sized>(combatant: &mut C) -> bool {
    if combatant.status().stunned {
        combatant.status_mut().stunned = false;
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::types::Player;

    #[test]
    fn test_bleed_tick_damages_and_decrements() {
        let mut enemy = Enemy::default();
        enemy.status.bleed_turns = 3;
        let hp_before = enemy.hp;

        let tick = tick_enemy_status(&mut enemy).expect("bleed should tick");
        assert_eq!(tick.damage, BLEED_DAMAGE);
        assert_eq!(tick.turns_remaining, 2);
        assert_eq!(enemy.hp, hp_before - BLEED_DAMAGE);
    }

    #[test]
    fn test_bleed_noop_when_not_bleeding() {
        let mut enemy = Enemy::default();
        let hp_before = enemy.hp;

        assert!(tick_enemy_status(&mut enemy).is_none());
        assert_eq!(enemy.hp, hp_before);
    }

    #[test]
    fn test_bleed_clamps_hp_at_zero() {
        let mut enemy = Enemy::default();
        enemy.hp = 3;
        enemy.status.bleed_turns = 1;

        let tick = tick_enemy_status(&mut enemy).expect("bleed should tick");
        assert_eq!(tick.turns_remaining, 0);
        assert_eq!(enemy.hp, 0);
    }

    #[test]
    fn test_consume_stun_clears_flag_once() {
        let mut player = Player::new();
        player.status.stunned = true;

        assert!(consume_stun(&mut player));
        assert!(!player.status.stunned);
        assert!(!consume_stun(&mut player));
    }
}
