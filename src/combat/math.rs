//! Hit resolution shared by both sides of the board.
//!
//! A hit rolls the attacker's crit (if it has a crit profile), subtracts
//! half the defender's defense, floors, and always lands for at least 1
//! damage. The defender's hp is mutated here; callers get a report back
//! for the battle log.

use rand::Rng;

use crate::combat::types::Combatant;

/// What a resolved hit did.
#[derive(Debug, Clone, Copy)]
pub struct HitOutcome {
    pub damage: u32,
    pub was_crit: bool,
}

/// Resolves a single hit and applies it to the defender.
///
/// Base damage is real-valued because upgrade multipliers scale it before
/// resolution. Defense reduction is `defense / 2`, applied after the crit
/// multiplier; the floored result is clamped to a minimum of 1 so no amount
/// of defense reduces a hit to nothing.
pub fn resolve_hit<A, D>(
    attacker: &A,
    defender: &mut D,
    base_damage: f64,
    rng: &mut impl Rng,
) -> HitOutcome
where
    A: Combatant + ?Sized,
    D: Combatant + ?Sized,
{
    let mut damage = base_damage;
    let mut was_crit = false;

    if let Some(crit) = attacker.crit() {
        if rng.gen::<f64>() < crit.chance {
            damage *= crit.multiplier;
            was_crit = true;
        }
    }

    let reduction = defender.defense() as f64 / 2.0;
    let final_damage = ((damage - reduction).floor() as i64).max(1) as u32;

    defender.take_damage(final_damage);

    HitOutcome {
        damage: final_damage,
        was_crit,
    }
}
