//! Epsilon-greedy enemy action selection and the learning step.

use rand::Rng;

use crate::ai::policy::{exploration_rate, PolicyTable};
use crate::combat::types::{ActionKind, Enemy};
use crate::core::constants::{HEAL_COST, IQ_PER_LEARNING_UPDATE, SPECIAL_COST};

/// Actions the enemy can afford right now, in declaration order.
///
/// Special needs its mana cost; Heal needs its mana cost and a missing hp.
/// Attack and Defend are always available, so the set is never empty in
/// practice; [`decide`] still falls back to Defend if it ever were.
pub fn legal_actions(enemy: &Enemy) -> Vec<ActionKind> {
    ActionKind::ALL
        .iter()
        .copied()
        .filter(|action| match action {
            ActionKind::Special => enemy.mp >= SPECIAL_COST,
            ActionKind::Heal => enemy.mp >= HEAL_COST && enemy.hp < enemy.max_hp,
            _ => true,
        })
        .collect()
}

/// Picks the enemy's action for this turn.
///
/// Explores uniformly among legal actions when there is no recorded player
/// action yet, or with probability epsilon; otherwise exploits the best
/// known response to the player's last action.
pub fn decide(
    policy: &PolicyTable,
    enemy: &Enemy,
    last_player_action: Option<ActionKind>,
    rng: &mut impl Rng,
) -> ActionKind {
    let legal = legal_actions(enemy);
    if legal.is_empty() {
        return ActionKind::Defend;
    }

    let epsilon = exploration_rate(enemy.intelligence);
    match last_player_action {
        Some(last) if rng.gen::<f64>() >= epsilon => policy
            .best_action(last, &legal)
            .unwrap_or(ActionKind::Defend),
        _ => legal[rng.gen_range(0..legal.len())],
    }
}

/// Applies the learning step after the enemy's action resolved.
///
/// Reward is the hp the player lost over the exchange (negative if they
/// came out ahead). Each update also nudges intelligence up by a small
/// fixed amount; this is the only intelligence growth outside round
/// outcomes and win-based scaling.
pub fn record_outcome(
    policy: &mut PolicyTable,
    enemy: &mut Enemy,
    last_player_action: ActionKind,
    enemy_action: ActionKind,
    reward: f64,
) {
    policy.update(last_player_action, enemy_action, reward);
    enemy.adjust_intelligence(IQ_PER_LEARNING_UPDATE);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_special_excluded_without_mana() {
        let mut enemy = Enemy::default();
        enemy.mp = SPECIAL_COST - 1;
        enemy.hp = enemy.max_hp - 10;

        let legal = legal_actions(&enemy);
        assert!(!legal.contains(&ActionKind::Special));
        assert!(legal.contains(&ActionKind::Attack));
        assert!(legal.contains(&ActionKind::Defend));
        assert!(legal.contains(&ActionKind::Heal));
    }

    #[test]
    fn test_heal_excluded_at_full_hp() {
        let enemy = Enemy::default();
        let legal = legal_actions(&enemy);
        assert!(!legal.contains(&ActionKind::Heal));
    }

    #[test]
    fn test_heal_excluded_without_mana() {
        let mut enemy = Enemy::default();
        enemy.hp = enemy.max_hp - 10;
        enemy.mp = HEAL_COST - 1;

        let legal = legal_actions(&enemy);
        assert!(!legal.contains(&ActionKind::Heal));
        assert!(!legal.contains(&ActionKind::Special));
    }

    #[test]
    fn test_zero_mana_leaves_attack_and_defend() {
        let mut enemy = Enemy::default();
        enemy.mp = 0;
        enemy.hp = 1;

        let legal = legal_actions(&enemy);
        assert_eq!(legal, vec![ActionKind::Attack, ActionKind::Defend]);
    }

    #[test]
    fn test_decide_never_picks_illegal_special() {
        let mut enemy = Enemy::default();
        enemy.mp = 0;
        let policy = PolicyTable::new();
        let mut rng = ChaCha8Rng::seed_from_u64(99);

        for _ in 0..200 {
            let action = decide(&policy, &enemy, Some(ActionKind::Attack), &mut rng);
            assert_ne!(action, ActionKind::Special);
            assert_ne!(action, ActionKind::Heal); // full hp
        }
    }

    #[test]
    fn test_untrained_enemy_explores_all_legal_actions() {
        let mut enemy = Enemy::default();
        enemy.hp = enemy.max_hp - 50;
        assert_eq!(enemy.intelligence, 0.0); // epsilon = 1.0
        let policy = PolicyTable::new();
        let mut rng = ChaCha8Rng::seed_from_u64(4);

        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(decide(&policy, &enemy, Some(ActionKind::Attack), &mut rng));
        }
        assert_eq!(seen.len(), ActionKind::ALL.len());
    }

    #[test]
    fn test_trained_enemy_mostly_exploits() {
        let mut enemy = Enemy::default();
        enemy.intelligence = 100.0; // epsilon floor of 0.1
        let mut policy = PolicyTable::new();
        for _ in 0..20 {
            policy.update(ActionKind::Heal, ActionKind::Special, 40.0);
        }
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        let picks = (0..100)
            .filter(|_| {
                decide(&policy, &enemy, Some(ActionKind::Heal), &mut rng) == ActionKind::Special
            })
            .count();
        // Roughly 90% exploitation plus whatever exploration lands on it.
        assert!(picks > 60, "expected mostly Special, got {picks}/100");
    }

    #[test]
    fn test_first_turn_always_explores() {
        // With no recorded player action the policy row is unusable, so the
        // draw is uniform even for a fully trained enemy.
        let mut enemy = Enemy::default();
        enemy.intelligence = 100.0;
        let mut policy = PolicyTable::new();
        policy.update(ActionKind::Attack, ActionKind::Special, 100.0);
        let mut rng = ChaCha8Rng::seed_from_u64(23);

        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(decide(&policy, &enemy, None, &mut rng));
        }
        assert!(seen.len() > 1);
    }

    #[test]
    fn test_record_outcome_updates_policy_and_iq() {
        let mut enemy = Enemy::default();
        let mut policy = PolicyTable::new();

        record_outcome(
            &mut policy,
            &mut enemy,
            ActionKind::Attack,
            ActionKind::Special,
            20.0,
        );
        assert_eq!(policy.score(ActionKind::Attack, ActionKind::Special), 3.0);
        assert!((enemy.intelligence - IQ_PER_LEARNING_UPDATE).abs() < 1e-12);
    }

    #[test]
    fn test_record_outcome_iq_clamped_at_max() {
        let mut enemy = Enemy::default();
        enemy.intelligence = 100.0;
        let mut policy = PolicyTable::new();

        record_outcome(
            &mut policy,
            &mut enemy,
            ActionKind::Defend,
            ActionKind::Attack,
            5.0,
        );
        assert_eq!(enemy.intelligence, 100.0);
    }
}
