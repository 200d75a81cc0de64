//! The learned action-value table.
//!
//! State is the player's most recent action; the value of each enemy
//! response is nudged toward the player hp it cost them. The table is
//! serialized with the rest of the session and zeroed whenever the enemy
//! moves to a new tier.

use serde::{Deserialize, Serialize};

use crate::combat::types::ActionKind;
use crate::core::constants::{AI_LEARNING_RATE, IQ_EXPLOIT_CAP, IQ_MAX};

const ACTION_COUNT: usize = ActionKind::ALL.len();

/// Action-value grid indexed by (last player action, enemy action).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyTable {
    q: [[f64; ACTION_COUNT]; ACTION_COUNT],
}

impl Default for PolicyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl PolicyTable {
    pub fn new() -> Self {
        Self {
            q: [[0.0; ACTION_COUNT]; ACTION_COUNT],
        }
    }

    pub fn score(&self, last_player: ActionKind, enemy_action: ActionKind) -> f64 {
        self.q[last_player.index()][enemy_action.index()]
    }

    /// Nudges the score for (last player action, chosen enemy action)
    /// toward the observed reward by the fixed learning rate.
    pub fn update(&mut self, last_player: ActionKind, enemy_action: ActionKind, reward: f64) {
        let cell = &mut self.q[last_player.index()][enemy_action.index()];
        *cell += AI_LEARNING_RATE * (reward - *cell);
    }

    /// Highest-scoring action among `legal`, ties broken by the order the
    /// candidates are given (callers pass them in declaration order).
    pub fn best_action(&self, last_player: ActionKind, legal: &[ActionKind]) -> Option<ActionKind> {
        let mut best: Option<(ActionKind, f64)> = None;
        for &action in legal {
            let score = self.score(last_player, action);
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((action, score)),
            }
        }
        best.map(|(action, _)| action)
    }

    /// Zeroes every score. Called on tier transitions and hard reset.
    pub fn reset(&mut self) {
        self.q = [[0.0; ACTION_COUNT]; ACTION_COUNT];
    }

    pub fn is_zeroed(&self) -> bool {
        self.q.iter().flatten().all(|&v| v == 0.0)
    }
}

/// Exploration probability as a function of enemy intelligence.
///
/// Fully trained (iq 100) still explores 10% of the time; an untrained
/// enemy explores always.
pub fn exploration_rate(intelligence: f64) -> f64 {
    1.0 - (intelligence / IQ_MAX).min(IQ_EXPLOIT_CAP)
}
