// Player base stats
pub const PLAYER_MAX_HP: u32 = 200;
pub const PLAYER_MAX_MP: u32 = 50;
pub const PLAYER_BASE_DEFENSE: u32 = 10;
pub const PLAYER_BASE_CRIT_CHANCE: f64 = 0.10;
pub const PLAYER_CRIT_MULTIPLIER: f64 = 1.5;

// Action costs and effects
pub const SPECIAL_COST: u32 = 30;
pub const HEAL_COST: u32 = 20;
pub const HEAL_AMOUNT: u32 = 40;
pub const DEFEND_MANA_GAIN: u32 = 5;
pub const MP_REGEN_PER_TICK: u32 = 3;

// Damage ranges (low, high), inclusive
pub const PLAYER_ATTACK_DAMAGE: (u32, u32) = (12, 28);
pub const PLAYER_SPECIAL_DAMAGE: (u32, u32) = (30, 50);
pub const ENEMY_ATTACK_DAMAGE: (u32, u32) = (18, 35);
pub const ENEMY_SPECIAL_DAMAGE: (u32, u32) = (30, 50);

// Status effects
pub const BLEED_DURATION: u32 = 3;
pub const BLEED_DAMAGE: u32 = 8;
pub const BLEED_PROC_CHANCE: f64 = 0.10;
pub const STUN_PROC_CHANCE: f64 = 0.05;

// AI learning
pub const AI_LEARNING_RATE: f64 = 0.15;
pub const IQ_PER_LEARNING_UPDATE: f64 = 0.05;
pub const IQ_EXPLOIT_CAP: f64 = 0.9;
pub const IQ_MAX: f64 = 100.0;

// Round outcome IQ adjustments
pub const IQ_PER_WIN: f64 = 1.5;
pub const IQ_LOSS_PENALTY: f64 = 0.5;
pub const IQ_DOUBLE_KO_BONUS: f64 = 0.5;

// Per-win enemy scaling within a tier
pub const WIN_SCALING_MAX_HP: u32 = 100;
pub const WIN_SCALING_MAX_MP: u32 = 20;
pub const WIN_SCALING_DEFENSE: u32 = 5;

// Tier transitions trigger when the player's win count reaches these values
pub const TIER_WIN_THRESHOLDS: [u32; 3] = [3, 6, 9];

// Economy
pub const STARTING_TOKENS: u32 = 1000;
pub const WIN_SCORE: u32 = 50;
pub const LOSS_SCORE_PENALTY: u32 = 30;
pub const WIN_TOKEN_BASE: u32 = 100;
pub const WIN_TOKEN_BONUS_MAX: u32 = 50;

// Upgrade shop: base token cost per kind, scaled by (level + 1)
pub const UPGRADE_ATTACK_BASE_COST: u32 = 150;
pub const UPGRADE_SPECIAL_BASE_COST: u32 = 250;
pub const UPGRADE_DEFENSE_BASE_COST: u32 = 150;
pub const UPGRADE_REGEN_BASE_COST: u32 = 100;
pub const DEFENSE_PER_UPGRADE_LEVEL: u32 = 2;
pub const SPECIAL_UPGRADE_MULTIPLIER: f64 = 1.5;

// Scheduling delays and periods, in seconds
pub const ENEMY_TURN_DELAY_SECONDS: f64 = 0.6;
pub const ROUND_TRANSITION_SECONDS: f64 = 1.5;
pub const MANA_REGEN_INTERVAL_SECONDS: f64 = 1.0;
pub const STATUS_TICK_INTERVAL_SECONDS: f64 = 3.0;

// Battle log
pub const BATTLE_LOG_CAPACITY: usize = 50;
