//! Headless batch simulator.
//!
//! Plays full sessions against the adaptive enemy with a scripted player
//! strategy and prints an end-of-run report. Useful for balance checks and
//! for watching the enemy policy converge without a front end.
//!
//! Usage: simulate [--runs N] [--rounds N] [--seed N]

use std::env;
use std::process;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use arena::combat::types::Combatant;
use arena::core::constants::{
    ENEMY_TURN_DELAY_SECONDS, HEAL_COST, ROUND_TRANSITION_SECONDS, SPECIAL_COST,
};
use arena::{ActionKind, BattleController, BattleEvent, MemoryStore, PlayerId};

struct Config {
    runs: u32,
    rounds: u32,
    seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            runs: 1,
            rounds: 20,
            seed: 42,
        }
    }
}

#[derive(Default)]
struct RunReport {
    wins: u32,
    losses: u32,
    double_kos: u32,
    tier_changes: u32,
    tokens: u32,
    final_iq: f64,
    final_tier: u8,
}

fn parse_args() -> Config {
    let mut config = Config::default();
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--runs" => config.runs = expect_value(args.next(), "--runs"),
            "--rounds" => config.rounds = expect_value(args.next(), "--rounds"),
            "--seed" => config.seed = expect_value(args.next(), "--seed"),
            "--help" | "-h" => {
                println!("Usage: simulate [--runs N] [--rounds N] [--seed N]");
                process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {other}");
                eprintln!("Run 'simulate --help' for usage.");
                process::exit(1);
            }
        }
    }
    config
}

fn expect_value<T: std::str::FromStr>(value: Option<String>, flag: &str) -> T {
    match value.and_then(|v| v.parse().ok()) {
        Some(v) => v,
        None => {
            eprintln!("{flag} requires a numeric value");
            process::exit(1);
        }
    }
}

/// Scripted player strategy: patch up when hurt, burn mana on specials,
/// recover mana when dry, otherwise keep swinging.
fn choose_action(controller: &BattleController) -> ActionKind {
    let player = &controller.state().player;
    if player.hp <= 60 && player.hp < player.max_hp() && player.mp >= HEAL_COST {
        ActionKind::Heal
    } else if player.mp >= SPECIAL_COST {
        ActionKind::Special
    } else if player.mp < 10 {
        ActionKind::Defend
    } else {
        ActionKind::Attack
    }
}

fn tally(events: &[BattleEvent], report: &mut RunReport) -> u32 {
    let mut rounds_ended = 0;
    for event in events {
        match event {
            BattleEvent::RoundWon { .. } => {
                report.wins += 1;
                rounds_ended += 1;
            }
            BattleEvent::RoundLost { .. } => {
                report.losses += 1;
                rounds_ended += 1;
            }
            BattleEvent::DoubleKo { .. } => {
                report.double_kos += 1;
                rounds_ended += 1;
            }
            BattleEvent::TierChanged { .. } => report.tier_changes += 1,
            _ => {}
        }
    }
    rounds_ended
}

fn run_session(run_idx: u32, config: &Config) -> RunReport {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed + run_idx as u64);
    let mut controller = BattleController::new(PlayerId::new(format!("sim-{run_idx}")));
    controller.attach_store(Box::new(MemoryStore::new()));

    let mut report = RunReport::default();
    let mut rounds_done = 0;
    // Hard cap so a pathological strategy can't spin forever.
    let mut exchanges = 0u32;

    while rounds_done < config.rounds && exchanges < 100_000 {
        exchanges += 1;

        if controller.state().round_over {
            let events = controller.advance(ROUND_TRANSITION_SECONDS + 0.1, &mut rng);
            rounds_done += tally(&events, &mut report);
            continue;
        }

        let action = choose_action(&controller);
        let submitted = controller
            .submit_action(action, &mut rng)
            .or_else(|_| controller.submit_action(ActionKind::Attack, &mut rng))
            .or_else(|_| controller.submit_action(ActionKind::Defend, &mut rng));
        if let Ok(events) = submitted {
            rounds_done += tally(&events, &mut report);
        }

        let events = controller.advance(ENEMY_TURN_DELAY_SECONDS + 0.1, &mut rng);
        rounds_done += tally(&events, &mut report);
    }

    let state = controller.state();
    report.tokens = state.wallet_tokens;
    report.final_iq = state.enemy.intelligence;
    report.final_tier = state.enemy.template.template().tier;
    report
}

fn main() {
    let config = parse_args();
    eprintln!(
        "--- Simulating {} run(s) of {} round(s), seed {} ---",
        config.runs, config.rounds, config.seed
    );

    for run in 0..config.runs {
        let report = run_session(run, &config);
        println!("Run {}/{}", run + 1, config.runs);
        println!("  wins:         {}", report.wins);
        println!("  losses:       {}", report.losses);
        println!("  double KOs:   {}", report.double_kos);
        println!("  tier changes: {}", report.tier_changes);
        println!("  final tier:   {}", report.final_tier);
        println!("  tokens:       {}", report.tokens);
        println!("  enemy IQ:     {:.1}", report.final_iq);
    }
}
