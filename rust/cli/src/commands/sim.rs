//! Simulation command handler.
//!
//! Plays many hands at one table with a seeded random policy. Busted players
//! buy back in at the same seat so the table never runs dry. After every hand
//! the chips on the table are checked against everything ever bought in.
//!
//! # Examples
//!
//! ```no_run
//! use holdem_cli::commands::sim::handle_sim_command;
//! use holdem_engine::settings::TableSettings;
//! use std::io;
//!
//! let mut out = io::stdout();
//! let mut err = io::stderr();
//!
//! // 1000 hands, six players, seed 42
//! handle_sim_command(
//!     1000,
//!     6,
//!     Some(42),
//!     Some("data/sim.jsonl".to_string()),
//!     TableSettings::default(),
//!     &mut out,
//!     &mut err,
//! )
//! .unwrap();
//! ```

use std::io::Write;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use holdem_engine::engine::Engine;
use holdem_engine::events::ActionOutcome;
use holdem_engine::game::Game;
use holdem_engine::logger::{HandLogger, HandRecord};
use holdem_engine::player::{ActionKind, PlayerAction, SeatIndex};
use holdem_engine::settings::TableSettings;

use crate::error::CliError;
use crate::ui;

/// Decisions use their own stream so they do not shift the deck order.
const POLICY_STREAM: u64 = 0x9E37_79B9_7F4A_7C15;

/// Handle the sim command: play `hands` hands and report the totals.
///
/// # Arguments
///
/// * `hands` - Number of hands to play
/// * `players` - Seats filled at the start (2..=10)
/// * `seed` - Seed for both the shuffle and the policy; random when `None`
/// * `output` - Path to append hand histories to (JSONL)
/// * `settings` - Stakes for the table
/// * `out` - Output stream for the summary
/// * `err` - Output stream for warnings and errors
pub fn handle_sim_command(
    hands: u64,
    players: u8,
    seed: Option<u64>,
    output: Option<String>,
    settings: TableSettings,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    if hands == 0 {
        ui::write_error(err, "hands must be >= 1")?;
        return Err(CliError::InvalidInput("hands must be >= 1".to_string()));
    }
    let seed = match seed {
        Some(s) => s,
        None => {
            let s = rand::random();
            ui::display_warning(err, &format!("no seed given, using {}", s))?;
            s
        }
    };

    let mut logger = match output.as_deref() {
        Some(path) => match HandLogger::create(path) {
            Ok(l) => Some(l),
            Err(e) => {
                ui::write_error(err, &format!("Failed to open {}: {}", path, e))?;
                return Err(CliError::Io(e));
            }
        },
        None => None,
    };

    let mut engine = Engine::with_seed(settings, seed);
    let mut rng = ChaCha8Rng::seed_from_u64(seed ^ POLICY_STREAM);
    for i in 0..SeatIndex::from(players) {
        engine.sit(i, format!("bot{}", i + 1))?;
    }
    let stack = u64::from(engine.game().settings().starting_stack);
    let mut bought_in = stack * u64::from(players);
    let mut showdowns = 0u64;
    let mut rebuys = 0u64;

    for n in 1..=hands {
        let (_, mut outcomes) = engine.start_hand()?;
        while let Some(seat) = engine.game().current_player_seat() {
            let action = random_action(&mut rng, engine.game(), seat)?;
            outcomes.extend(engine.act(seat, action)?);
        }
        let result = outcomes
            .last()
            .filter(|o| o.is_hand_over())
            .ok_or_else(|| CliError::Engine(format!("hand {} ended without a result", n)))?;
        if matches!(result, ActionOutcome::Showdown { .. }) {
            showdowns += 1;
        }
        if let Some(log) = logger.as_mut() {
            let record = HandRecord::from_game(engine.game(), log.next_id(), Some(seed), result);
            log.write(&record)?;
        }

        let on_table: u64 = engine.roster().map(|p| u64::from(p.chips)).sum();
        if on_table != bought_in {
            return Err(CliError::Engine(format!(
                "chip conservation violated after hand {}: {} on the table, {} bought in",
                n, on_table, bought_in
            )));
        }

        let busted = engine.busted().to_vec();
        for p in busted {
            debug!(seat = p.seat_index, hand = n, "rebuy");
            engine.sit(p.seat_index, p.username)?;
            bought_in += stack;
            rebuys += 1;
        }
    }

    info!(hands, showdowns, rebuys, "simulation finished");
    writeln!(out, "Simulated: {} hands", hands)?;
    writeln!(out, "Showdowns: {}  Rebuys: {}", showdowns, rebuys)?;
    for p in engine.roster() {
        writeln!(out, "Seat {} {}: {}", p.seat_index, p.username, p.chips)?;
    }
    Ok(())
}

/// Uniform pick from the menu; never folds when checking is free.
fn random_action(rng: &mut ChaCha8Rng, game: &Game, seat: SeatIndex) -> Result<PlayerAction, CliError> {
    let menu = game
        .available_actions(seat)
        .ok_or_else(|| CliError::Engine(format!("seat {} has no actions", seat)))?;
    let choices: Vec<ActionKind> = menu
        .actions
        .iter()
        .copied()
        .filter(|&k| !(k == ActionKind::Fold && menu.allows(ActionKind::Check)))
        .collect();
    let kind = choices[rng.random_range(0..choices.len())];
    Ok(match kind {
        ActionKind::Fold => PlayerAction::Fold,
        ActionKind::Check => PlayerAction::Check,
        ActionKind::Call => PlayerAction::Call,
        ActionKind::AllIn => PlayerAction::AllIn,
        ActionKind::Raise => {
            let hi = menu.max_raise.min(menu.min_raise.saturating_mul(3));
            let lo = menu.min_raise.min(hi);
            PlayerAction::Raise(rng.random_range(lo..=hi))
        }
    })
}
