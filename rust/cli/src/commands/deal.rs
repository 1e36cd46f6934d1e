//! Deal command handler for single hand dealing and display.
//!
//! Deals one hand, shows every seat's hole cards and then checks (or calls)
//! it down so each street and the showdown are printed. The same seed always
//! prints the same hand.

use std::io::Write;

use holdem_engine::engine::Engine;
use holdem_engine::events::ActionOutcome;
use holdem_engine::player::PlayerAction;
use holdem_engine::settings::TableSettings;

use crate::error::CliError;
use crate::ui;

/// Handle the deal command.
///
/// # Arguments
///
/// * `seed` - Shuffle seed
/// * `players` - Number of seated players (2..=10), seated at 0..players
/// * `settings` - Stakes for the table
/// * `out` - Output stream for command results
pub fn handle_deal_command(
    seed: u64,
    players: u8,
    settings: TableSettings,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let mut engine = Engine::with_seed(settings, seed);
    for i in 0..usize::from(players) {
        engine.sit(i, format!("P{}", i + 1))?;
    }
    let (start, mut outcomes) = engine.start_hand()?;

    writeln!(out, "Seed: {}", seed)?;
    writeln!(
        out,
        "Dealer: seat {}  Blinds: {}/{}",
        start.dealer_seat,
        engine.game().settings().small_blind,
        engine.game().settings().big_blind
    )?;
    for p in &start.players {
        let hole = start
            .hole_cards_for(p.seat_index)
            .ok_or_else(|| CliError::Engine(format!("seat {} was not dealt in", p.seat_index)))?;
        writeln!(
            out,
            "Hole seat {} {}: {}",
            p.seat_index,
            p.username,
            ui::format_cards(&hole)
        )?;
    }

    while let Some(seat) = engine.game().current_player_seat() {
        let menu = engine
            .game()
            .available_actions(seat)
            .ok_or_else(|| CliError::Engine(format!("no actions for seat {}", seat)))?;
        let action = if menu.to_call == 0 {
            PlayerAction::Check
        } else {
            PlayerAction::Call
        };
        outcomes.extend(engine.act(seat, action)?);
    }

    for outcome in &outcomes {
        write_outcome(outcome, out)?;
    }
    Ok(())
}

fn write_outcome(outcome: &ActionOutcome, out: &mut dyn Write) -> Result<(), CliError> {
    match outcome {
        ActionOutcome::PhaseAdvanced {
            phase,
            community_cards,
            ..
        } => {
            let mut name = phase.as_str().to_string();
            name[..1].make_ascii_uppercase();
            writeln!(out, "{}: {}", name, ui::format_cards(community_cards))?;
        }
        ActionOutcome::Showdown {
            pot_results,
            players,
            ..
        } => {
            for p in players.iter().filter(|p| !p.folded) {
                let hand = p.best_hand.as_ref().map_or("-", |b| b.name);
                writeln!(out, "Shows seat {}: {}", p.seat_index, hand)?;
            }
            for (i, pot) in pot_results.iter().enumerate() {
                for w in &pot.winners {
                    writeln!(
                        out,
                        "Pot {}: seat {} {} wins {}",
                        i + 1,
                        w.seat_index,
                        w.username,
                        w.amount
                    )?;
                }
            }
        }
        ActionOutcome::HandComplete { winners, .. } => {
            for w in winners {
                writeln!(out, "Seat {} {} wins {}", w.seat_index, w.username, w.amount)?;
            }
        }
        ActionOutcome::ActionApplied { .. } => {}
    }
    Ok(())
}
