//! Hand evaluation command.
//!
//! Scores 5 to 7 cards and prints the strongest five-card hand among them.

use std::collections::HashSet;
use std::io::Write;

use holdem_engine::cards::parse_cards;
use holdem_engine::hand::best_hand_of;

use crate::error::CliError;
use crate::ui;

/// Handle the eval command.
///
/// # Errors
///
/// Returns `CliError::InvalidInput` for unparseable or repeated cards and for
/// fewer than 5 or more than 7 cards.
pub fn handle_eval_command(cards: &str, json: bool, out: &mut dyn Write) -> Result<(), CliError> {
    let parsed = parse_cards(cards)?;
    let mut seen = HashSet::new();
    if let Some(dup) = parsed.iter().find(|c| !seen.insert(**c)) {
        return Err(CliError::InvalidInput(format!("duplicate card {}", dup)));
    }
    let best = best_hand_of(&parsed)?;

    if json {
        let display = serde_json::json!({
            "category": best.name,
            "rank": best.score.rank(),
            "cards": best.cards.iter().map(|c| c.to_string()).collect::<Vec<_>>(),
            "kickers": best.score.kickers,
        });
        let json_str = serde_json::to_string_pretty(&display).map_err(std::io::Error::other)?;
        writeln!(out, "{}", json_str)?;
    } else {
        writeln!(out, "Hand: {}", ui::format_cards(&best.cards))?;
        writeln!(out, "Category: {} (rank {})", best.name, best.score.rank())?;
    }
    Ok(())
}
