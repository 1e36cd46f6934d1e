use serde::Serialize;
use tracing::debug;

use crate::player::{Seat, SeatIndex};

/// One layer of the pot and the seats that can win it.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct SidePot {
    pub amount: u32,
    pub eligible: Vec<SeatIndex>,
}

/// Splits the hand's contributions into a main pot and side pots, lowest
/// contribution level first.
///
/// Folded seats still pay into every level they reached but are never
/// eligible. A level paid only by folded seats (always the top one, since any
/// live seat above it would also have paid into it) has no claimant; its
/// chips go to the pot below it, so the result always adds up to everything
/// contributed.
///
/// # Examples
///
/// ```
/// use holdem_engine::player::{Seat, SeatedPlayer};
/// use holdem_engine::pot::compute_side_pots;
///
/// let mut seats: Vec<Seat> = [(0, 100), (1, 200), (2, 300)]
///     .into_iter()
///     .map(|(i, bet)| {
///         let mut s = Seat::new(&SeatedPlayer::new(i, format!("p{i}"), 1000));
///         s.commit(bet);
///         s
///     })
///     .collect();
/// seats[1].folded = true;
///
/// let pots = compute_side_pots(&seats);
/// assert_eq!(pots[0].amount, 300);
/// assert_eq!(pots[0].eligible, vec![0, 2]);
/// assert_eq!(pots.iter().map(|p| p.amount).sum::<u32>(), 600);
/// ```
pub fn compute_side_pots(seats: &[Seat]) -> Vec<SidePot> {
    let mut considered: Vec<&Seat> = seats.iter().filter(|s| s.total_bet > 0).collect();
    considered.sort_by_key(|s| s.total_bet);

    let mut pots: Vec<SidePot> = Vec::new();
    let mut prev_level = 0u32;

    for level in considered.iter().map(|s| s.total_bet) {
        if level <= prev_level {
            continue;
        }
        let contributors: Vec<&&Seat> = considered
            .iter()
            .filter(|s| s.total_bet > prev_level)
            .collect();
        let amount = (level - prev_level) * contributors.len() as u32;
        let mut eligible: Vec<SeatIndex> = contributors
            .iter()
            .filter(|s| !s.folded)
            .map(|s| s.seat_index)
            .collect();
        eligible.sort_unstable();
        prev_level = level;

        if amount == 0 {
            continue;
        }
        if !eligible.is_empty() {
            pots.push(SidePot { amount, eligible });
        } else if let Some(below) = pots.last_mut() {
            debug!(level, amount, "pot level has no live contributor, merging down");
            below.amount += amount;
        }
    }
    pots
}
