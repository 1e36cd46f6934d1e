//! Result records handed back to the driver after each engine call.
//!
//! Everything here is safe to broadcast to the whole table except
//! [`HandStart::hole_cards`], which is never serialized and must be routed to
//! each seat privately.

use serde::Serialize;

use crate::cards::Card;
use crate::game::Phase;
use crate::hand::BestHand;
use crate::player::{PlayerAction, SeatIndex};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicSeat {
    pub seat_index: SeatIndex,
    pub username: String,
    pub chips: u32,
    pub current_bet: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateHole {
    pub seat_index: SeatIndex,
    pub cards: [Card; 2],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandStart {
    pub hand_number: u64,
    pub dealer_seat: SeatIndex,
    pub small_blind_seat: SeatIndex,
    pub big_blind_seat: SeatIndex,
    pub pot: u32,
    pub current_bet: u32,
    /// `None` when every seat is all-in from the blinds
    pub current_player_seat: Option<SeatIndex>,
    pub all_in_runout: bool,
    pub players: Vec<PublicSeat>,
    #[serde(skip)]
    pub hole_cards: Vec<PrivateHole>,
}

impl HandStart {
    pub fn hole_cards_for(&self, seat: SeatIndex) -> Option<[Card; 2]> {
        self.hole_cards
            .iter()
            .find(|h| h.seat_index == seat)
            .map(|h| h.cards)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealedHand {
    pub seat_index: SeatIndex,
    pub cards: [Card; 2],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Winner {
    pub seat_index: SeatIndex,
    pub username: String,
    pub amount: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatSummary {
    pub seat_index: SeatIndex,
    pub chips: u32,
    pub folded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PotResult {
    pub amount: u32,
    pub winners: Vec<Winner>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowdownSeat {
    pub seat_index: SeatIndex,
    pub username: String,
    /// Hole cards of seats that reached showdown; folded hands stay hidden
    pub hole: Option<[Card; 2]>,
    pub best_hand: Option<BestHand>,
    pub chips: u32,
    pub folded: bool,
}

/// Outcome of one engine step, tagged by `type` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ActionOutcome {
    #[serde(rename_all = "camelCase")]
    ActionApplied {
        seat_index: SeatIndex,
        action: PlayerAction,
        /// The seat's bet on this street after acting
        bet_amount: u32,
        chips: u32,
        pot: u32,
        current_bet: u32,
        next_player_seat: SeatIndex,
    },
    #[serde(rename_all = "camelCase")]
    PhaseAdvanced {
        phase: Phase,
        community_cards: Vec<Card>,
        pot: u32,
        current_player_seat: Option<SeatIndex>,
        all_in_runout: bool,
        /// Set once per hand, when a run-out leaves board cards to come
        #[serde(skip_serializing_if = "Option::is_none")]
        revealed: Option<Vec<RevealedHand>>,
    },
    #[serde(rename_all = "camelCase")]
    HandComplete {
        winners: Vec<Winner>,
        players: Vec<SeatSummary>,
    },
    #[serde(rename_all = "camelCase")]
    Showdown {
        community_cards: Vec<Card>,
        pot_results: Vec<PotResult>,
        players: Vec<ShowdownSeat>,
    },
}

impl ActionOutcome {
    pub fn is_hand_over(&self) -> bool {
        matches!(
            self,
            ActionOutcome::HandComplete { .. } | ActionOutcome::Showdown { .. }
        )
    }

    /// A run-out street: the driver must advance without waiting for actions.
    pub fn needs_runout(&self) -> bool {
        matches!(
            self,
            ActionOutcome::PhaseAdvanced {
                all_in_runout: true,
                ..
            }
        )
    }

    /// Final stacks once the hand is over.
    pub fn final_chips(&self) -> Option<Vec<(SeatIndex, u32)>> {
        match self {
            ActionOutcome::HandComplete { players, .. } => {
                Some(players.iter().map(|p| (p.seat_index, p.chips)).collect())
            }
            ActionOutcome::Showdown { players, .. } => {
                Some(players.iter().map(|p| (p.seat_index, p.chips)).collect())
            }
            _ => None,
        }
    }

    /// Every seat awarded chips, once per pot won.
    pub fn winners(&self) -> Vec<&Winner> {
        match self {
            ActionOutcome::HandComplete { winners, .. } => winners.iter().collect(),
            ActionOutcome::Showdown { pot_results, .. } => {
                pot_results.iter().flat_map(|p| p.winners.iter()).collect()
            }
            _ => Vec::new(),
        }
    }
}
