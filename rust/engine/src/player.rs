use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::errors::GameError;

/// Seat number at the table, `0..MAX_SEATS`.
pub type SeatIndex = usize;

/// Largest table the engine models.
pub const MAX_SEATS: usize = 10;

/// A seated player as the lobby sees it between hands.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct SeatedPlayer {
    pub seat_index: SeatIndex,
    pub username: String,
    pub chips: u32,
}

impl SeatedPlayer {
    pub fn new(seat_index: SeatIndex, username: impl Into<String>, chips: u32) -> Self {
        Self {
            seat_index,
            username: username.into(),
            chips,
        }
    }
}

/// A betting decision submitted for the acting seat.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerAction {
    Fold,
    Check,
    Call,
    /// Raise so the seat's bet this street totals the given amount.
    Raise(u32),
    AllIn,
}

impl PlayerAction {
    /// Builds an action from its wire name; `amount` is only read for `raise`.
    pub fn parse(name: &str, amount: u32) -> Result<Self, GameError> {
        Ok(match name.parse::<ActionKind>()? {
            ActionKind::Fold => PlayerAction::Fold,
            ActionKind::Check => PlayerAction::Check,
            ActionKind::Call => PlayerAction::Call,
            ActionKind::Raise => PlayerAction::Raise(amount),
            ActionKind::AllIn => PlayerAction::AllIn,
        })
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            PlayerAction::Fold => ActionKind::Fold,
            PlayerAction::Check => ActionKind::Check,
            PlayerAction::Call => ActionKind::Call,
            PlayerAction::Raise(_) => ActionKind::Raise,
            PlayerAction::AllIn => ActionKind::AllIn,
        }
    }
}

/// Action names without amounts, as offered in an action menu.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Fold,
    Check,
    Call,
    Raise,
    AllIn,
}

impl ActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::Fold => "fold",
            ActionKind::Check => "check",
            ActionKind::Call => "call",
            ActionKind::Raise => "raise",
            ActionKind::AllIn => "allin",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fold" => Ok(ActionKind::Fold),
            "check" => Ok(ActionKind::Check),
            "call" => Ok(ActionKind::Call),
            "raise" => Ok(ActionKind::Raise),
            "allin" => Ok(ActionKind::AllIn),
            other => Err(GameError::UnknownAction(other.to_string())),
        }
    }
}

/// Per-hand state of one seat. Built from a [`SeatedPlayer`] snapshot when a
/// hand starts and thrown away when the next one starts.
#[derive(Debug, Clone)]
pub struct Seat {
    pub seat_index: SeatIndex,
    pub username: String,
    pub chips: u32,
    hole: [Option<Card>; 2],
    /// Chips put in on the current street
    pub current_bet: u32,
    /// Chips put in over the whole hand
    pub total_bet: u32,
    pub folded: bool,
    pub all_in: bool,
}

impl Seat {
    pub fn new(p: &SeatedPlayer) -> Self {
        Self {
            seat_index: p.seat_index,
            username: p.username.clone(),
            chips: p.chips,
            hole: [None, None],
            current_bet: 0,
            total_bet: 0,
            folded: false,
            all_in: false,
        }
    }

    pub fn hole_cards(&self) -> Option<[Card; 2]> {
        match self.hole {
            [Some(a), Some(b)] => Some([a, b]),
            _ => None,
        }
    }

    pub fn give_card(&mut self, c: Card) {
        if let Some(slot) = self.hole.iter_mut().find(|s| s.is_none()) {
            *slot = Some(c);
        }
    }

    /// Still holding cards and chips, so may be asked to act.
    pub fn can_act(&self) -> bool {
        !self.folded && !self.all_in
    }

    pub fn to_call(&self, table_bet: u32) -> u32 {
        table_bet.saturating_sub(self.current_bet)
    }

    /// Highest street total this seat can reach.
    pub fn max_bet(&self) -> u32 {
        self.current_bet + self.chips
    }

    /// Moves chips from the stack into the bet; capped at the stack.
    /// Returns the amount actually moved.
    pub fn commit(&mut self, amount: u32) -> u32 {
        let amt = amount.min(self.chips);
        self.chips -= amt;
        self.current_bet += amt;
        self.total_bet += amt;
        if self.chips == 0 {
            self.all_in = true;
        }
        amt
    }
}
