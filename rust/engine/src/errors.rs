use thiserror::Error;

use crate::player::SeatIndex;

/// Validation failures reported by the engine. None of them mutate the table;
/// the caller rejects the request and waits for a valid one.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Not your turn (seat {seat})")]
    NotYourTurn { seat: SeatIndex },
    #[error("No hand in progress")]
    NoHandInProgress,
    #[error("A hand is already in progress")]
    HandInProgress,
    #[error("Cannot check, {to_call} to call")]
    CannotCheck { to_call: u32 },
    #[error("Min raise to {minimum}")]
    RaiseTooSmall { amount: u32, minimum: u32 },
    #[error("Action was not re-opened, seat {seat} may only call or fold")]
    RaiseNotReopened { seat: SeatIndex },
    #[error("Invalid action: {0}")]
    UnknownAction(String),
    #[error("Need at least 2 players, got {count}")]
    NotEnoughPlayers { count: usize },
    #[error("Seat {0} is outside the table")]
    InvalidSeat(SeatIndex),
    #[error("Seat {0} appears more than once")]
    DuplicateSeat(SeatIndex),
    #[error("Seat {0} is already taken")]
    SeatOccupied(SeatIndex),
    #[error("Seat {0} is empty")]
    SeatEmpty(SeatIndex),
    #[error("Seat {0} has no chips")]
    EmptyStack(SeatIndex),
    #[error("Table holds {total} chips, more than a pot can count")]
    TooManyChips { total: u64 },
    #[error("Invalid card: {0:?}")]
    InvalidCard(String),
    #[error("Need 5 to 7 cards, got {0}")]
    InvalidCardCount(usize),
    #[error("No all-in run-out pending")]
    NoRunoutPending,
}
