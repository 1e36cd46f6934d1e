use serde::Serialize;

use crate::errors::GameError;
use crate::player::{ActionKind, PlayerAction as A, Seat};

/// Betting state of the current street as seen by the acting seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BetContext {
    /// Amount every live seat must match this street
    pub table_bet: u32,
    /// Smallest legal raise increment
    pub min_raise: u32,
    /// Seat already acted before an incomplete raise and may not raise again
    pub raise_locked: bool,
}

/// What the acting seat may do right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionMenu {
    pub actions: Vec<ActionKind>,
    pub to_call: u32,
    /// Smallest legal raise target (street total)
    pub min_raise: u32,
    /// Largest reachable street total (everything in)
    pub max_raise: u32,
    pub pot: u32,
}

impl ActionMenu {
    pub fn allows(&self, kind: ActionKind) -> bool {
        self.actions.contains(&kind)
    }
}

pub fn action_menu(seat: &Seat, ctx: &BetContext, pot: u32) -> ActionMenu {
    let to_call = seat.to_call(ctx.table_bet);
    let mut actions = vec![ActionKind::Fold];
    if to_call == 0 {
        actions.push(ActionKind::Check);
    } else {
        actions.push(ActionKind::Call);
    }
    if seat.chips > to_call && !ctx.raise_locked {
        actions.push(ActionKind::Raise);
    }
    if seat.chips > 0 && (!ctx.raise_locked || seat.chips <= to_call) {
        actions.push(ActionKind::AllIn);
    }
    ActionMenu {
        actions,
        to_call: to_call.min(seat.chips),
        min_raise: ctx.table_bet + ctx.min_raise,
        max_raise: seat.max_bet(),
        pot,
    }
}

/// An action checked against the table and resolved to chip amounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatedAction {
    Fold,
    Check,
    /// Chips moved to match the table bet (may be a short all-in call)
    Call(u32),
    /// New street total for the seat
    Raise { to: u32 },
    /// New street total for the seat, with the whole stack committed
    AllIn { to: u32 },
}

impl ValidatedAction {
    /// The action as it was carried out, for records and replays. `table_bet`
    /// and `max_bet` are taken before the action is applied.
    pub fn applied(&self, table_bet: u32, max_bet: u32) -> A {
        match *self {
            ValidatedAction::Fold => A::Fold,
            ValidatedAction::Check => A::Check,
            ValidatedAction::Call(_) => A::Call,
            ValidatedAction::Raise { to } if to <= table_bet => A::Call,
            ValidatedAction::Raise { to } if to >= max_bet => A::AllIn,
            ValidatedAction::Raise { to } => A::Raise(to),
            ValidatedAction::AllIn { .. } => A::AllIn,
        }
    }
}

/// Checks `action` for `seat` and resolves the chip amounts it implies.
///
/// A raise below the minimum is rejected, unless the seat cannot reach the
/// minimum at all; then it becomes an all-in for the seat's maximum. Raise
/// targets above the stack are clamped.
///
/// # Errors
///
/// - [`GameError::CannotCheck`] when checking while facing a bet
/// - [`GameError::RaiseTooSmall`] when the raise target is under the minimum
/// - [`GameError::RaiseNotReopened`] when the seat may only call or fold
///
/// # Examples
///
/// ```
/// use holdem_engine::player::{PlayerAction, Seat, SeatedPlayer};
/// use holdem_engine::rules::{validate_action, BetContext, ValidatedAction};
///
/// let seat = Seat::new(&SeatedPlayer::new(0, "alice", 1000));
/// let ctx = BetContext { table_bet: 10, min_raise: 10, raise_locked: false };
///
/// assert_eq!(validate_action(&seat, &ctx, PlayerAction::Call), Ok(ValidatedAction::Call(10)));
/// assert_eq!(
///     validate_action(&seat, &ctx, PlayerAction::Raise(30)),
///     Ok(ValidatedAction::Raise { to: 30 })
/// );
/// assert!(validate_action(&seat, &ctx, PlayerAction::Raise(15)).is_err());
/// assert!(validate_action(&seat, &ctx, PlayerAction::Check).is_err());
/// ```
pub fn validate_action(
    seat: &Seat,
    ctx: &BetContext,
    action: A,
) -> Result<ValidatedAction, GameError> {
    let to_call = seat.to_call(ctx.table_bet);
    match action {
        A::Fold => Ok(ValidatedAction::Fold),
        A::Check => {
            if to_call == 0 {
                Ok(ValidatedAction::Check)
            } else {
                Err(GameError::CannotCheck { to_call })
            }
        }
        A::Call => Ok(ValidatedAction::Call(to_call.min(seat.chips))),
        A::Raise(amount) => {
            if ctx.raise_locked {
                return Err(GameError::RaiseNotReopened {
                    seat: seat.seat_index,
                });
            }
            let minimum = ctx.table_bet + ctx.min_raise;
            let max = seat.max_bet();
            if max < minimum {
                Ok(ValidatedAction::Raise { to: max })
            } else if amount < minimum {
                Err(GameError::RaiseTooSmall { amount, minimum })
            } else {
                Ok(ValidatedAction::Raise {
                    to: amount.min(max),
                })
            }
        }
        A::AllIn => {
            if ctx.raise_locked && seat.chips > to_call {
                return Err(GameError::RaiseNotReopened {
                    seat: seat.seat_index,
                });
            }
            Ok(ValidatedAction::AllIn { to: seat.max_bet() })
        }
    }
}
