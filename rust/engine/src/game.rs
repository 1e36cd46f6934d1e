use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::cards::Card;
use crate::deck::{Deck, DeckSource, SeededShuffle};
use crate::errors::GameError;
use crate::events::{
    ActionOutcome, HandStart, PotResult, PrivateHole, PublicSeat, RevealedHand, SeatSummary,
    ShowdownSeat, Winner,
};
use crate::hand::{best_hand_of, BestHand};
use crate::logger::ActionRecord;
use crate::player::{PlayerAction, Seat, SeatIndex, SeatedPlayer, MAX_SEATS};
use crate::pot::compute_side_pots;
use crate::rules::{action_menu, validate_action, ActionMenu, BetContext, ValidatedAction};
use crate::settings::TableSettings;

/// Stage of the hand the table is in.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// No hand dealt yet
    Waiting,
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
    /// Pot awarded; the next `start_hand` begins a new hand
    Complete,
}

impl Phase {
    /// Streets on which seats can still bet.
    pub fn is_betting(self) -> bool {
        matches!(
            self,
            Phase::Preflop | Phase::Flop | Phase::Turn | Phase::River
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Waiting => "waiting",
            Phase::Preflop => "preflop",
            Phase::Flop => "flop",
            Phase::Turn => "turn",
            Phase::River => "river",
            Phase::Showdown => "showdown",
            Phase::Complete => "complete",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed-size set of seat indices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SeatSet(u16);

impl SeatSet {
    pub fn insert(&mut self, seat: SeatIndex) {
        debug_assert!(seat < MAX_SEATS);
        self.0 |= 1 << seat;
    }

    pub fn remove(&mut self, seat: SeatIndex) {
        self.0 &= !(1 << seat);
    }

    pub fn contains(&self, seat: SeatIndex) -> bool {
        seat < MAX_SEATS && self.0 & (1 << seat) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }

    pub fn iter(&self) -> impl Iterator<Item = SeatIndex> + '_ {
        (0..MAX_SEATS).filter(move |&s| self.contains(s))
    }
}

/// Hold'em state machine for a single table.
///
/// Owns everything that changes during a hand. Every mutation takes
/// `&mut self`, so actions are applied strictly one at a time; run one `Game`
/// per table.
///
/// # Examples
///
/// ```
/// use holdem_engine::game::{Game, Phase};
/// use holdem_engine::player::{PlayerAction, SeatedPlayer};
/// use holdem_engine::settings::TableSettings;
///
/// let mut game = Game::with_seed(TableSettings::default(), 7);
/// let start = game
///     .start_hand(&[SeatedPlayer::new(0, "alice", 1000), SeatedPlayer::new(1, "bob", 1000)])
///     .unwrap();
/// assert_eq!(start.pot, 15);
///
/// // heads-up: the dealer posts the small blind and acts first
/// let first = start.current_player_seat.unwrap();
/// assert_eq!(first, start.dealer_seat);
/// game.handle_action(first, PlayerAction::Call).unwrap();
/// game.handle_action(start.big_blind_seat, PlayerAction::Check).unwrap();
/// assert_eq!(game.phase(), Phase::Flop);
/// assert_eq!(game.community_cards().len(), 3);
/// ```
#[derive(Debug)]
pub struct Game {
    settings: TableSettings,
    deck_source: Box<dyn DeckSource>,
    deck: Deck,
    phase: Phase,
    hand_number: u64,
    dealer_seat: Option<SeatIndex>,
    community: Vec<Card>,
    pot: u32,
    /// Street total every live seat must match
    current_bet: u32,
    /// Smallest legal raise increment
    min_raise: u32,
    /// Sorted by seat index
    seats: Vec<Seat>,
    /// Position in `seats` of the acting seat
    current: Option<usize>,
    needs_to_act: SeatSet,
    raise_locked: SeatSet,
    runout: bool,
    revealed: bool,
    history: Vec<ActionRecord>,
}

impl Game {
    pub fn new(settings: TableSettings, deck_source: impl DeckSource + 'static) -> Self {
        Self {
            settings,
            deck_source: Box::new(deck_source),
            deck: Deck::ordered(),
            phase: Phase::Waiting,
            hand_number: 0,
            dealer_seat: None,
            community: Vec::with_capacity(5),
            pot: 0,
            current_bet: 0,
            min_raise: 0,
            seats: Vec::new(),
            current: None,
            needs_to_act: SeatSet::default(),
            raise_locked: SeatSet::default(),
            runout: false,
            revealed: false,
            history: Vec::new(),
        }
    }

    pub fn with_seed(settings: TableSettings, seed: u64) -> Self {
        Self::new(settings, SeededShuffle::new(seed))
    }

    pub fn settings(&self) -> &TableSettings {
        &self.settings
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn hand_number(&self) -> u64 {
        self.hand_number
    }

    pub fn dealer_seat(&self) -> Option<SeatIndex> {
        self.dealer_seat
    }

    pub fn community_cards(&self) -> &[Card] {
        &self.community
    }

    pub fn pot(&self) -> u32 {
        self.pot
    }

    pub fn current_bet(&self) -> u32 {
        self.current_bet
    }

    pub fn min_raise(&self) -> u32 {
        self.min_raise
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn seat(&self, seat: SeatIndex) -> Option<&Seat> {
        self.seats.iter().find(|s| s.seat_index == seat)
    }

    pub fn current_player_seat(&self) -> Option<SeatIndex> {
        self.current.map(|p| self.seats[p].seat_index)
    }

    pub fn needs_to_act(&self) -> SeatSet {
        self.needs_to_act
    }

    /// Betting is over and the driver must call [`Game::advance_runout`].
    pub fn is_runout(&self) -> bool {
        self.runout && self.phase.is_betting()
    }

    pub fn history(&self) -> &[ActionRecord] {
        &self.history
    }

    /// Stacks plus the pot; constant from hand start until the pot is awarded.
    pub fn chips_in_play(&self) -> u64 {
        self.seats.iter().map(|s| s.chips as u64).sum::<u64>() + self.pot as u64
    }

    /// Deals a new hand to `players`.
    ///
    /// Fails without touching the table when fewer than two players are given,
    /// when a seat index is out of range or repeated, when a player has no
    /// chips, when the stacks together do not fit in a `u32` pot, or while
    /// another hand is still being played.
    pub fn start_hand(&mut self, players: &[SeatedPlayer]) -> Result<HandStart, GameError> {
        if players.len() < 2 {
            return Err(GameError::NotEnoughPlayers {
                count: players.len(),
            });
        }
        if self.phase.is_betting() {
            return Err(GameError::HandInProgress);
        }
        let mut roster = players.to_vec();
        roster.sort_by_key(|p| p.seat_index);
        for (i, p) in roster.iter().enumerate() {
            if p.seat_index >= MAX_SEATS {
                return Err(GameError::InvalidSeat(p.seat_index));
            }
            if i > 0 && roster[i - 1].seat_index == p.seat_index {
                return Err(GameError::DuplicateSeat(p.seat_index));
            }
            if p.chips == 0 {
                return Err(GameError::EmptyStack(p.seat_index));
            }
        }
        let total: u64 = roster.iter().map(|p| u64::from(p.chips)).sum();
        if total > u64::from(u32::MAX) {
            return Err(GameError::TooManyChips { total });
        }

        self.hand_number += 1;
        self.deck = self.deck_source.next_deck();
        self.community.clear();
        self.pot = 0;
        self.current_bet = 0;
        self.min_raise = self.settings.big_blind;
        self.phase = Phase::Preflop;
        self.runout = false;
        self.revealed = false;
        self.raise_locked.clear();
        self.history.clear();
        self.seats = roster.iter().map(Seat::new).collect();

        let dealer = self.next_dealer();
        self.dealer_seat = Some(dealer);
        let n = self.seats.len();
        let d = self.position_of(dealer).unwrap_or(0);
        let (sb, bb, first) = if n == 2 {
            (d, (d + 1) % n, d)
        } else {
            ((d + 1) % n, (d + 2) % n, (d + 3) % n)
        };

        self.post_blind(sb, self.settings.small_blind);
        self.post_blind(bb, self.settings.big_blind);
        self.current_bet = self.settings.big_blind;

        for _ in 0..2 {
            for i in 0..n {
                let to = (d + 1 + i) % n;
                if let Some(c) = self.deck.deal_card() {
                    self.seats[to].give_card(c);
                }
            }
        }

        self.needs_to_act.clear();
        for s in self.seats.iter().filter(|s| !s.all_in) {
            self.needs_to_act.insert(s.seat_index);
        }
        self.current = if self.seats[first].all_in {
            self.next_to_act(first)
        } else {
            Some(first)
        };
        self.runout = self.current.is_none();
        self.debug_check_invariants();

        info!(
            hand = self.hand_number,
            dealer,
            players = n,
            pot = self.pot,
            "hand started"
        );

        Ok(HandStart {
            hand_number: self.hand_number,
            dealer_seat: dealer,
            small_blind_seat: self.seats[sb].seat_index,
            big_blind_seat: self.seats[bb].seat_index,
            pot: self.pot,
            current_bet: self.current_bet,
            current_player_seat: self.current_player_seat(),
            all_in_runout: self.runout,
            players: self
                .seats
                .iter()
                .map(|s| PublicSeat {
                    seat_index: s.seat_index,
                    username: s.username.clone(),
                    chips: s.chips,
                    current_bet: s.current_bet,
                })
                .collect(),
            hole_cards: self
                .seats
                .iter()
                .filter_map(|s| {
                    s.hole_cards().map(|cards| PrivateHole {
                        seat_index: s.seat_index,
                        cards,
                    })
                })
                .collect(),
        })
    }

    /// Menu for `seat`, or `None` if it is not that seat's turn.
    pub fn available_actions(&self, seat: SeatIndex) -> Option<ActionMenu> {
        let pos = self.acting_position(seat)?;
        Some(action_menu(
            &self.seats[pos],
            &self.bet_context(pos),
            self.pot,
        ))
    }

    /// What a turn timer should submit for a stalled seat: check when that is
    /// free, fold otherwise.
    pub fn timeout_action(&self, seat: SeatIndex) -> Option<PlayerAction> {
        let menu = self.available_actions(seat)?;
        if menu.to_call == 0 {
            Some(PlayerAction::Check)
        } else {
            Some(PlayerAction::Fold)
        }
    }

    /// Applies `action` for `seat` and moves the hand forward.
    pub fn handle_action(
        &mut self,
        seat: SeatIndex,
        action: PlayerAction,
    ) -> Result<ActionOutcome, GameError> {
        if !self.phase.is_betting() {
            return Err(GameError::NoHandInProgress);
        }
        let pos = self
            .acting_position(seat)
            .ok_or(GameError::NotYourTurn { seat })?;
        let validated = validate_action(&self.seats[pos], &self.bet_context(pos), action)?;
        let action = validated.applied(self.current_bet, self.seats[pos].max_bet());

        match validated {
            ValidatedAction::Fold => self.seats[pos].folded = true,
            ValidatedAction::Check => {}
            ValidatedAction::Call(amount) => {
                self.pot += self.seats[pos].commit(amount);
            }
            ValidatedAction::Raise { to } | ValidatedAction::AllIn { to } => {
                self.raise_to(pos, to);
            }
        }
        self.needs_to_act.remove(seat);
        self.raise_locked.remove(seat);
        self.history.push(ActionRecord {
            seat_index: seat,
            street: self.phase,
            action,
        });
        debug!(
            seat,
            action = ?action,
            bet = self.seats[pos].current_bet,
            pot = self.pot,
            "action applied"
        );
        self.debug_check_invariants();

        let live: Vec<usize> = (0..self.seats.len())
            .filter(|&i| !self.seats[i].folded)
            .collect();
        if let [winner] = live[..] {
            return Ok(self.finish_uncontested(winner));
        }
        if self.needs_to_act.is_empty() {
            return Ok(self.next_street());
        }
        let Some(next) = self.next_to_act(pos) else {
            return Ok(self.next_street());
        };
        self.current = Some(next);

        let actor = &self.seats[pos];
        Ok(ActionOutcome::ActionApplied {
            seat_index: seat,
            action,
            bet_amount: actor.current_bet,
            chips: actor.chips,
            pot: self.pot,
            current_bet: self.current_bet,
            next_player_seat: self.seats[next].seat_index,
        })
    }

    /// Deals the next street of an all-in run-out, or the showdown after the river.
    pub fn advance_runout(&mut self) -> Result<ActionOutcome, GameError> {
        if !self.is_runout() {
            return Err(GameError::NoRunoutPending);
        }
        Ok(self.next_street())
    }

    fn acting_position(&self, seat: SeatIndex) -> Option<usize> {
        if !self.phase.is_betting() {
            return None;
        }
        self.current
            .filter(|&p| self.seats[p].seat_index == seat)
    }

    fn bet_context(&self, pos: usize) -> BetContext {
        BetContext {
            table_bet: self.current_bet,
            min_raise: self.min_raise,
            raise_locked: self.raise_locked.contains(self.seats[pos].seat_index),
        }
    }

    fn position_of(&self, seat: SeatIndex) -> Option<usize> {
        self.seats.iter().position(|s| s.seat_index == seat)
    }

    fn next_dealer(&self) -> SeatIndex {
        let lowest = self.seats[0].seat_index;
        match self.dealer_seat {
            None => lowest,
            Some(prev) => self
                .seats
                .iter()
                .map(|s| s.seat_index)
                .find(|&s| s > prev)
                .unwrap_or(lowest),
        }
    }

    fn post_blind(&mut self, pos: usize, amount: u32) {
        self.pot += self.seats[pos].commit(amount);
    }

    /// First seat after `from`, in circular order, still owing an action.
    fn next_to_act(&self, from: usize) -> Option<usize> {
        let n = self.seats.len();
        (1..=n).map(|k| (from + k) % n).find(|&i| {
            let s = &self.seats[i];
            s.can_act() && self.needs_to_act.contains(s.seat_index)
        })
    }

    fn raise_to(&mut self, pos: usize, to: u32) {
        let actor = self.seats[pos].seat_index;
        if to > self.current_bet {
            let increment = to - self.current_bet;
            let full = increment >= self.min_raise;
            if full {
                self.min_raise = increment;
                self.raise_locked.clear();
            }
            self.current_bet = to;
            let lock = !full && !self.settings.incomplete_raise_reopens;
            for s in self.seats.iter().filter(|s| s.seat_index != actor && s.can_act()) {
                if lock && !self.needs_to_act.contains(s.seat_index) {
                    self.raise_locked.insert(s.seat_index);
                }
                self.needs_to_act.insert(s.seat_index);
            }
        }
        let put_in = to.saturating_sub(self.seats[pos].current_bet);
        self.pot += self.seats[pos].commit(put_in);
    }

    fn next_street(&mut self) -> ActionOutcome {
        for s in &mut self.seats {
            s.current_bet = 0;
        }
        self.current_bet = 0;
        self.min_raise = self.settings.big_blind;
        self.raise_locked.clear();
        self.needs_to_act.clear();
        self.current = None;

        let (next, reveal) = match self.phase {
            Phase::Preflop => (Phase::Flop, 3),
            Phase::Flop => (Phase::Turn, 1),
            Phase::Turn => (Phase::River, 1),
            _ => return self.showdown(),
        };
        self.deck.burn_card();
        let cards = self.deck.deal_cards(reveal);
        self.community.extend(cards);
        self.phase = next;

        if self.seats.iter().filter(|s| s.can_act()).count() >= 2 {
            for s in self.seats.iter().filter(|s| s.can_act()) {
                self.needs_to_act.insert(s.seat_index);
            }
            let d = self
                .dealer_seat
                .and_then(|seat| self.position_of(seat))
                .unwrap_or(0);
            self.current = self.next_to_act(d);
        }
        if self.current.is_none() {
            self.runout = true;
        }

        // hands go face up with the first street dealt without betting
        let revealed = if self.runout && !self.revealed {
            self.revealed = true;
            Some(
                self.seats
                    .iter()
                    .filter(|s| !s.folded)
                    .filter_map(|s| {
                        s.hole_cards().map(|cards| RevealedHand {
                            seat_index: s.seat_index,
                            cards,
                        })
                    })
                    .collect(),
            )
        } else {
            None
        };
        self.debug_check_invariants();
        debug!(phase = %self.phase, pot = self.pot, runout = self.runout, "street dealt");

        ActionOutcome::PhaseAdvanced {
            phase: self.phase,
            community_cards: self.community.clone(),
            pot: self.pot,
            current_player_seat: self.current_player_seat(),
            all_in_runout: self.runout,
            revealed,
        }
    }

    fn finish_uncontested(&mut self, pos: usize) -> ActionOutcome {
        let amount = self.pot;
        self.seats[pos].chips += amount;
        self.pot = 0;
        self.phase = Phase::Complete;
        self.current = None;
        self.needs_to_act.clear();

        let winner = &self.seats[pos];
        info!(
            hand = self.hand_number,
            seat = winner.seat_index,
            amount,
            "hand won uncontested"
        );
        ActionOutcome::HandComplete {
            winners: vec![Winner {
                seat_index: winner.seat_index,
                username: winner.username.clone(),
                amount,
            }],
            players: self.summaries(),
        }
    }

    fn showdown(&mut self) -> ActionOutcome {
        self.phase = Phase::Showdown;
        let before = self.chips_in_play();

        let best: Vec<Option<BestHand>> = self
            .seats
            .iter()
            .map(|s| {
                if s.folded {
                    return None;
                }
                let mut cards = s.hole_cards()?.to_vec();
                cards.extend_from_slice(&self.community);
                best_hand_of(&cards).ok()
            })
            .collect();

        let mut pot_results = Vec::new();
        for pot in compute_side_pots(&self.seats) {
            let contenders: Vec<(usize, _)> = self
                .seats
                .iter()
                .enumerate()
                .filter(|(_, s)| pot.eligible.contains(&s.seat_index))
                .filter_map(|(i, _)| best[i].as_ref().map(|b| (i, b.score)))
                .collect();
            let Some(top) = contenders.iter().map(|c| c.1).max() else {
                continue;
            };
            // positions follow seat order, so odd chips go to the lowest seats
            let winners: Vec<usize> = contenders
                .iter()
                .filter(|c| c.1 == top)
                .map(|c| c.0)
                .collect();
            let count = winners.len() as u32;
            let share = pot.amount / count;
            let remainder = pot.amount % count;

            let mut awarded = Vec::with_capacity(winners.len());
            for (k, &i) in winners.iter().enumerate() {
                let prize = share + u32::from((k as u32) < remainder);
                let seat = &mut self.seats[i];
                seat.chips += prize;
                awarded.push(Winner {
                    seat_index: seat.seat_index,
                    username: seat.username.clone(),
                    amount: prize,
                });
            }
            pot_results.push(PotResult {
                amount: pot.amount,
                winners: awarded,
            });
        }
        self.pot = 0;
        self.phase = Phase::Complete;
        debug_assert_eq!(before, self.chips_in_play(), "showdown lost chips");

        info!(
            hand = self.hand_number,
            pots = pot_results.len(),
            "showdown settled"
        );

        let players = self
            .seats
            .iter()
            .zip(best)
            .map(|(s, best_hand)| ShowdownSeat {
                seat_index: s.seat_index,
                username: s.username.clone(),
                hole: if s.folded { None } else { s.hole_cards() },
                best_hand,
                chips: s.chips,
                folded: s.folded,
            })
            .collect();
        ActionOutcome::Showdown {
            community_cards: self.community.clone(),
            pot_results,
            players,
        }
    }

    fn summaries(&self) -> Vec<SeatSummary> {
        self.seats
            .iter()
            .map(|s| SeatSummary {
                seat_index: s.seat_index,
                chips: s.chips,
                folded: s.folded,
            })
            .collect()
    }

    fn debug_check_invariants(&self) {
        if !cfg!(debug_assertions) {
            return;
        }
        let committed: u32 = self.seats.iter().map(|s| s.total_bet).sum();
        debug_assert_eq!(committed, self.pot, "pot out of sync with bets");
        let top = self
            .seats
            .iter()
            .filter(|s| !s.folded)
            .map(|s| s.current_bet)
            .max()
            .unwrap_or(0);
        if self.phase == Phase::Preflop {
            // a short big blind still leaves the full blind to call
            debug_assert!(self.current_bet >= top, "table bet below a live bet");
        } else {
            debug_assert_eq!(self.current_bet, top, "table bet out of sync");
        }
        for s in &self.seats {
            debug_assert!(!s.all_in || s.chips == 0, "all-in seat holds chips");
            if !s.can_act() {
                debug_assert!(
                    !self.needs_to_act.contains(s.seat_index),
                    "inactive seat {} still owes an action",
                    s.seat_index
                );
            }
        }
        debug_assert!(self.seats.len() >= 2);
    }
}
