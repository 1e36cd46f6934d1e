use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::deck::{DeckSource, SeededShuffle};
use crate::errors::GameError;
use crate::events::{ActionOutcome, HandStart};
use crate::game::Game;
use crate::player::{PlayerAction, SeatIndex, SeatedPlayer, MAX_SEATS};
use crate::settings::TableSettings;

/// Drives one table from hand to hand.
///
/// Keeps the roster of seated players between hands, feeds it into
/// [`Game::start_hand`], deals all-in run-outs without waiting for input,
/// writes final stacks back after every hand and removes players who went
/// broke.
///
/// # Examples
///
/// ```
/// use holdem_engine::engine::Engine;
/// use holdem_engine::player::PlayerAction;
/// use holdem_engine::settings::TableSettings;
///
/// let mut engine = Engine::with_seed(TableSettings::default(), 42);
/// engine.sit(0, "alice").unwrap();
/// engine.sit(3, "bob").unwrap();
///
/// let (start, _) = engine.start_hand().unwrap();
/// let actor = start.current_player_seat.unwrap();
/// let outcomes = engine.act(actor, PlayerAction::AllIn).unwrap();
/// assert!(!outcomes.is_empty());
/// ```
#[derive(Debug)]
pub struct Engine {
    game: Game,
    roster: BTreeMap<SeatIndex, SeatedPlayer>,
    busted: Vec<SeatedPlayer>,
    seed: Option<u64>,
}

impl Engine {
    pub fn new(settings: TableSettings, deck_source: impl DeckSource + 'static) -> Self {
        Self {
            game: Game::new(settings, deck_source),
            roster: BTreeMap::new(),
            busted: Vec::new(),
            seed: None,
        }
    }

    pub fn with_seed(settings: TableSettings, seed: u64) -> Self {
        let mut engine = Self::new(settings, SeededShuffle::new(seed));
        engine.seed = Some(seed);
        engine
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn roster(&self) -> impl Iterator<Item = &SeatedPlayer> {
        self.roster.values()
    }

    pub fn player(&self, seat: SeatIndex) -> Option<&SeatedPlayer> {
        self.roster.get(&seat)
    }

    /// Players removed with an empty stack at the end of the last hand.
    pub fn busted(&self) -> &[SeatedPlayer] {
        &self.busted
    }

    /// Seats a new player with the table's starting stack.
    pub fn sit(&mut self, seat: SeatIndex, username: impl Into<String>) -> Result<(), GameError> {
        if self.game.phase().is_betting() {
            return Err(GameError::HandInProgress);
        }
        if seat >= MAX_SEATS {
            return Err(GameError::InvalidSeat(seat));
        }
        if self.roster.contains_key(&seat) {
            return Err(GameError::SeatOccupied(seat));
        }
        let chips = self.game.settings().starting_stack;
        self.roster
            .insert(seat, SeatedPlayer::new(seat, username, chips));
        Ok(())
    }

    pub fn stand(&mut self, seat: SeatIndex) -> Result<SeatedPlayer, GameError> {
        if self.game.phase().is_betting() {
            return Err(GameError::HandInProgress);
        }
        self.roster.remove(&seat).ok_or(GameError::SeatEmpty(seat))
    }

    /// Starts the next hand. When every seat is all-in from the blinds the
    /// whole run-out is dealt immediately and returned alongside.
    pub fn start_hand(&mut self) -> Result<(HandStart, Vec<ActionOutcome>), GameError> {
        let players: Vec<SeatedPlayer> = self.roster.values().cloned().collect();
        let start = self.game.start_hand(&players)?;
        self.busted.clear();
        let mut outcomes = Vec::new();
        self.run_out(&mut outcomes)?;
        Ok((start, outcomes))
    }

    /// Applies one action and then anything that follows without input.
    pub fn act(
        &mut self,
        seat: SeatIndex,
        action: PlayerAction,
    ) -> Result<Vec<ActionOutcome>, GameError> {
        let outcome = self.game.handle_action(seat, action)?;
        let mut outcomes = Vec::new();
        self.record(outcome, &mut outcomes);
        self.run_out(&mut outcomes)?;
        Ok(outcomes)
    }

    /// Acts for a seat whose turn timer ran out.
    pub fn act_on_timeout(&mut self, seat: SeatIndex) -> Result<Vec<ActionOutcome>, GameError> {
        let action = self
            .game
            .timeout_action(seat)
            .ok_or(GameError::NotYourTurn { seat })?;
        warn!(seat, action = ?action, "turn timed out");
        self.act(seat, action)
    }

    fn run_out(&mut self, outcomes: &mut Vec<ActionOutcome>) -> Result<(), GameError> {
        while self.game.is_runout() {
            let outcome = self.game.advance_runout()?;
            self.record(outcome, outcomes);
        }
        Ok(())
    }

    fn record(&mut self, outcome: ActionOutcome, outcomes: &mut Vec<ActionOutcome>) {
        if let Some(stacks) = outcome.final_chips() {
            self.settle(&stacks);
        }
        outcomes.push(outcome);
    }

    fn settle(&mut self, stacks: &[(SeatIndex, u32)]) {
        for &(seat, chips) in stacks {
            if let Some(p) = self.roster.get_mut(&seat) {
                p.chips = chips;
            }
        }
        let broke: Vec<SeatIndex> = self
            .roster
            .values()
            .filter(|p| p.chips == 0)
            .map(|p| p.seat_index)
            .collect();
        for seat in broke {
            if let Some(p) = self.roster.remove(&seat) {
                info!(seat, username = %p.username, "player busted");
                self.busted.push(p);
            }
        }
    }
}
