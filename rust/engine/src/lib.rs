//! # holdem-engine: Texas Hold'em Table Engine
//!
//! Rules engine for one no-limit Hold'em table with 2 to 10 seats: hand
//! evaluation, the betting state machine (blinds, turn order,
//! call/raise/all-in/fold), side pots and showdown payout.
//!
//! Lobbies, transports and UIs sit outside the crate. They call
//! [`game::Game::start_hand`], then [`game::Game::available_actions`] and
//! [`game::Game::handle_action`] as players act, and broadcast the
//! [`events::ActionOutcome`] records that come back.
//! [`engine::Engine`] is a ready-made driver for that loop.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation and text parsing
//! - [`deck`] - Deck, dealing and injectable shufflers
//! - [`hand`] - Five-card evaluation and best-of-seven search
//! - [`pot`] - Side pot construction
//! - [`player`] - Seats, seated players and actions
//! - [`rules`] - Action menus and action validation
//! - [`game`] - Per-hand state machine
//! - [`events`] - Result records returned to the driver
//! - [`engine`] - Table driver across hands
//! - [`logger`] - JSONL hand history
//! - [`settings`] - Stakes and rule switches
//! - [`errors`] - Error types
//!
//! ## Quick Start
//!
//! ```rust
//! use holdem_engine::cards::parse_cards;
//! use holdem_engine::hand::{best_hand_of, Category};
//!
//! let cards = parse_cards("As Ks Qs Js Ts 2d 2c").unwrap();
//! let best = best_hand_of(&cards).unwrap();
//! assert_eq!(best.score.category, Category::RoyalFlush);
//! assert_eq!(best.name, "Royal Flush");
//! ```
//!
//! ## Deterministic Dealing
//!
//! Shuffling goes through a [`deck::DeckSource`]; a seeded source replays
//! the same decks:
//!
//! ```rust
//! use holdem_engine::deck::{DeckSource, SeededShuffle};
//!
//! let mut a = SeededShuffle::new(42);
//! let mut b = SeededShuffle::new(42);
//! assert_eq!(a.next_deck().deal_cards(5), b.next_deck().deal_cards(5));
//! ```

pub mod cards;
pub mod deck;
pub mod engine;
pub mod errors;
pub mod events;
pub mod game;
pub mod hand;
pub mod logger;
pub mod player;
pub mod pot;
pub mod rules;
pub mod settings;
