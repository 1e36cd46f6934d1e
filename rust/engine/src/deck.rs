use std::collections::VecDeque;
use std::fmt;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::cards::{full_deck, Card};

/// An ordered 52-card deck. Cards are dealt from the top (index 0 first).
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
    position: usize,
}

impl Deck {
    /// Deck in factory order (spades 2..A, hearts, diamonds, clubs).
    pub fn ordered() -> Self {
        Self {
            cards: full_deck(),
            position: 0,
        }
    }

    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut cards = full_deck();
        cards.shuffle(rng);
        Self { cards, position: 0 }
    }

    pub fn new_with_seed(seed: u64) -> Self {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        Self::shuffled(&mut rng)
    }

    /// Puts `top` on top of the deck in the given order; the remaining cards
    /// follow in factory order. Duplicates in `top` are ignored.
    pub fn stacked(top: &[Card]) -> Self {
        let mut cards: Vec<Card> = Vec::with_capacity(52);
        for c in top {
            if !cards.contains(c) {
                cards.push(*c);
            }
        }
        for c in full_deck() {
            if !cards.contains(&c) {
                cards.push(c);
            }
        }
        Self { cards, position: 0 }
    }

    pub fn deal_card(&mut self) -> Option<Card> {
        let c = self.cards.get(self.position).copied()?;
        self.position += 1;
        Some(c)
    }

    pub fn deal_cards(&mut self, n: usize) -> Vec<Card> {
        (0..n).filter_map(|_| self.deal_card()).collect()
    }

    pub fn burn_card(&mut self) {
        let _ = self.deal_card();
    }

    pub fn remaining(&self) -> usize {
        self.cards.len().saturating_sub(self.position)
    }
}

/// Supplies a fresh deck for every hand. The table never shuffles on its own,
/// so tests can pin the card order by injecting a source.
pub trait DeckSource: Send + fmt::Debug {
    fn next_deck(&mut self) -> Deck;
}

/// ChaCha20-backed shuffler. The same seed reproduces the same sequence of decks.
#[derive(Debug)]
pub struct SeededShuffle {
    seed: u64,
    rng: ChaCha20Rng,
}

impl SeededShuffle {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    /// Seeds from the thread-local generator.
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl DeckSource for SeededShuffle {
    fn next_deck(&mut self) -> Deck {
        Deck::shuffled(&mut self.rng)
    }
}

/// Hands out pre-arranged decks in order, then falls back to seeded shuffling.
#[derive(Debug)]
pub struct StackedDecks {
    decks: VecDeque<Deck>,
    fallback: SeededShuffle,
}

impl StackedDecks {
    pub fn new<I: IntoIterator<Item = Deck>>(decks: I) -> Self {
        Self {
            decks: decks.into_iter().collect(),
            fallback: SeededShuffle::new(0),
        }
    }

    pub fn single(top: &[Card]) -> Self {
        Self::new([Deck::stacked(top)])
    }
}

impl DeckSource for StackedDecks {
    fn next_deck(&mut self) -> Deck {
        self.decks
            .pop_front()
            .unwrap_or_else(|| self.fallback.next_deck())
    }
}
