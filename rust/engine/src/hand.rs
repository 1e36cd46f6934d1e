use std::cmp::Ordering;

use serde::Serialize;

use crate::cards::Card;
use crate::errors::GameError;

/// Hand categories in ascending strength. The discriminant is the public rank (0..=9).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize)]
pub enum Category {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
    RoyalFlush = 9,
}

impl Category {
    pub fn rank(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Category::HighCard => "High Card",
            Category::OnePair => "Pair",
            Category::TwoPair => "Two Pair",
            Category::ThreeOfAKind => "Three of a Kind",
            Category::Straight => "Straight",
            Category::Flush => "Flush",
            Category::FullHouse => "Full House",
            Category::FourOfAKind => "Four of a Kind",
            Category::StraightFlush => "Straight Flush",
            Category::RoyalFlush => "Royal Flush",
        }
    }
}

/// Score of a five-card hand. Field order makes the derived `Ord` compare the
/// category first and then the kickers lexicographically; unused kicker slots
/// are zero.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize)]
pub struct HandScore {
    pub category: Category,
    // tiebreak values, high -> low
    pub kickers: [u8; 5],
}

impl HandScore {
    pub fn rank(&self) -> u8 {
        self.category.rank()
    }

    pub fn name(&self) -> &'static str {
        self.category.name()
    }
}

/// The strongest five cards found in a 5..=7 card set.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct BestHand {
    pub score: HandScore,
    pub cards: [Card; 5],
    pub name: &'static str,
}

pub fn compare_scores(a: &HandScore, b: &HandScore) -> Ordering {
    a.cmp(b)
}

pub fn evaluate_five(cards: &[Card; 5]) -> HandScore {
    let mut vals = cards.map(|c| c.rank.value());
    vals.sort_unstable_by(|a, b| b.cmp(a));

    let is_flush = cards.iter().all(|c| c.suit == cards[0].suit);
    let distinct = vals.windows(2).all(|w| w[0] != w[1]);
    let straight_high = if distinct && vals[0] - vals[4] == 4 {
        Some(vals[0])
    } else if vals == [14, 5, 4, 3, 2] {
        Some(5)
    } else {
        None
    };

    // (count, value), most frequent first, then highest value
    let mut groups: Vec<(u8, u8)> = Vec::with_capacity(5);
    for &v in &vals {
        match groups.last_mut() {
            Some((count, value)) if *value == v => *count += 1,
            _ => groups.push((1, v)),
        }
    }
    groups.sort_unstable_by(|a, b| b.0.cmp(&a.0).then(b.1.cmp(&a.1)));
    let counts: Vec<u8> = groups.iter().map(|g| g.0).collect();
    let by_group = pack(groups.iter().map(|g| g.1));

    let (category, kickers) = match (straight_high, is_flush, counts.as_slice()) {
        (Some(14), true, _) => (Category::RoyalFlush, pack([14])),
        (Some(high), true, _) => (Category::StraightFlush, pack([high])),
        (_, _, [4, ..]) => (Category::FourOfAKind, by_group),
        (_, _, [3, 2]) => (Category::FullHouse, by_group),
        (_, true, _) => (Category::Flush, vals),
        (Some(high), false, _) => (Category::Straight, pack([high])),
        (_, _, [3, ..]) => (Category::ThreeOfAKind, by_group),
        (_, _, [2, 2, ..]) => (Category::TwoPair, by_group),
        (_, _, [2, ..]) => (Category::OnePair, by_group),
        _ => (Category::HighCard, vals),
    };
    HandScore { category, kickers }
}

fn pack<I: IntoIterator<Item = u8>>(values: I) -> [u8; 5] {
    let mut k = [0u8; 5];
    for (slot, v) in k.iter_mut().zip(values) {
        *slot = v;
    }
    k
}

/// Picks the best five cards out of 5..=7 by scoring every five-card subset.
pub fn best_hand_of(cards: &[Card]) -> Result<BestHand, GameError> {
    let n = cards.len();
    if !(5..=7).contains(&n) {
        return Err(GameError::InvalidCardCount(n));
    }
    let mut best: Option<(HandScore, [Card; 5])> = None;
    for idx in FiveOf::new(n) {
        let five = idx.map(|i| cards[i]);
        let score = evaluate_five(&five);
        match &best {
            Some((top, _)) if score <= *top => {}
            _ => best = Some((score, five)),
        }
    }
    match best {
        Some((score, cards)) => Ok(BestHand {
            score,
            cards,
            name: score.name(),
        }),
        None => Err(GameError::InvalidCardCount(n)),
    }
}

/// Index combinations of 5 out of `n`, in lexicographic order.
struct FiveOf {
    n: usize,
    next: Option<[usize; 5]>,
}

impl FiveOf {
    fn new(n: usize) -> Self {
        Self {
            n,
            next: (n >= 5).then_some([0, 1, 2, 3, 4]),
        }
    }
}

impl Iterator for FiveOf {
    type Item = [usize; 5];

    fn next(&mut self) -> Option<[usize; 5]> {
        let current = self.next?;
        let mut idx = current;
        // rightmost slot that can still move right
        let movable = (0..5).rev().find(|&i| idx[i] < self.n - 5 + i);
        self.next = movable.map(|i| {
            idx[i] += 1;
            for j in i + 1..5 {
                idx[j] = idx[j - 1] + 1;
            }
            idx
        });
        Some(current)
    }
}
