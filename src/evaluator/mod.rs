pub(crate) mod combinations;
pub(crate) mod hand_analysis;
pub(crate) mod rank_groups;

use crate::cards::{Card, Rank};
use crate::hand::{validate_table, HandError, HoleCards};
use hand_analysis::HandAnalysis;
use rank_groups::RankGroups;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Poker hand category from weakest (1) to strongest (9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Category {
    HighCard = 1,
    OnePair = 2,
    TwoPair = 3,
    ThreeOfAKind = 4,
    Straight = 5,
    Flush = 6,
    FullHouse = 7,
    FourOfAKind = 8,
    StraightFlush = 9,
}

impl Category {
    pub const fn value(self) -> u8 {
        self as u8
    }

    pub const fn label(self) -> &'static str {
        match self {
            Category::HighCard => "High Card",
            Category::OnePair => "One Pair",
            Category::TwoPair => "Two Pair",
            Category::ThreeOfAKind => "Three of a Kind",
            Category::Straight => "Straight",
            Category::Flush => "Flush",
            Category::FullHouse => "Full House",
            Category::FourOfAKind => "Four of a Kind",
            Category::StraightFlush => "Straight Flush",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Category plus tiebreak ranks. Ordering is category first, then the
/// tiebreak sequence lexicographically, so `max` finds the best hand and
/// equal scores are exact ties.
///
/// ```
/// use holdem_sim::cards::parse_cards;
/// use holdem_sim::evaluator::{score, Category};
///
/// let quads = score(&parse_cards("As Ad Ac Ah Ks").unwrap()).unwrap();
/// assert_eq!(quads.category(), Category::FourOfAKind);
/// assert_eq!(quads.tiebreak(), &[14, 13]);
///
/// let boat = score(&parse_cards("2c 2d 3c 3d 3s").unwrap()).unwrap();
/// assert!(quads > boat);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct HandScore {
    category: Category,
    ranks: [u8; 5],
    len: u8,
}

impl HandScore {
    fn new(category: Category, tiebreak: &[Rank]) -> Self {
        let mut ranks = [0u8; 5];
        for (slot, r) in ranks.iter_mut().zip(tiebreak) {
            *slot = r.value();
        }
        Self { category, ranks, len: tiebreak.len().min(5) as u8 }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Numeric ranks (2..=14) that break ties within the category.
    pub fn tiebreak(&self) -> &[u8] {
        &self.ranks[..self.len as usize]
    }

    /// Ace-high straight flush.
    pub fn is_royal(&self) -> bool {
        self.category == Category::StraightFlush && self.ranks[0] == Rank::Ace.value()
    }
}

impl fmt::Display for HandScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_royal() {
            return f.write_str("Royal Flush");
        }
        write!(f, "{} {:?}", self.category, self.tiebreak())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EvalError {
    #[error("need at least 5 cards to score, got {0}")]
    NotEnoughCards(usize),
    #[error("card {0} appears twice")]
    DuplicateCard(Card),
    #[error("invalid hand: {0}")]
    Hand(#[from] HandError),
}

/// Score the best five-card hand contained in `cards` (five or more).
///
/// Aces only count high: A-2-3-4-5 is not a straight.
///
/// ```
/// use holdem_sim::cards::parse_cards;
/// use holdem_sim::evaluator::{score, Category};
///
/// let royal = score(&parse_cards("10s Js Qs Ks As").unwrap()).unwrap();
/// assert_eq!(royal.category(), Category::StraightFlush);
/// assert_eq!(royal.tiebreak(), &[14]);
/// ```
pub fn score(cards: &[Card]) -> Result<HandScore, EvalError> {
    if cards.len() < 5 {
        return Err(EvalError::NotEnoughCards(cards.len()));
    }
    check_distinct(cards)?;

    let best = combinations::FiveOf::new(cards.len())
        .map(|idx| score_five(&idx.map(|i| cards[i])))
        .max();
    best.ok_or(EvalError::NotEnoughCards(cards.len()))
}

/// Score exactly five cards.
pub fn score_five(cards: &[Card; 5]) -> HandScore {
    let a = HandAnalysis::new(cards);
    let g = &a.rank_groups;

    if let (true, Some(top)) = (a.is_flush, a.straight_top) {
        return HandScore::new(Category::StraightFlush, &[top]);
    }
    if let Some(quad) = g.quad() {
        let mut tiebreak = vec![quad];
        tiebreak.extend(a.ranks.iter().copied().find(|&r| r != quad));
        return HandScore::new(Category::FourOfAKind, &tiebreak);
    }
    if let (Some(trips), Some(&pair)) = (g.trips(), g.pairs().first()) {
        return HandScore::new(Category::FullHouse, &[trips, pair]);
    }
    if a.is_flush {
        return HandScore::new(Category::Flush, &a.ranks);
    }
    if let Some(top) = a.straight_top {
        return HandScore::new(Category::Straight, &[top]);
    }
    if let Some(trips) = g.trips() {
        return HandScore::new(Category::ThreeOfAKind, &with_kickers(&[trips], g));
    }
    match g.pairs().as_slice() {
        [hi, lo, ..] => HandScore::new(Category::TwoPair, &with_kickers(&[*hi, *lo], g)),
        [pair] => HandScore::new(Category::OnePair, &with_kickers(&[*pair], g)),
        [] => HandScore::new(Category::HighCard, &a.ranks),
    }
}

fn with_kickers(made: &[Rank], groups: &RankGroups) -> Vec<Rank> {
    let mut out = made.to_vec();
    out.extend(groups.kickers());
    out
}

/// Score hole cards together with a board of at least three cards.
pub fn score_holdem(hole: &HoleCards, board: &[Card]) -> Result<HandScore, EvalError> {
    validate_table(std::slice::from_ref(hole), board)?;
    score(&hole.with_board(board))
}

/// Best category reachable with the cards seen so far.
///
/// With five or more cards this is the full evaluation; with fewer (preflop
/// hole cards, or hole cards plus a short board) only rank multiplicities
/// count, so the result is at most Four of a Kind.
pub fn best_category(cards: &[Card]) -> Category {
    match score(cards) {
        Ok(s) => s.category(),
        Err(_) => partial_category(cards),
    }
}

/// Category from rank multiplicities alone.
pub fn partial_category(cards: &[Card]) -> Category {
    let g = RankGroups::from_cards(cards);
    let pairs = g.pairs().len();
    if g.quad().is_some() {
        Category::FourOfAKind
    } else if g.trips().is_some() && pairs > 0 {
        Category::FullHouse
    } else if g.trips().is_some() {
        Category::ThreeOfAKind
    } else if pairs >= 2 {
        Category::TwoPair
    } else if pairs == 1 {
        Category::OnePair
    } else {
        Category::HighCard
    }
}

fn check_distinct(cards: &[Card]) -> Result<(), EvalError> {
    let mut seen: u64 = 0;
    for &c in cards {
        let bit = 1u64 << (c.suit().index() * 13 + (c.rank().value() as usize - 2));
        if seen & bit != 0 {
            return Err(EvalError::DuplicateCard(c));
        }
        seen |= bit;
    }
    Ok(())
}
