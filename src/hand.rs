use crate::cards::{parse_cards, Card};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HandError {
    #[error("duplicate cards in hole cards")]
    DuplicateHoleCards,
    #[error("too many board cards: {0}")]
    TooManyBoardCards(usize),
    #[error("duplicate cards on board")]
    DuplicateBoardCards,
    #[error("card {0} appears more than once across hands and board")]
    Overlap(Card),
    #[error("expected exactly two hole cards, got {0}")]
    HoleCount(usize),
    #[error("card parse error: {0}")]
    CardParse(String),
}

/// A player's two private cards.
///
/// ```
/// use holdem_sim::hand::HoleCards;
///
/// let hole: HoleCards = "As Kd".parse().unwrap();
/// assert_eq!(hole.as_array().len(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HoleCards(Card, Card);

impl HoleCards {
    pub fn try_new(a: Card, b: Card) -> Result<Self, HandError> {
        if a == b {
            return Err(HandError::DuplicateHoleCards);
        }
        Ok(Self(a, b))
    }

    pub fn from_slice(slice: &[Card]) -> Result<Self, HandError> {
        match slice {
            [a, b] => Self::try_new(*a, *b),
            _ => Err(HandError::HoleCount(slice.len())),
        }
    }

    pub fn first(&self) -> Card {
        self.0
    }

    pub fn second(&self) -> Card {
        self.1
    }

    pub fn as_array(&self) -> [Card; 2] {
        [self.0, self.1]
    }

    pub fn contains(&self, card: Card) -> bool {
        self.0 == card || self.1 == card
    }

    /// Hole cards followed by `board`, ready for scoring.
    pub fn with_board(&self, board: &[Card]) -> Vec<Card> {
        let mut cards = Vec::with_capacity(2 + board.len());
        cards.push(self.0);
        cards.push(self.1);
        cards.extend_from_slice(board);
        cards
    }
}

impl FromStr for HoleCards {
    type Err = HandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cards = parse_cards(s).map_err(|e| HandError::CardParse(e.to_string()))?;
        Self::from_slice(&cards)
    }
}

/// Community cards: empty preflop, then 3, 4 and 5.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cards: Vec<Card>,
}

impl Board {
    pub fn empty() -> Self {
        Self { cards: Vec::with_capacity(5) }
    }

    pub fn try_new(cards: Vec<Card>) -> Result<Self, HandError> {
        if cards.len() > 5 {
            return Err(HandError::TooManyBoardCards(cards.len()));
        }
        let set: HashSet<Card> = cards.iter().copied().collect();
        if set.len() != cards.len() {
            return Err(HandError::DuplicateBoardCards);
        }
        Ok(Self { cards })
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.cards.len() == 5
    }

    pub fn as_slice(&self) -> &[Card] {
        &self.cards
    }

    pub(crate) fn extend<I>(&mut self, cards: I)
    where
        I: IntoIterator<Item = Card>,
    {
        self.cards.extend(cards);
    }
}

impl FromStr for Board {
    type Err = HandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cards = parse_cards(s).map_err(|e| HandError::CardParse(e.to_string()))?;
        Board::try_new(cards)
    }
}

/// Check that no card is shared between any set of hole cards and the board.
pub fn validate_table(holes: &[HoleCards], board: &[Card]) -> Result<(), HandError> {
    if board.len() > 5 {
        return Err(HandError::TooManyBoardCards(board.len()));
    }
    let mut seen: HashSet<Card> = HashSet::with_capacity(holes.len() * 2 + board.len());
    for card in holes.iter().flat_map(|h| h.as_array()).chain(board.iter().copied()) {
        if !seen.insert(card) {
            return Err(HandError::Overlap(card));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Rank, Suit};

    #[test]
    fn hole_cards_must_be_distinct() {
        let a = Card::new(Rank::Ace, Suit::Spades);
        assert!(matches!(HoleCards::try_new(a, a), Err(HandError::DuplicateHoleCards)));
        assert!(matches!(HoleCards::from_slice(&[a]), Err(HandError::HoleCount(1))));
    }

    #[test]
    fn board_limits_and_dupes() {
        let six: Vec<Card> = Card::all().take(6).collect();
        assert!(matches!(Board::try_new(six), Err(HandError::TooManyBoardCards(6))));
        let c = Card::new(Rank::Two, Suit::Clubs);
        assert!(matches!(Board::try_new(vec![c, c]), Err(HandError::DuplicateBoardCards)));
        let board: Board = "2c 3c 4c 5c 6c".parse().unwrap();
        assert!(board.is_complete());
    }

    #[test]
    fn validate_table_reports_shared_card() {
        let a: HoleCards = "As Kd".parse().unwrap();
        let b: HoleCards = "Qh Kd".parse().unwrap();
        let kd = Card::new(Rank::King, Suit::Diamonds);
        assert_eq!(validate_table(&[a, b], &[]), Err(HandError::Overlap(kd)));

        let board = [Card::new(Rank::Ace, Suit::Spades)];
        assert!(validate_table(&[a], &board).is_err());
        assert!(validate_table(&[a], &[Card::new(Rank::Two, Suit::Hearts)]).is_ok());
    }

    #[test]
    fn with_board_prepends_hole() {
        let hole: HoleCards = "As Kd".parse().unwrap();
        let board: Board = "2c 3c 4c".parse().unwrap();
        let all = hole.with_board(board.as_slice());
        assert_eq!(all.len(), 5);
        assert_eq!(all[0], hole.first());
    }
}
