use crate::cards::Card;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DeckError {
    #[error("deck exhausted: wanted {wanted} cards, {remaining} remaining")]
    Exhausted { wanted: usize, remaining: usize },
    #[error("card {0} listed twice")]
    Duplicate(Card),
}

/// The cards not yet dealt in one hand (or one simulation trial).
///
/// A deck is built fresh for every hand and never reused, so
/// `remaining + in play == 52` holds for its whole lifetime.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// ```
    /// use holdem_sim::deck::Deck;
    ///
    /// let deck = Deck::standard();
    /// assert_eq!(deck.len(), 52);
    /// ```
    pub fn standard() -> Self {
        Self { cards: Card::all().collect() }
    }

    /// A standard deck with `known` cards taken out, e.g. the hole cards and
    /// board already visible to a simulation.
    pub fn without<'a, I>(known: I) -> Self
    where
        I: IntoIterator<Item = &'a Card>,
    {
        let mut deck = Self::standard();
        deck.remove_all(known);
        deck
    }

    /// A deck that deals `top` first, in that order, then the remaining
    /// cards of a standard deck.
    ///
    /// ```
    /// use holdem_sim::cards::parse_cards;
    /// use holdem_sim::deck::Deck;
    ///
    /// let mut deck = Deck::stacked(&parse_cards("As Kd").unwrap()).unwrap();
    /// assert_eq!(deck.deal(2).unwrap(), parse_cards("As Kd").unwrap());
    /// assert_eq!(deck.len(), 50);
    /// ```
    pub fn stacked(top: &[Card]) -> Result<Self, DeckError> {
        let mut deck = Self::standard();
        for &card in top {
            if !deck.remove(card) {
                return Err(DeckError::Duplicate(card));
            }
        }
        deck.cards.extend(top.iter().rev());
        Ok(deck)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn contains(&self, card: Card) -> bool {
        self.cards.contains(&card)
    }

    /// Shuffle using a seeded RNG for reproducibility.
    pub fn shuffle_seeded(&mut self, seed: u64) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.cards.shuffle(&mut rng);
    }

    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    /// Remove a specific card. Returns false when it was already gone.
    pub fn remove(&mut self, card: Card) -> bool {
        match self.cards.iter().position(|&c| c == card) {
            Some(i) => {
                self.cards.swap_remove(i);
                true
            }
            None => false,
        }
    }

    pub fn remove_all<'a, I>(&mut self, cards: I)
    where
        I: IntoIterator<Item = &'a Card>,
    {
        for &card in cards {
            self.remove(card);
        }
    }

    /// Deal one card from the top.
    pub fn draw(&mut self) -> Result<Card, DeckError> {
        self.cards.pop().ok_or(DeckError::Exhausted { wanted: 1, remaining: 0 })
    }

    /// Deal `n` cards from the top. Nothing is dealt when fewer than `n` remain.
    pub fn deal(&mut self, n: usize) -> Result<Vec<Card>, DeckError> {
        if n > self.cards.len() {
            return Err(DeckError::Exhausted { wanted: n, remaining: self.cards.len() });
        }
        let at = self.cards.len() - n;
        let mut dealt = self.cards.split_off(at);
        dealt.reverse();
        Ok(dealt)
    }

    /// Discard the top card face down.
    pub fn burn(&mut self) -> Result<(), DeckError> {
        self.draw().map(|_| ())
    }
}
