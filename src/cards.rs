use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Card ranks from Two (low) to Ace (high). Aces only ever count as 14.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Rank {
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
    Six = 6,
    Seven = 7,
    Eight = 8,
    Nine = 9,
    Ten = 10,
    Jack = 11,
    Queen = 12,
    King = 13,
    Ace = 14,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    /// Numeric value used for straights and tiebreaks (2..=14).
    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Inverse of [`Rank::value`].
    pub fn from_value(v: u8) -> Option<Rank> {
        if (2..=14).contains(&v) {
            Some(Rank::ALL[(v - 2) as usize])
        } else {
            None
        }
    }

    /// Face label as printed on the card ("10", "J", ...).
    pub const fn label(self) -> &'static str {
        match self {
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RankParseError {
    #[error("invalid rank: '{0}'")]
    Invalid(String),
}

impl FromStr for Rank {
    type Err = RankParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let found = match upper.as_str() {
            "T" => Some(Rank::Ten),
            "ACE" => Some(Rank::Ace),
            "KING" => Some(Rank::King),
            "QUEEN" => Some(Rank::Queen),
            "JACK" => Some(Rank::Jack),
            other => Rank::ALL.iter().copied().find(|r| r.label() == other),
        };
        found.ok_or_else(|| RankParseError::Invalid(s.to_string()))
    }
}

/// The four suits. The ordering carries no hand-strength meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Suit {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];

    pub const fn to_char(self) -> char {
        match self {
            Suit::Hearts => 'h',
            Suit::Diamonds => 'd',
            Suit::Clubs => 'c',
            Suit::Spades => 's',
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Suit::Hearts => "Hearts",
            Suit::Diamonds => "Diamonds",
            Suit::Clubs => "Clubs",
            Suit::Spades => "Spades",
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SuitParseError {
    #[error("invalid suit: '{0}'")]
    Invalid(String),
}

impl FromStr for Suit {
    type Err = SuitParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        let mut chars = t.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Suit::try_from(c);
        }
        Suit::ALL
            .iter()
            .copied()
            .find(|suit| suit.name().eq_ignore_ascii_case(t))
            .ok_or_else(|| SuitParseError::Invalid(s.to_string()))
    }
}

impl TryFrom<char> for Suit {
    type Error = SuitParseError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            'h' | 'H' | '♥' => Ok(Suit::Hearts),
            'd' | 'D' | '♦' => Ok(Suit::Diamonds),
            'c' | 'C' | '♣' => Ok(Suit::Clubs),
            's' | 'S' | '♠' => Ok(Suit::Spades),
            _ => Err(SuitParseError::Invalid(c.to_string())),
        }
    }
}

/// An immutable playing card. Equality and hashing are by (rank, suit).
///
/// ```
/// use holdem_sim::cards::{Card, Rank, Suit};
///
/// let card = Card::new(Rank::Ten, Suit::Hearts);
/// assert_eq!(card.to_string(), "10h");
/// assert_eq!("10 of Hearts".parse::<Card>().unwrap(), card);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Card {
    rank: Rank,
    suit: Suit,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    /// Build a card from separate rank and suit labels, e.g. `("Q", "Spades")`.
    pub fn from_parts(rank: &str, suit: &str) -> Result<Self, CardParseError> {
        Ok(Card::new(rank.parse()?, suit.parse()?))
    }

    pub const fn rank(self) -> Rank {
        self.rank
    }

    pub const fn suit(self) -> Suit {
        self.suit
    }

    /// All 52 cards, suit-major.
    pub fn all() -> impl Iterator<Item = Card> {
        Suit::ALL.into_iter().flat_map(|s| Rank::ALL.into_iter().map(move |r| Card::new(r, s)))
    }

    /// Unicode playing-card glyph.
    pub fn symbol(self) -> char {
        let base: u32 = match self.suit {
            Suit::Spades => 0x1F0A0,
            Suit::Hearts => 0x1F0B0,
            Suit::Diamonds => 0x1F0C0,
            Suit::Clubs => 0x1F0D0,
        };
        // The Unicode block has a Knight between Jack and Queen.
        let offset = match self.rank {
            Rank::Ace => 1,
            Rank::Queen => 13,
            Rank::King => 14,
            r => r.value() as u32,
        };
        char::from_u32(base + offset).unwrap_or('🂠')
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CardParseError {
    #[error("invalid card: '{0}'")]
    Invalid(String),
    #[error(transparent)]
    Rank(#[from] RankParseError),
    #[error(transparent)]
    Suit(#[from] SuitParseError),
}

impl FromStr for Card {
    type Err = CardParseError;

    /// Accepts "As", "10h", "Td" and the long form "Q of Spades".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        if let Some((rank, suit)) = t.split_once(" of ") {
            return Card::from_parts(rank, suit);
        }
        let mut chars = t.chars();
        let suit_ch = chars.next_back().ok_or_else(|| CardParseError::Invalid(s.to_string()))?;
        let rank_str = chars.as_str();
        if rank_str.is_empty() {
            return Err(CardParseError::Invalid(s.to_string()));
        }
        Ok(Card::new(rank_str.parse()?, Suit::try_from(suit_ch)?))
    }
}

/// Parse multiple cards separated by whitespace or commas.
///
/// ```
/// use holdem_sim::cards::{parse_cards, Card, Rank, Suit};
///
/// let cards = parse_cards("As, Kd 10c").unwrap();
/// assert_eq!(cards[2], Card::new(Rank::Ten, Suit::Clubs));
/// ```
pub fn parse_cards(input: &str) -> Result<Vec<Card>, CardParseError> {
    input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(Card::from_str)
        .collect()
}
