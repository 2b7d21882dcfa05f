use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Card ranks from Two (low) to Ace (high).
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

    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Inverse of [`Rank::value`]; `None` outside `2..=14`.
    pub fn from_value(v: u8) -> Option<Rank> {
        Rank::ALL.iter().copied().find(|r| r.value() == v)
    }

    pub const fn to_char(self) -> char {
        match self {
            Rank::Two => '2',
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RankParseError {
    #[error("invalid rank: '{0}'")]
    Invalid(String),
}

impl TryFrom<char> for Rank {
    type Error = RankParseError;
    fn try_from(c: char) -> Result<Self, Self::Error> {
        let up = c.to_ascii_uppercase();
        Rank::ALL
            .iter()
            .copied()
            .find(|r| r.to_char() == up)
            .ok_or_else(|| RankParseError::Invalid(c.to_string()))
    }
}

impl FromStr for Rank {
    type Err = RankParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        if t == "10" {
            return Ok(Rank::Ten);
        }
        let mut chars = t.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Rank::try_from(c).map_err(|_| RankParseError::Invalid(s.into())),
            _ => Err(RankParseError::Invalid(s.to_string())),
        }
    }
}

/// Four suits; fixed order C < D < H < S carries no hand-strength meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

    pub const fn to_char(self) -> char {
        match self {
            Suit::Clubs => 'c',
            Suit::Diamonds => 'd',
            Suit::Hearts => 'h',
            Suit::Spades => 's',
        }
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

impl TryFrom<char> for Suit {
    type Error = SuitParseError;
    fn try_from(c: char) -> Result<Self, Self::Error> {
        let low = c.to_ascii_lowercase();
        Suit::ALL
            .iter()
            .copied()
            .find(|s| s.to_char() == low)
            .ok_or_else(|| SuitParseError::Invalid(c.to_string()))
    }
}

impl FromStr for Suit {
    type Err = SuitParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        match t.to_ascii_lowercase().as_str() {
            "clubs" => Ok(Suit::Clubs),
            "diamonds" => Ok(Suit::Diamonds),
            "hearts" => Ok(Suit::Hearts),
            "spades" => Ok(Suit::Spades),
            _ => {
                let mut chars = t.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Suit::try_from(c),
                    _ => Err(SuitParseError::Invalid(s.to_string())),
                }
            }
        }
    }
}

/// A playing card: rank + suit.
///
/// ```
/// use holdem_table::cards::{Card, Rank, Suit};
///
/// let card = Card::new(Rank::Ace, Suit::Spades);
/// assert_eq!(card.to_string(), "As");
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

    pub const fn rank(self) -> Rank {
        self.rank
    }

    pub const fn suit(self) -> Suit {
        self.suit
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
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        // Suit is always the last character; everything before it is the rank.
        let Some(suit_ch) = t.chars().last() else {
            return Err(CardParseError::Invalid(s.to_string()));
        };
        let rank_str = &t[..t.len() - suit_ch.len_utf8()];
        if rank_str.is_empty() {
            return Err(CardParseError::Invalid(s.to_string()));
        }
        let rank = Rank::from_str(rank_str)?;
        let suit = Suit::try_from(suit_ch)?;
        Ok(Card::new(rank, suit))
    }
}

/// Parse multiple cards separated by whitespace or commas.
///
/// ```
/// use holdem_table::cards::{parse_cards, Card, Rank, Suit};
///
/// let cards = parse_cards("As, Kd 10c").unwrap();
/// assert_eq!(cards[0], Card::new(Rank::Ace, Suit::Spades));
/// assert_eq!(cards[2], Card::new(Rank::Ten, Suit::Clubs));
/// ```
pub fn parse_cards(input: &str) -> Result<Vec<Card>, CardParseError> {
    input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(Card::from_str)
        .collect()
}

/// Formats a run of cards the way events print them: `[As Kd 7c]`.
pub fn format_cards(cards: &[Card]) -> String {
    let inner: Vec<String> = cards.iter().map(Card::to_string).collect();
    format!("[{}]", inner.join(" "))
}
