use crate::cards::{format_cards, parse_cards, Card};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
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
    #[error("hole cards overlap with board")]
    Overlap,
    #[error("expected exactly two hole cards, got {0}")]
    HoleCount(usize),
    #[error("card parse error: {0}")]
    CardParse(String),
}

/// A player's two private cards.
///
/// ```
/// use holdem_table::cards::{Card, Rank, Suit};
/// use holdem_table::hand::HoleCards;
///
/// let hole = HoleCards::try_new(
///     Card::new(Rank::Ace, Suit::Spades),
///     Card::new(Rank::King, Suit::Spades),
/// ).unwrap();
/// assert_eq!(hole.to_string(), "[As Ks]");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
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
}

impl fmt::Display for HoleCards {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_cards(&self.as_array()))
    }
}

impl FromStr for HoleCards {
    type Err = HandError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cards = parse_cards(s).map_err(|e| HandError::CardParse(e.to_string()))?;
        Self::from_slice(&cards)
    }
}

/// Community cards revealed so far (flop, turn, river).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cards: Vec<Card>,
}

impl Board {
    pub const FULL: usize = 5;

    pub fn new(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn try_new(cards: Vec<Card>) -> Result<Self, HandError> {
        if cards.len() > Self::FULL {
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
        self.cards.len() >= Self::FULL
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

    pub(crate) fn clear(&mut self) {
        self.cards.clear();
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_cards(&self.cards))
    }
}

impl FromStr for Board {
    type Err = HandError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cards = parse_cards(s).map_err(|e| HandError::CardParse(e.to_string()))?;
        Board::try_new(cards)
    }
}

/// Checks that hole cards and board are disjoint and internally unique.
pub fn validate_holdem(hole: &HoleCards, board: &Board) -> Result<(), HandError> {
    if board.len() > Board::FULL {
        return Err(HandError::TooManyBoardCards(board.len()));
    }
    let set: HashSet<Card> = board.as_slice().iter().copied().collect();
    if set.len() != board.len() {
        return Err(HandError::DuplicateBoardCards);
    }
    if set.contains(&hole.first()) || set.contains(&hole.second()) {
        return Err(HandError::Overlap);
    }
    if hole.first() == hole.second() {
        return Err(HandError::DuplicateHoleCards);
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
    fn board_rejects_six_cards_and_dupes() {
        let full: Board = "2c 3c 4c 5c 6c".parse().unwrap();
        assert!(full.is_complete());
        let six = "2c 3c 4c 5c 6c 7c".parse::<Board>();
        assert!(matches!(six, Err(HandError::TooManyBoardCards(6))));
        assert!(matches!("2c 2c".parse::<Board>(), Err(HandError::DuplicateBoardCards)));
    }

    #[test]
    fn validate_holdem_catches_overlap() {
        let hole: HoleCards = "As Ks".parse().unwrap();
        let board: Board = "As 2c 3c".parse().unwrap();
        assert!(matches!(validate_holdem(&hole, &board), Err(HandError::Overlap)));
    }

    #[test]
    fn board_display_lists_cards() {
        let board: Board = "2c, 3d 4h".parse().unwrap();
        assert_eq!(board.to_string(), "[2c 3d 4h]");
    }
}
