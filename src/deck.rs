use crate::cards::{Card, Rank, Suit};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DeckError {
    #[error("not enough cards in deck: requested {requested}, remaining {remaining}")]
    NotEnoughCards { requested: usize, remaining: usize },
}

/// The 52 unique cards of a standard deck, suit by suit, Two to Ace.
pub fn standard_deck() -> Vec<Card> {
    Suit::ALL.iter().flat_map(|&s| Rank::ALL.iter().map(move |&r| Card::new(r, s))).collect()
}

/// Derives the seed for the next hand from the current one.
///
/// Zero means "unseeded" and stays zero; any other seed maps to a new non-zero
/// seed, so a table started with a fixed seed replays identically.
pub fn next_seed(seed: u64) -> u64 {
    if seed == 0 {
        return 0;
    }
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    loop {
        let candidate: u64 = rng.random();
        if candidate != 0 {
            return candidate;
        }
    }
}

/// Ordered cards remaining for the current hand. Draws come off the front.
#[derive(Debug, Clone, Default)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// An unshuffled standard deck.
    ///
    /// ```
    /// use holdem_table::deck::Deck;
    ///
    /// let deck = Deck::standard();
    /// assert_eq!(deck.len(), 52);
    /// ```
    pub fn standard() -> Self {
        Self { cards: standard_deck() }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn as_slice(&self) -> &[Card] {
        &self.cards
    }

    /// Restore all 52 cards and shuffle them.
    ///
    /// A non-zero `seed` gives a reproducible order; zero draws from OS entropy.
    pub fn refresh(&mut self, seed: u64) {
        self.cards = standard_deck();
        if seed != 0 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            self.cards.shuffle(&mut rng);
        } else {
            self.cards.shuffle(&mut rand::rng());
        }
    }

    #[cfg(test)]
    pub(crate) fn stacked(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    /// Remove and return the first `n` cards, or nothing at all if fewer remain.
    pub fn draw(&mut self, n: usize) -> Result<Vec<Card>, DeckError> {
        if self.cards.len() < n {
            return Err(DeckError::NotEnoughCards { requested: n, remaining: self.cards.len() });
        }
        Ok(self.cards.drain(..n).collect())
    }
}
