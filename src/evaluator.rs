//! Hand ranking used at showdown.
//!
//! The table only talks to the [`HandEvaluator`] trait; [`StandardEvaluator`]
//! is the default seven-card Hold'em implementation and can be swapped for any
//! other ranking service.

use crate::cards::{Card, Rank};
use crate::hand::{validate_holdem, Board, HandError, HoleCards};
use crate::player::PlayerId;
use core::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// Compact, comparable hand strength. Higher is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandValue(u64);

impl HandValue {
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Pack a category and up to five rank tiebreakers, most significant first.
    fn from_parts(category: Category, tiebreak: &[Rank]) -> Self {
        // [ category (8 bits) | r0 (6) | r1 (6) | r2 (6) | r3 (6) | r4 (6) | 10 zero bits ]
        const CAT_SHIFT: u32 = 48;
        const RANK_STRIDE: u32 = 6;
        let mut v: u64 = (category as u64) << CAT_SHIFT;
        for (i, r) in tiebreak.iter().take(5).enumerate() {
            v |= (r.value() as u64) << (CAT_SHIFT - RANK_STRIDE * (i as u32 + 1));
        }
        HandValue(v)
    }
}

/// Poker hand category from weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
#[repr(u8)]
pub enum Category {
    HighCard = 0,
    Pair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
}

/// Evaluation result; `value` alone drives ordering.
#[derive(Debug, Clone, Copy)]
pub struct Evaluation {
    pub category: Category,
    pub best_five: [Card; 5],
    value: HandValue,
}

impl Evaluation {
    pub const fn value(&self) -> HandValue {
        self.value
    }
}

impl Ord for Evaluation {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl PartialOrd for Evaluation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Evaluation {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Evaluation {}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EvalError {
    #[error("invalid hand: {0}")]
    InvalidHand(#[from] HandError),
    #[error("not enough cards to evaluate")]
    NotEnoughCards,
    #[error("no candidates to compare")]
    NoCandidates,
}

/// Evaluate exactly five cards.
pub fn evaluate_five(cards: &[Card; 5]) -> Evaluation {
    let mut sorted = *cards;
    sorted.sort_by(|a, b| b.rank().cmp(&a.rank()).then(b.suit().cmp(&a.suit())));

    let mut counts = [0u8; 15];
    for c in &sorted {
        counts[c.rank().value() as usize] += 1;
    }
    // (rank, count) ordered by count desc, then rank desc: exactly the tiebreak order.
    let mut groups: Vec<(Rank, u8)> = Rank::ALL
        .iter()
        .rev()
        .filter(|r| counts[r.value() as usize] > 0)
        .map(|&r| (r, counts[r.value() as usize]))
        .collect();
    groups.sort_by(|a, b| b.1.cmp(&a.1).then(b.0.cmp(&a.0)));
    let tiebreak: Vec<Rank> = groups.iter().map(|(r, _)| *r).collect();

    let is_flush = sorted.iter().all(|c| c.suit() == sorted[0].suit());
    let straight_top = if groups.len() == 5 {
        let hi = sorted[0].rank().value();
        let lo = sorted[4].rank().value();
        if hi - lo == 4 {
            Some(sorted[0].rank())
        } else if hi == Rank::Ace.value() && sorted[1].rank() == Rank::Five {
            Some(Rank::Five)
        } else {
            None
        }
    } else {
        None
    };

    let (category, tiebreak) = match (straight_top, is_flush, groups[0].1, groups.get(1)) {
        (Some(top), true, _, _) => (Category::StraightFlush, vec![top]),
        (_, _, 4, _) => (Category::FourOfAKind, tiebreak),
        (_, _, 3, Some(&(_, 2))) => (Category::FullHouse, tiebreak),
        (_, true, _, _) => (Category::Flush, tiebreak),
        (Some(top), false, _, _) => (Category::Straight, vec![top]),
        (_, _, 3, _) => (Category::ThreeOfAKind, tiebreak),
        (_, _, 2, Some(&(_, 2))) => (Category::TwoPair, tiebreak),
        (_, _, 2, _) => (Category::Pair, tiebreak),
        _ => (Category::HighCard, tiebreak),
    };
    Evaluation { category, best_five: sorted, value: HandValue::from_parts(category, &tiebreak) }
}

/// Best five-card evaluation out of seven cards (all 21 combinations).
pub fn evaluate_seven(cards: &[Card; 7]) -> Evaluation {
    let mut best = evaluate_five(&[cards[0], cards[1], cards[2], cards[3], cards[4]]);
    for skip_a in 0..7 {
        for skip_b in (skip_a + 1)..7 {
            let mut five = [cards[0]; 5];
            let mut n = 0;
            for (i, c) in cards.iter().enumerate() {
                if i != skip_a && i != skip_b {
                    five[n] = *c;
                    n += 1;
                }
            }
            let eval = evaluate_five(&five);
            if eval > best {
                best = eval;
            }
        }
    }
    best
}

/// Evaluate two hole cards against a complete board.
pub fn evaluate_holdem(hole: &HoleCards, board: &Board) -> Result<Evaluation, EvalError> {
    validate_holdem(hole, board)?;
    let b = board.as_slice();
    if b.len() < Board::FULL {
        return Err(EvalError::NotEnoughCards);
    }
    Ok(evaluate_seven(&[hole.first(), hole.second(), b[0], b[1], b[2], b[3], b[4]]))
}

/// Decides who wins a pot among the candidates still holding cards.
///
/// Implementations must return a non-empty set whenever `candidates` is
/// non-empty; ties produce several winners.
pub trait HandEvaluator: Send {
    fn winners(
        &self,
        board: &Board,
        candidates: &BTreeMap<PlayerId, HoleCards>,
    ) -> Result<BTreeSet<PlayerId>, EvalError>;
}

/// Default Texas Hold'em ranking: best five of seven.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardEvaluator;

impl HandEvaluator for StandardEvaluator {
    fn winners(
        &self,
        board: &Board,
        candidates: &BTreeMap<PlayerId, HoleCards>,
    ) -> Result<BTreeSet<PlayerId>, EvalError> {
        let mut best: Option<Evaluation> = None;
        let mut winners = BTreeSet::new();
        for (id, hole) in candidates {
            let eval = evaluate_holdem(hole, board)?;
            match best.map(|b| eval.cmp(&b)) {
                Some(Ordering::Less) => {}
                Some(Ordering::Equal) => {
                    winners.insert(id.clone());
                }
                Some(Ordering::Greater) | None => {
                    best = Some(eval);
                    winners.clear();
                    winners.insert(id.clone());
                }
            }
        }
        if winners.is_empty() {
            return Err(EvalError::NoCandidates);
        }
        Ok(winners)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;

    fn five(s: &str) -> [Card; 5] {
        let v = parse_cards(s).unwrap();
        [v[0], v[1], v[2], v[3], v[4]]
    }

    #[test]
    fn categories_are_detected() {
        let cases = [
            ("As Ks Qs Js Ts", Category::StraightFlush),
            ("Kc Kd Kh Ks 2s", Category::FourOfAKind),
            ("Tc Td Th 2s 2h", Category::FullHouse),
            ("Ah 9h 7h 3h 2h", Category::Flush),
            ("Ac 2d 3h 4s 5c", Category::Straight),
            ("Qc Qd Qh 9s 2c", Category::ThreeOfAKind),
            ("Jc Jd 9c 9h 2s", Category::TwoPair),
            ("Ah Ad Ts 9c 2d", Category::Pair),
            ("Ah Kd 7s 5c 2d", Category::HighCard),
        ];
        for (cards, cat) in cases {
            assert_eq!(evaluate_five(&five(cards)).category, cat, "{cards}");
        }
    }

    #[test]
    fn wheel_loses_to_six_high_straight() {
        let wheel = evaluate_five(&five("Ac 2d 3h 4s 5c"));
        let six = evaluate_five(&five("2c 3d 4h 5s 6c"));
        assert!(six > wheel);
    }

    #[test]
    fn kickers_break_pair_ties() {
        let a = evaluate_five(&five("Ah Ad Ks 9c 2d"));
        let b = evaluate_five(&five("Ac As Qs 9d 2c"));
        assert!(a > b);
    }

    #[test]
    fn short_board_is_rejected() {
        let hole: HoleCards = "As Ks".parse().unwrap();
        let board: Board = "2c 3c 4c".parse().unwrap();
        assert_eq!(evaluate_holdem(&hole, &board).unwrap_err(), EvalError::NotEnoughCards);
    }

    #[test]
    fn standard_evaluator_reports_ties() {
        let board: Board = "Ac Kd Qh Js 2c".parse().unwrap();
        let mut candidates = BTreeMap::new();
        candidates.insert("a".to_string(), "Tc 3d".parse::<HoleCards>().unwrap());
        candidates.insert("b".to_string(), "Th 4s".parse::<HoleCards>().unwrap());
        candidates.insert("c".to_string(), "9c 9d".parse::<HoleCards>().unwrap());

        let winners = StandardEvaluator.winners(&board, &candidates).unwrap();
        let expected: BTreeSet<PlayerId> = ["a", "b"].iter().map(|s| s.to_string()).collect();
        assert_eq!(winners, expected);
    }

    #[test]
    fn standard_evaluator_needs_candidates() {
        let board: Board = "Ac Kd Qh Js 2c".parse().unwrap();
        let err = StandardEvaluator.winners(&board, &BTreeMap::new()).unwrap_err();
        assert_eq!(err, EvalError::NoCandidates);
    }
}
