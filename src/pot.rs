//! Pot construction from per-round contributions, and showdown settlement.

use crate::evaluator::{EvalError, HandEvaluator};
use crate::hand::{Board, HoleCards};
use crate::player::{Chips, Player, PlayerId};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::convert::Infallible;

/// Chips plus the players who can still win them, in seating order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pot {
    pub amount: Chips,
    pub applicants: Vec<PlayerId>,
}

impl Pot {
    pub fn new(amount: Chips, applicants: Vec<PlayerId>) -> Self {
        Self { amount, applicants }
    }

    pub fn is_applicant(&self, id: &str) -> bool {
        self.applicants.iter().any(|a| a == id)
    }
}

/// What one player put in during a betting round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contribution {
    pub id: PlayerId,
    pub amount: Chips,
    pub folded: bool,
    pub all_in: bool,
}

impl Contribution {
    pub fn of(player: &dyn Player) -> Self {
        Self {
            id: player.id().to_string(),
            amount: player.last_bet(),
            folded: player.is_folded(),
            all_in: player.is_all_in(),
        }
    }
}

/// Split one round of contributions into a main pot and side pots.
///
/// Each live all-in amount caps a layer; chips above the cap spill into the
/// next layer, whose applicants are only the players who reached it. Folded
/// players' chips stay in the pots but never make them applicants. Input order
/// is kept in the applicant lists.
pub fn create_pots(contributions: &[Contribution]) -> Vec<Pot> {
    let caps: BTreeSet<Chips> = contributions
        .iter()
        .filter(|c| c.amount > 0 && c.all_in && !c.folded)
        .map(|c| c.amount)
        .collect();

    let mut pots: Vec<Pot> = Vec::new();
    let mut prev: Chips = 0;
    for cap in caps.into_iter().chain(std::iter::once(Chips::MAX)) {
        let amount: Chips =
            contributions.iter().map(|c| c.amount.min(cap) - c.amount.min(prev)).sum();
        if amount > 0 {
            let applicants: Vec<PlayerId> = contributions
                .iter()
                .filter(|c| !c.folded && c.amount > prev)
                .map(|c| c.id.clone())
                .collect();
            if !applicants.is_empty() {
                pots.push(Pot::new(amount, applicants));
            } else if let Some(last) = pots.last_mut() {
                // Only folded players reached this layer: their chips join the layer below.
                last.amount += amount;
            } else {
                let everyone =
                    contributions.iter().filter(|c| c.amount > prev).map(|c| c.id.clone());
                pots.push(Pot::new(amount, everyone.collect()));
            }
        }
        prev = cap;
    }
    pots
}

/// Append freshly built pots, folding a pot into the previous one when both
/// have the same applicants.
pub fn merge_pots(existing: &mut Vec<Pot>, fresh: Vec<Pot>) {
    for pot in fresh {
        if let Some(last) = existing.last_mut().filter(|l| l.applicants == pot.applicants) {
            last.amount += pot.amount;
        } else {
            existing.push(pot);
        }
    }
}

/// Settlement of a single pot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Award {
    /// Zero-based position in the pot list.
    pub pot: usize,
    pub amount: Chips,
    /// Even share each winner received.
    pub share: Chips,
    /// Winners in seating order.
    pub winners: Vec<PlayerId>,
    /// Winners who also got one remainder chip, in the order they got it.
    pub odd_chips: Vec<PlayerId>,
}

impl Award {
    /// Total chips the given player collects from this pot.
    pub fn paid_to(&self, id: &str) -> Chips {
        let base = if self.winners.iter().any(|w| w == id) { self.share } else { 0 };
        base + self.odd_chips.iter().filter(|w| *w == id).count() as Chips
    }
}

/// Pay every pot out to its winners.
///
/// `order` is the seating order and `dealer` an index into it; remainder chips
/// go one at a time to winners clockwise from the seat after the dealer.
/// All winners are decided before any balance changes, so an evaluator error
/// leaves every balance untouched. An evaluator that names none of a pot's
/// live applicants splits that pot among all of them.
pub fn settle(
    pots: &[Pot],
    board: &Board,
    order: &[PlayerId],
    dealer: usize,
    players: &mut HashMap<PlayerId, Box<dyn Player>>,
    evaluator: &dyn HandEvaluator,
) -> Result<Vec<Award>, EvalError> {
    distribute(pots, order, dealer, players, |players, live| {
        if live.len() == 1 {
            return Ok(live.iter().cloned().collect());
        }
        let candidates: BTreeMap<PlayerId, HoleCards> = live
            .iter()
            .filter_map(|id| players.get(id).and_then(|p| p.hand()).map(|h| (id.clone(), h)))
            .collect();
        evaluator.winners(board, &candidates)
    })
}

/// Split every pot evenly among its live applicants, without looking at cards.
pub fn split_evenly(
    pots: &[Pot],
    order: &[PlayerId],
    dealer: usize,
    players: &mut HashMap<PlayerId, Box<dyn Player>>,
) -> Vec<Award> {
    distribute(pots, order, dealer, players, |_, live| {
        Ok::<_, Infallible>(live.iter().cloned().collect())
    })
    .unwrap_or_else(|never| match never {})
}

fn distribute<E>(
    pots: &[Pot],
    order: &[PlayerId],
    dealer: usize,
    players: &mut HashMap<PlayerId, Box<dyn Player>>,
    mut pick: impl FnMut(
        &HashMap<PlayerId, Box<dyn Player>>,
        &[PlayerId],
    ) -> Result<BTreeSet<PlayerId>, E>,
) -> Result<Vec<Award>, E> {
    let hand_live: Vec<PlayerId> = order
        .iter()
        .filter(|id| players.get(*id).is_some_and(|p| !p.is_folded()))
        .cloned()
        .collect();

    let mut awards = Vec::with_capacity(pots.len());
    for (index, pot) in pots.iter().enumerate() {
        if pot.amount == 0 {
            continue;
        }
        let mut live: Vec<PlayerId> = pot
            .applicants
            .iter()
            .filter(|id| players.get(*id).is_some_and(|p| !p.is_folded()))
            .cloned()
            .collect();
        if live.is_empty() {
            log::warn!("pot {} has no live applicant, paying the players still in the hand", index);
            live = hand_live.clone();
        }
        if live.is_empty() {
            log::warn!("pot {} of {} chips has nobody to pay", index, pot.amount);
            continue;
        }

        let mut winners = pick(&*players, live.as_slice())?;
        winners.retain(|id| live.contains(id));
        if winners.is_empty() {
            log::warn!("no winner named for pot {}, splitting it among {:?}", index, live);
            winners = live.iter().cloned().collect();
        }
        let seated: Vec<PlayerId> =
            order.iter().filter(|id| winners.contains(*id)).cloned().collect();
        let winners: Vec<PlayerId> =
            if seated.is_empty() { winners.into_iter().collect() } else { seated };

        let count = winners.len() as Chips;
        let share = pot.amount / count;
        let mut remainder = pot.amount % count;
        let mut odd_chips = Vec::new();
        let n = order.len();
        for step in 1..=n {
            if remainder == 0 {
                break;
            }
            let seat = &order[(dealer + step) % n];
            if winners.contains(seat) {
                odd_chips.push(seat.clone());
                remainder -= 1;
            }
        }
        // Winners not in the seating order cannot be reached by the walk above.
        while remainder > 0 {
            odd_chips.push(winners[(remainder as usize - 1) % winners.len()].clone());
            remainder -= 1;
        }

        awards.push(Award { pot: index, amount: pot.amount, share, winners, odd_chips });
    }

    for award in &awards {
        for id in award.winners.iter() {
            if let Some(p) = players.get_mut(id) {
                p.credit(award.paid_to(id));
            }
        }
    }
    Ok(awards)
}
