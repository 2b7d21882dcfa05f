use holdem_table::config::TableConfig;
use holdem_table::evaluator::{EvalError, HandEvaluator};
use holdem_table::hand::{Board, HoleCards};
use holdem_table::player::{Player, PlayerId, Seat};
use holdem_table::pot::{settle, Pot};
use holdem_table::table::Table;
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Picks a fixed set of winners regardless of cards.
struct Chosen(BTreeSet<PlayerId>);

impl HandEvaluator for Chosen {
    fn winners(
        &self,
        _board: &Board,
        _candidates: &BTreeMap<PlayerId, HoleCards>,
    ) -> Result<BTreeSet<PlayerId>, EvalError> {
        Ok(self.0.clone())
    }
}

prop_compose! {
    /// Seat count, pot size, a non-empty winner mask and the dealer seat.
    fn split_pot()(n in 2usize..9)(
        amount in 1u64..1_000,
        mask in proptest::collection::vec(any::<bool>(), n),
        first in 0..n,
        dealer in 0..n,
    ) -> (u64, Vec<bool>, usize) {
        let mut mask = mask;
        mask[first] = true;
        (amount, mask, dealer)
    }
}

#[derive(Debug, Clone, Copy)]
enum Move {
    Check,
    Call,
    Raise(u64),
    Fold,
}

impl Move {
    fn name(self) -> &'static str {
        match self {
            Move::Check => "check",
            Move::Call => "call",
            Move::Raise(_) => "raise",
            Move::Fold => "fold",
        }
    }

    fn amount(self) -> u64 {
        match self {
            Move::Raise(a) => a,
            _ => 0,
        }
    }
}

fn any_move() -> impl Strategy<Value = Move> {
    prop_oneof![
        3 => Just(Move::Call),
        2 => Just(Move::Check),
        2 => (1u64..250).prop_map(Move::Raise),
        1 => Just(Move::Fold),
    ]
}

fn table_chips(t: &Table) -> u64 {
    let seated: u64 = t.players_order().iter().map(|id| t.player(id).unwrap().balance()).sum();
    seated + t.pot_total() + t.outstanding_bets()
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn remainder_goes_clockwise_from_the_dealer((amount, mask, dealer) in split_pot()) {
        let order: Vec<PlayerId> = (0..mask.len()).map(|i| format!("p{i}")).collect();
        let mut players: HashMap<PlayerId, Box<dyn Player>> = order
            .iter()
            .map(|id| (id.clone(), Box::new(Seat::new(id.as_str(), 0)) as Box<dyn Player>))
            .collect();
        let chosen: BTreeSet<PlayerId> =
            order.iter().zip(&mask).filter(|(_, w)| **w).map(|(id, _)| id.clone()).collect();
        let k = chosen.len() as u64;
        let pots = vec![Pot::new(amount, order.clone())];

        let evaluator = Chosen(chosen.clone());
        let awards =
            settle(&pots, &Board::default(), &order, dealer, &mut players, &evaluator).unwrap();

        let n = order.len();
        let expected_odd: Vec<PlayerId> = (1..=n)
            .map(|step| order[(dealer + step) % n].clone())
            .filter(|id| chosen.contains(id))
            .take((amount % k) as usize)
            .collect();
        prop_assert_eq!(&awards[0].odd_chips, &expected_odd);
        prop_assert_eq!(awards[0].share, amount / k);

        let paid: u64 = players.values().map(|p| p.balance()).sum();
        prop_assert_eq!(paid, amount);
        for id in &order {
            let bonus = u64::from(expected_odd.contains(id));
            let want = if chosen.contains(id) { amount / k + bonus } else { 0 };
            prop_assert_eq!(players[id].balance(), want);
        }
    }

    #[test]
    fn chips_are_conserved_and_pots_nest(
        stacks in proptest::collection::vec(20u64..200, 2..6),
        ante in 0u64..3,
        seed in 1u64..u64::MAX,
        moves in proptest::collection::vec(any_move(), 1..200),
    ) {
        let cfg = TableConfig::default().with_small_blind(5).with_ante(ante).with_seed(seed);
        let mut t = Table::new(cfg).unwrap();
        for (i, s) in stacks.iter().enumerate() {
            t.add_player(Box::new(Seat::new(format!("p{i}"), *s))).unwrap();
        }
        let mut total: u64 = stacks.iter().sum();

        for mv in moves {
            if !t.is_started() {
                if t.start_game().is_err() {
                    break;
                }
                total -= t.take_eliminated().iter().map(|p| p.balance()).sum::<u64>();
                prop_assert_eq!(table_chips(&t), total);
                continue;
            }
            let who = t.current_player().unwrap().to_string();
            let before = table_chips(&t);
            let _ = t.make_move(&who, mv.name(), mv.amount());
            prop_assert_eq!(table_chips(&t), before, "move {:?} by {}", mv, who);

            for pair in t.pots().windows(2) {
                let outer: BTreeSet<&String> = pair[0].applicants.iter().collect();
                let nested = pair[1].applicants.iter().all(|a| outer.contains(a));
                prop_assert!(nested, "{:?}", t.pots());
            }
            if t.is_started() {
                let actor = t.current_player().unwrap();
                prop_assert!(!t.player(actor).unwrap().is_folded());
            }
        }
    }

    #[test]
    fn refused_moves_change_nothing(
        seed in 1u64..u64::MAX,
        raise in 0u64..21,
    ) {
        let cfg = TableConfig::default().with_small_blind(5).with_seed(seed);
        let mut t = Table::new(cfg).unwrap();
        for id in ["a", "b", "c"] {
            t.add_player(Box::new(Seat::new(id, 100))).unwrap();
        }
        t.start_game().unwrap();
        let snapshot = format!("{t:?}");
        let who = t.current_player().unwrap().to_string();

        prop_assert!(t.make_move(&who, "raise", raise).is_err());
        prop_assert!(t.make_move(&who, "check", 0).is_err());
        prop_assert!(t.make_move("nobody", "call", 0).is_err());
        prop_assert_eq!(format!("{t:?}"), snapshot);
    }
}
