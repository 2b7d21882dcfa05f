use holdem_table::config::TableConfig;
use holdem_table::observer::{EventLog, TableEvent};
use holdem_table::player::{Player, Seat};
use holdem_table::table::{Round, Table, TableError};

fn seat(id: &str, balance: u64) -> Box<dyn Player> {
    Box::new(Seat::new(id, balance))
}

fn mk_table(cfg: TableConfig, ids: &[&str]) -> Table {
    let mut t = Table::new(cfg.with_small_blind(5).with_seed(13)).expect("valid config");
    for id in ids {
        t.add_player(seat(id, 100)).expect("seat available");
    }
    t
}

fn chips(t: &Table) -> u64 {
    t.players_order().iter().map(|id| t.player(id).unwrap().balance()).sum::<u64>()
        + t.pot_total()
        + t.outstanding_bets()
}

#[test]
fn capacity_counts_seated_and_queued() {
    let mut t = mk_table(TableConfig::default().with_max_players(3), &["a", "b"]);
    t.start_game().unwrap();
    t.add_player(seat("c", 100)).unwrap();
    assert_eq!(t.queued(), ["c"]);
    assert_eq!(t.add_player(seat("d", 100)), Err(TableError::MaxPlayers { max: 3 }));
}

#[test]
fn full_table_rejects_before_start_too() {
    let mut t = mk_table(TableConfig::default().with_max_players(2), &["a", "b"]);
    assert_eq!(t.add_player(seat("c", 100)), Err(TableError::MaxPlayers { max: 2 }));
}

#[test]
fn duplicate_ids_are_rejected() {
    let mut t = mk_table(TableConfig::default(), &["a", "b"]);
    assert_eq!(t.add_player(seat("a", 50)), Err(TableError::DuplicatePlayer("a".into())));
    t.start_game().unwrap();
    t.add_player(seat("late", 50)).unwrap();
    assert_eq!(t.add_player(seat("late", 50)), Err(TableError::DuplicatePlayer("late".into())));
}

#[test]
fn late_entry_can_be_disabled() {
    let mut t = mk_table(TableConfig::default().with_enter_after_start(false), &["a", "b"]);
    t.start_game().unwrap();
    assert_eq!(t.add_player(seat("c", 100)), Err(TableError::GameStarted));
}

#[test]
fn queued_players_join_at_the_next_hand() {
    let mut t = mk_table(TableConfig::default(), &["a", "b"]);
    let log = EventLog::new();
    t.add_observer(Box::new(log.clone()));
    t.start_game().unwrap();
    t.add_player(seat("c", 100)).unwrap();
    assert_eq!(t.players_order(), ["a", "b"]);
    assert!(log.events().contains(&TableEvent::PlayerJoined { id: "c".into(), queued: true }));

    let who = t.current_player().unwrap().to_string();
    t.make_move(&who, "fold", 0).unwrap();
    assert!(!t.is_started());
    assert_eq!(t.queued().len(), 1);

    t.start_game().unwrap();
    assert_eq!(t.players_order(), ["a", "b", "c"]);
    assert!(t.queued().is_empty());
    assert!(t.player("c").unwrap().hand().is_some());
}

#[test]
fn min_players_gates_the_start() {
    let mut t = mk_table(TableConfig::default().with_min_players(3), &["a", "b"]);
    assert_eq!(
        t.start_game(),
        Err(TableError::NotEnoughPlayers { required: 3, available: 2 })
    );
    t.add_player(seat("c", 100)).unwrap();
    t.start_game().unwrap();
}

#[test]
fn removing_unknown_player_fails() {
    let mut t = mk_table(TableConfig::default(), &["a"]);
    assert_eq!(t.remove_player("zed").map(|_| ()), Err(TableError::PlayerNotFound("zed".into())));
}

#[test]
fn removing_between_hands_returns_the_player() {
    let mut t = mk_table(TableConfig::default(), &["a", "b", "c"]);
    let p = t.remove_player("b").unwrap();
    assert_eq!(p.id(), "b");
    assert_eq!(p.balance(), 100);
    assert_eq!(t.players_order(), ["a", "c"]);
}

#[test]
fn removing_a_queued_player_leaves_the_hand_alone() {
    let mut t = mk_table(TableConfig::default(), &["a", "b"]);
    t.start_game().unwrap();
    t.add_player(seat("c", 100)).unwrap();
    let before = t.current_player().map(str::to_string);
    let p = t.remove_player("c").unwrap();
    assert_eq!(p.balance(), 100);
    assert!(t.queued().is_empty());
    assert_eq!(t.current_player().map(str::to_string), before);
}

#[test]
fn leaving_mid_hand_forfeits_the_bet() {
    // Dealer b, small blind c, big blind a, b to act.
    let mut t = mk_table(TableConfig::default(), &["a", "b", "c"]);
    t.start_game().unwrap();
    let total = chips(&t);

    let gone = t.remove_player("a").unwrap();
    assert_eq!(gone.balance(), 90, "the big blind stays on the table");
    assert_eq!(gone.last_bet(), 0);
    assert_eq!(chips(&t), total - 90);

    assert!(t.is_started());
    assert_eq!(t.current_player(), Some("b"));
    t.make_move("b", "call", 0).unwrap();
    t.make_move("c", "call", 0).unwrap();

    assert_eq!(t.round(), Some(Round::Flop));
    assert_eq!(t.pot_total(), 30);
    assert!(t.pots().iter().all(|p| !p.is_applicant("a")));
}

#[test]
fn leaving_on_your_turn_passes_the_action() {
    let mut t = mk_table(TableConfig::default(), &["a", "b", "c"]);
    t.start_game().unwrap();
    assert_eq!(t.current_player(), Some("b"));
    t.remove_player("b").unwrap();
    assert_eq!(t.current_player(), Some("c"));
    assert_eq!(t.dealer_id(), Some("a"), "button falls back to the previous seat");
}

#[test]
fn last_player_standing_wins_when_the_rest_leave() {
    let mut t = mk_table(TableConfig::default(), &["a", "b"]);
    t.start_game().unwrap();
    // Heads-up: b is button and small blind.
    t.remove_player("b").unwrap();
    assert!(!t.is_started());
    assert_eq!(t.player("a").unwrap().balance(), 105);
}
