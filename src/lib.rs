//! holdem-table: rules engine for a multi-player Texas Hold'em table
//!
//! Goals:
//! - One authoritative table state: seating, blinds, turns, betting, pots
//! - Deterministic hands from a seed, reproducible from hand to hand
//! - No panics for bad moves; every refusal is a `TableError`
//! - Pluggable players, observers and hand evaluation
//!
//! ## Quick start: play a heads-up hand
//! ```
//! use holdem_table::config::TableConfig;
//! use holdem_table::observer::EventLog;
//! use holdem_table::player::Seat;
//! use holdem_table::table::Table;
//!
//! let mut table = Table::new(TableConfig::default().with_small_blind(5).with_seed(42)).unwrap();
//! let log = EventLog::new();
//! table.add_observer(Box::new(log.clone()));
//! table.add_player(Box::new(Seat::new("alice", 100))).unwrap();
//! table.add_player(Box::new(Seat::new("bob", 100))).unwrap();
//!
//! table.start_game().unwrap();
//! let first = table.current_player().unwrap().to_string();
//! table.make_move(&first, "fold", 0).unwrap();
//!
//! // A fold heads-up ends the hand at once.
//! assert_eq!(table.round(), None);
//! assert!(log.lines().iter().any(|l| l.starts_with("Pot 1 pays")));
//! ```
//!
//! ## Evaluate a hand directly
//! ```
//! use holdem_table::evaluator::{evaluate_holdem, Category};
//! use holdem_table::hand::{Board, HoleCards};
//!
//! let hole: HoleCards = "As Ah".parse().unwrap();
//! let board: Board = "Kc Qd Jh 3s 2c".parse().unwrap();
//! assert_eq!(evaluate_holdem(&hole, &board).unwrap().category, Category::Pair);
//! ```

pub mod cards;
pub mod config;
pub mod deck;
pub mod engine;
pub mod evaluator;
pub mod hand;
pub mod observer;
pub mod player;
pub mod pot;
pub mod table;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
