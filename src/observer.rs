//! Ordered, synchronous notifications of everything that happens at a table.

use crate::hand::{Board, HoleCards};
use crate::player::{Chips, PlayerId};
use crate::table::Round;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// One state change. `Display` renders the human-readable line observers show.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TableEvent {
    PlayerJoined { id: PlayerId, queued: bool },
    PlayerLeft { id: PlayerId },
    PlayerEliminated { id: PlayerId, balance: Chips },
    GameStarted,
    BlindsIncreased { small_blind: Chips },
    RoundStarted { round: Round },
    AntePosted { total: Chips },
    HoleCardsDealt { id: PlayerId, cards: HoleCards },
    DealerMoved { id: PlayerId },
    SmallBlindPosted { id: PlayerId, amount: Chips },
    BigBlindPosted { id: PlayerId, amount: Chips },
    CommunityCards { board: Board },
    Checked { id: PlayerId },
    Called { id: PlayerId, amount: Chips },
    Raised { id: PlayerId, amount: Chips },
    Folded { id: PlayerId },
    NextToAct { id: PlayerId, to_call: Chips },
    PotAwarded { pot: usize, share: Chips, winners: Vec<PlayerId> },
    HandFinished,
}

impl fmt::Display for TableEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableEvent::PlayerJoined { id, queued: false } => {
                write!(f, "Player {id} joined the table")
            }
            TableEvent::PlayerJoined { id, queued: true } => {
                write!(f, "Player {id} joined and waits for the next hand")
            }
            TableEvent::PlayerLeft { id } => write!(f, "Player {id} left the table"),
            TableEvent::PlayerEliminated { id, balance } => {
                write!(f, "Player {id} cannot cover the ante with {balance} and is out")
            }
            TableEvent::GameStarted => f.write_str("Game started"),
            TableEvent::BlindsIncreased { small_blind } => {
                write!(f, "Blinds increased to {small_blind}/{}", small_blind.saturating_mul(2))
            }
            TableEvent::RoundStarted { round } => {
                write!(f, "New round started: {round} ({})", round.index())
            }
            TableEvent::AntePosted { total } => write!(f, "Ante collected: {total}"),
            TableEvent::HoleCardsDealt { id, cards } => write!(f, "Player {id} gets cards {cards}"),
            TableEvent::DealerMoved { id } => write!(f, "Dealer is {id}"),
            TableEvent::SmallBlindPosted { id, amount } => {
                write!(f, "Player {id} posts {amount} as small blind")
            }
            TableEvent::BigBlindPosted { id, amount } => {
                write!(f, "Player {id} posts {amount} as big blind")
            }
            TableEvent::CommunityCards { board } => write!(f, "Community cards: {board}"),
            TableEvent::Checked { id } => write!(f, "Player {id} checks"),
            TableEvent::Called { id, amount } => write!(f, "Player {id} calls {amount}"),
            TableEvent::Raised { id, amount } => write!(f, "Player {id} raises to {amount}"),
            TableEvent::Folded { id } => write!(f, "Player {id} folds"),
            TableEvent::NextToAct { id, to_call: 0 } => write!(f, "Player {id} to act, can check"),
            TableEvent::NextToAct { id, to_call } => {
                write!(f, "Player {id} to act, can call {to_call}")
            }
            TableEvent::PotAwarded { pot, share, winners } => {
                write!(f, "Pot {pot} pays {share} to {}", winners.join(", "))
            }
            TableEvent::HandFinished => f.write_str("Hand finished"),
        }
    }
}

/// Receives every [`TableEvent`] in the order the table produces them.
pub trait Observer: Send {
    fn update(&mut self, event: &TableEvent);
}

impl<F> Observer for F
where
    F: FnMut(&TableEvent) + Send,
{
    fn update(&mut self, event: &TableEvent) {
        self(event)
    }
}

/// Cloneable recorder: attach one clone to a table, read through another.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<TableEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<TableEvent> {
        self.events.lock().clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.events.lock().iter().map(ToString::to_string).collect()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl Observer for EventLog {
    fn update(&mut self, event: &TableEvent) {
        self.events.lock().push(event.clone());
    }
}
