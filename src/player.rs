//! The player capability set the table drives.
//!
//! The table never owns a concrete player type: callers hand it anything that
//! implements [`Player`], and balance and per-round status only change through
//! these methods. [`Seat`] is a ready-made in-memory implementation.

use crate::hand::HoleCards;

/// Identifier a player is seated under. Unique per table.
pub type PlayerId = String;

/// Chip amounts. Balances never go negative.
pub type Chips = u64;

pub trait Player: Send {
    fn id(&self) -> &str;

    fn balance(&self) -> Chips;
    /// Add chips won or refunded.
    fn credit(&mut self, amount: Chips);
    /// Remove chips. The table never debits more than [`Player::balance`].
    fn debit(&mut self, amount: Chips);

    fn is_folded(&self) -> bool;
    fn set_fold(&mut self, folded: bool);

    /// Whether the player has acted since the bet last changed.
    fn is_ready(&self) -> bool;
    fn set_ready(&mut self, ready: bool);

    /// Chips committed during the current betting round.
    fn last_bet(&self) -> Chips;
    fn set_last_bet(&mut self, bet: Chips);

    fn hand(&self) -> Option<HoleCards>;
    fn set_hand(&mut self, hand: Option<HoleCards>);

    /// All-in players have nothing left to wager and cannot act.
    fn is_all_in(&self) -> bool {
        self.balance() == 0
    }

    /// Still in the hand and able to put more chips in.
    fn can_act(&self) -> bool {
        !self.is_folded() && !self.is_all_in()
    }
}

/// Plain in-memory player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seat {
    id: PlayerId,
    balance: Chips,
    folded: bool,
    ready: bool,
    last_bet: Chips,
    hand: Option<HoleCards>,
}

impl Seat {
    pub fn new(id: impl Into<PlayerId>, balance: Chips) -> Self {
        Self { id: id.into(), balance, folded: false, ready: false, last_bet: 0, hand: None }
    }
}

impl Player for Seat {
    fn id(&self) -> &str {
        &self.id
    }

    fn balance(&self) -> Chips {
        self.balance
    }

    fn credit(&mut self, amount: Chips) {
        self.balance = self.balance.saturating_add(amount);
    }

    fn debit(&mut self, amount: Chips) {
        self.balance = self.balance.saturating_sub(amount);
    }

    fn is_folded(&self) -> bool {
        self.folded
    }

    fn set_fold(&mut self, folded: bool) {
        self.folded = folded;
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    fn last_bet(&self) -> Chips {
        self.last_bet
    }

    fn set_last_bet(&mut self, bet: Chips) {
        self.last_bet = bet;
    }

    fn hand(&self) -> Option<HoleCards> {
        self.hand
    }

    fn set_hand(&mut self, hand: Option<HoleCards>) {
        self.hand = hand;
    }
}
