use super::{Table, TableError};
use crate::observer::TableEvent;
use crate::player::Chips;
use std::fmt;

/// A decision by the player whose turn it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Check,
    Call,
    /// Raise the round's bet to this total.
    Raise(Chips),
    Fold,
}

impl Action {
    /// Build an action from its name, ignoring case. `amount` is only read
    /// for raises.
    ///
    /// ```
    /// use holdem_table::table::Action;
    ///
    /// assert_eq!(Action::parse("RAISE", 40).unwrap(), Action::Raise(40));
    /// assert!(Action::parse("bet", 40).is_err());
    /// ```
    pub fn parse(name: &str, amount: Chips) -> Result<Self, TableError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "check" => Ok(Action::Check),
            "call" => Ok(Action::Call),
            "raise" => Ok(Action::Raise(amount)),
            "fold" => Ok(Action::Fold),
            _ => Err(TableError::UnexpectedAction(name.to_string())),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Check => f.write_str("check"),
            Action::Call => f.write_str("call"),
            Action::Raise(amount) => write!(f, "raise {amount}"),
            Action::Fold => f.write_str("fold"),
        }
    }
}

impl Table {
    /// Apply a named action for `id`: `check`, `call`, `raise` (to `amount`)
    /// or `fold`, case-insensitive.
    pub fn make_move(&mut self, id: &str, action: &str, amount: Chips) -> Result<(), TableError> {
        self.ensure_turn(id)?;
        let action = Action::parse(action, amount)?;
        self.act(id, action)
    }

    pub fn act(&mut self, id: &str, action: Action) -> Result<(), TableError> {
        self.ensure_turn(id)?;
        log::debug!("{} -> {}", id, action);
        match action {
            Action::Check => self.check(id)?,
            Action::Call => self.call(id)?,
            Action::Raise(amount) => self.raise(id, amount)?,
            Action::Fold => self.fold(id),
        }
        self.pass_turn()
    }

    fn ensure_turn(&self, id: &str) -> Result<(), TableError> {
        if !self.started {
            return Err(TableError::GameNotStarted);
        }
        if self.order.get(self.turn).map(String::as_str) != Some(id) {
            return Err(TableError::NotYourTurn);
        }
        match self.players.get(id) {
            None => Err(TableError::PlayerNotFound(id.to_string())),
            Some(p) if p.is_folded() => Err(TableError::PlayerIsFold),
            Some(_) => Ok(()),
        }
    }

    fn check(&mut self, id: &str) -> Result<(), TableError> {
        if self.current_bet != 0 {
            return Err(TableError::CantCheck);
        }
        if let Some(p) = self.players.get_mut(id) {
            p.set_ready(true);
        }
        self.notify(TableEvent::Checked { id: id.to_string() });
        Ok(())
    }

    /// Match the current bet, going all-in when the balance falls short.
    fn call(&mut self, id: &str) -> Result<(), TableError> {
        if self.current_bet == 0 {
            return self.check(id);
        }
        let current = self.current_bet;
        let Some(p) = self.players.get_mut(id) else {
            return Err(TableError::PlayerNotFound(id.to_string()));
        };
        let paid = current.saturating_sub(p.last_bet()).min(p.balance());
        p.debit(paid);
        let bet = if p.balance() > 0 { current } else { p.last_bet() + paid };
        p.set_last_bet(bet);
        p.set_ready(true);

        let event = if paid == 0 {
            TableEvent::Checked { id: id.to_string() }
        } else {
            TableEvent::Called { id: id.to_string(), amount: paid }
        };
        self.notify(event);
        Ok(())
    }

    /// Raise the round's bet to `amount`. Everyone still in the hand has to
    /// respond again.
    fn raise(&mut self, id: &str, amount: Chips) -> Result<(), TableError> {
        let Some(p) = self.players.get(id) else {
            return Err(TableError::PlayerNotFound(id.to_string()));
        };
        if amount == 0 || amount <= self.current_bet.saturating_mul(2) || amount <= p.last_bet() {
            return Err(TableError::CantRaise);
        }
        let delta = amount - p.last_bet();
        if delta > p.balance() {
            return Err(TableError::NotEnoughMoney);
        }

        for other in self.players.values_mut().filter(|o| !o.is_folded()) {
            other.set_ready(false);
        }
        if let Some(p) = self.players.get_mut(id) {
            p.debit(delta);
            p.set_last_bet(amount);
            p.set_ready(true);
        }
        self.current_bet = amount;
        self.notify(TableEvent::Raised { id: id.to_string(), amount });
        Ok(())
    }

    fn fold(&mut self, id: &str) {
        if let Some(p) = self.players.get_mut(id) {
            p.set_fold(true);
            p.set_ready(true);
        }
        self.notify(TableEvent::Folded { id: id.to_string() });
    }
}
