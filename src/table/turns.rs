use super::{Round, Table, TableError};
use crate::observer::TableEvent;

impl Table {
    fn seat_can_act(&self, seat: usize) -> bool {
        self.order
            .get(seat)
            .and_then(|id| self.players.get(id))
            .is_some_and(|p| p.can_act())
    }

    fn seat_waiting(&self, seat: usize) -> bool {
        self.order
            .get(seat)
            .and_then(|id| self.players.get(id))
            .is_some_and(|p| p.can_act() && !p.is_ready())
    }

    /// Move the turn clockwise to the next player who still owes a decision.
    ///
    /// Scans a full lap, so the current seat is considered last. Returns the
    /// new turn index, or `None` (turn unchanged) when nobody is waiting.
    pub(crate) fn next_player(&mut self) -> Option<usize> {
        let n = self.order.len();
        for step in 1..=n {
            let seat = (self.turn + step) % n;
            if self.seat_waiting(seat) {
                self.turn = seat;
                return Some(seat);
            }
        }
        None
    }

    /// Pass the button one seat clockwise.
    pub(crate) fn choose_dealer(&mut self) {
        let n = self.order.len();
        if n == 0 {
            return;
        }
        self.dealer = (self.dealer + 1) % n;
        let id = self.order[self.dealer].clone();
        self.notify(TableEvent::DealerMoved { id });
    }

    /// Seat who opens the current round: three after the dealer pre-flop (the
    /// dealer when heads-up), one after the dealer later on. Seats that cannot
    /// act are skipped.
    pub(crate) fn choose_first_to_act(&mut self) {
        let n = self.order.len();
        if n == 0 {
            return;
        }
        let offset = match self.round {
            Some(Round::PreFlop) if n == 2 => 0,
            Some(Round::PreFlop) => 3,
            _ => 1,
        };
        self.turn = (self.dealer + offset) % n;
        if !self.seat_can_act(self.turn) {
            let _ = self.next_player();
        }
    }

    /// Tell observers who is up, if anyone can act.
    pub(crate) fn prompt_current(&mut self) {
        if !self.seat_can_act(self.turn) || self.check_ready() {
            return;
        }
        let Some(id) = self.order.get(self.turn).cloned() else {
            return;
        };
        let to_call = self.to_call(&id).unwrap_or(0);
        self.notify(TableEvent::NextToAct { id, to_call });
    }

    /// After an action or a departure: finish the hand early, deal on when the
    /// round is settled, or hand the turn to the next player.
    pub(crate) fn pass_turn(&mut self) -> Result<(), TableError> {
        if self.live_count() <= 1 {
            return self.enter_round(Round::Showdown);
        }
        let _ = self.next_player();
        if self.check_ready() {
            return self.advance_ready_rounds();
        }
        self.prompt_current();
        Ok(())
    }
}
