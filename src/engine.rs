// Table API boundary. Front ends (servers, bots, test harnesses) drive a table
// through this trait without caring whether they hold it directly or share it
// across threads behind a lock.

use crate::observer::Observer;
use crate::player::{Chips, Player};
use crate::table::{Table, TableError};
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;

pub trait PokerTable {
    // Seating
    fn add_observer(&mut self, observer: Box<dyn Observer>);
    fn add_player(&mut self, player: Box<dyn Player>) -> Result<(), TableError>;
    fn remove_player(&mut self, id: &str) -> Result<Box<dyn Player>, TableError>;

    // Hand lifecycle
    fn start_game(&mut self) -> Result<(), TableError>;
    fn make_move(&mut self, id: &str, action: &str, amount: Chips) -> Result<(), TableError>;
}

impl PokerTable for Table {
    fn add_observer(&mut self, observer: Box<dyn Observer>) {
        Table::add_observer(self, observer)
    }
    fn add_player(&mut self, player: Box<dyn Player>) -> Result<(), TableError> {
        Table::add_player(self, player)
    }
    fn remove_player(&mut self, id: &str) -> Result<Box<dyn Player>, TableError> {
        Table::remove_player(self, id)
    }

    fn start_game(&mut self) -> Result<(), TableError> {
        Table::start_game(self)
    }
    fn make_move(&mut self, id: &str, action: &str, amount: Chips) -> Result<(), TableError> {
        Table::make_move(self, id, action, amount)
    }
}

/// A table shared between threads. Every operation takes the lock for its
/// whole duration, so observers see each operation's events contiguously.
#[derive(Debug, Clone)]
pub struct SharedTable {
    inner: Arc<Mutex<Table>>,
}

impl SharedTable {
    pub fn new(table: Table) -> Self {
        Self { inner: Arc::new(Mutex::new(table)) }
    }

    /// Hold the table for queries or several operations in a row.
    pub fn lock(&self) -> MutexGuard<'_, Table> {
        self.inner.lock()
    }
}

impl From<Table> for SharedTable {
    fn from(table: Table) -> Self {
        Self::new(table)
    }
}

impl PokerTable for SharedTable {
    fn add_observer(&mut self, observer: Box<dyn Observer>) {
        self.lock().add_observer(observer)
    }
    fn add_player(&mut self, player: Box<dyn Player>) -> Result<(), TableError> {
        self.lock().add_player(player)
    }
    fn remove_player(&mut self, id: &str) -> Result<Box<dyn Player>, TableError> {
        self.lock().remove_player(id)
    }

    fn start_game(&mut self) -> Result<(), TableError> {
        self.lock().start_game()
    }
    fn make_move(&mut self, id: &str, action: &str, amount: Chips) -> Result<(), TableError> {
        self.lock().make_move(id, action, amount)
    }
}
