//! The table aggregate and its round state machine.
//!
//! A [`Table`] owns everything a hand needs: seating, deck, pots and the
//! round index. Callers drive it with [`Table::add_player`],
//! [`Table::start_game`] and [`Table::make_move`]; every state change is
//! reported to the registered observers in the order it happens.

mod betting;
mod turns;

pub use betting::Action;

use crate::config::{ConfigError, TableConfig};
use crate::deck::{next_seed, Deck, DeckError};
use crate::evaluator::{EvalError, HandEvaluator, StandardEvaluator};
use crate::hand::{Board, HandError, HoleCards};
use crate::observer::{Observer, TableEvent};
use crate::player::{Chips, Player, PlayerId};
use crate::pot::{self, create_pots, merge_pots, Contribution, Pot};
use std::collections::HashMap;
use std::fmt;
use std::time::Instant;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TableError {
    #[error("table is full: at most {max} players")]
    MaxPlayers { max: usize },
    #[error("this game already started")]
    GameStarted,
    #[error("this game has not started")]
    GameNotStarted,
    #[error("need {required} players with chips to start, have {available}")]
    NotEnoughPlayers { required: usize, available: usize },
    #[error(transparent)]
    NotEnoughCards(#[from] DeckError),
    #[error("not your turn")]
    NotYourTurn,
    #[error("player already folded")]
    PlayerIsFold,
    #[error("cannot check while facing a bet")]
    CantCheck,
    #[error("raise must be more than twice the current bet")]
    CantRaise,
    #[error("not enough money for this action")]
    NotEnoughMoney,
    #[error("unexpected action: '{0}'")]
    UnexpectedAction(String),
    #[error("player not found: {0}")]
    PlayerNotFound(String),
    #[error("player {0} is already at the table")]
    DuplicatePlayer(String),
    #[error("bad deal: {0}")]
    InvalidHand(#[from] HandError),
    #[error("showdown failed: {0}")]
    Evaluation(#[from] EvalError),
    #[error("invalid table config: {0}")]
    InvalidConfig(#[from] ConfigError),
}

/// Stages of a hand. No hand in progress is `None` at the table level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Round {
    PreFlop,
    Flop,
    Turn,
    River,
    Showdown,
}

impl Round {
    pub const fn index(self) -> i8 {
        match self {
            Round::PreFlop => 0,
            Round::Flop => 1,
            Round::Turn => 2,
            Round::River => 3,
            Round::Showdown => 4,
        }
    }

    pub const fn next(self) -> Option<Round> {
        match self {
            Round::PreFlop => Some(Round::Flop),
            Round::Flop => Some(Round::Turn),
            Round::Turn => Some(Round::River),
            Round::River => Some(Round::Showdown),
            Round::Showdown => None,
        }
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Round::PreFlop => "pre-flop",
            Round::Flop => "flop",
            Round::Turn => "turn",
            Round::River => "river",
            Round::Showdown => "showdown",
        })
    }
}

pub struct Table {
    config: TableConfig,

    pub(crate) small_blind: Chips,
    pub(crate) ante: Chips,
    pub(crate) dealer: usize,
    pub(crate) turn: usize,
    pub(crate) current_bet: Chips,
    pub(crate) board: Board,
    pub(crate) order: Vec<PlayerId>,
    pub(crate) players: HashMap<PlayerId, Box<dyn Player>>,
    pub(crate) queue: Vec<Box<dyn Player>>,
    pub(crate) pots: Vec<Pot>,
    pub(crate) deck: Deck,
    pub(crate) round: Option<Round>,
    pub(crate) started: bool,
    pub(crate) seed: u64,

    /// Bets of players who left mid-round, collected with the round's pots.
    forfeits: Vec<Contribution>,
    eliminated: Vec<Box<dyn Player>>,
    last_blind_increase: Instant,
    observers: Vec<Box<dyn Observer>>,
    evaluator: Box<dyn HandEvaluator>,
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("config", &self.config)
            .field("round", &self.round)
            .field("order", &self.order)
            .field("dealer", &self.dealer)
            .field("turn", &self.turn)
            .field("current_bet", &self.current_bet)
            .field("board", &self.board)
            .field("pots", &self.pots)
            .field("queued", &self.queue.len())
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}

impl Table {
    pub fn new(config: TableConfig) -> Result<Self, TableError> {
        Self::with_evaluator(config, Box::new(StandardEvaluator))
    }

    pub fn with_evaluator(
        config: TableConfig,
        evaluator: Box<dyn HandEvaluator>,
    ) -> Result<Self, TableError> {
        config.validate()?;
        Ok(Self {
            small_blind: config.small_blind,
            ante: config.ante,
            seed: config.seed,
            dealer: 0,
            turn: 0,
            current_bet: 0,
            board: Board::default(),
            order: Vec::with_capacity(config.max_players),
            players: HashMap::new(),
            queue: Vec::new(),
            pots: Vec::new(),
            deck: Deck::default(),
            round: None,
            started: false,
            forfeits: Vec::new(),
            eliminated: Vec::new(),
            last_blind_increase: Instant::now(),
            observers: Vec::new(),
            evaluator,
            config,
        })
    }

    // Queries

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn round(&self) -> Option<Round> {
        self.round
    }

    /// Round index as a number: -1 with no hand running, 0..=4 otherwise.
    pub fn round_index(&self) -> i8 {
        self.round.map_or(-1, Round::index)
    }

    pub fn small_blind(&self) -> Chips {
        self.small_blind
    }

    pub fn big_blind(&self) -> Chips {
        self.small_blind.saturating_mul(2)
    }

    pub fn ante(&self) -> Chips {
        self.ante
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn dealer(&self) -> usize {
        self.dealer
    }

    pub fn dealer_id(&self) -> Option<&str> {
        self.order.get(self.dealer).map(String::as_str)
    }

    pub fn turn(&self) -> usize {
        self.turn
    }

    /// Who is expected to act, while a hand is running.
    pub fn current_player(&self) -> Option<&str> {
        if !self.started {
            return None;
        }
        self.order.get(self.turn).map(String::as_str)
    }

    pub fn current_bet(&self) -> Chips {
        self.current_bet
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn pots(&self) -> &[Pot] {
        &self.pots
    }

    pub fn pot_total(&self) -> Chips {
        self.pots.iter().map(|p| p.amount).sum()
    }

    /// Chips bet this round that have not been gathered into pots yet.
    pub fn outstanding_bets(&self) -> Chips {
        let live: Chips = self.players.values().map(|p| p.last_bet()).sum();
        live + self.forfeits.iter().map(|c| c.amount).sum::<Chips>()
    }

    pub fn players_order(&self) -> &[PlayerId] {
        &self.order
    }

    pub fn player(&self, id: &str) -> Option<&dyn Player> {
        self.players.get(id).map(|p| p.as_ref())
    }

    pub fn queued(&self) -> Vec<&str> {
        self.queue.iter().map(|p| p.id()).collect()
    }

    /// Chips `id` must add to stay in, clamped to their balance.
    pub fn to_call(&self, id: &str) -> Option<Chips> {
        let p = self.players.get(id)?;
        Some(self.current_bet.saturating_sub(p.last_bet()).min(p.balance()))
    }

    /// Hand back players removed for not covering the ante.
    pub fn take_eliminated(&mut self) -> Vec<Box<dyn Player>> {
        std::mem::take(&mut self.eliminated)
    }

    // Seating

    pub fn add_observer(&mut self, observer: Box<dyn Observer>) {
        self.observers.push(observer);
    }

    pub fn add_player(&mut self, player: Box<dyn Player>) -> Result<(), TableError> {
        if self.started && !self.config.enter_after_start {
            return Err(TableError::GameStarted);
        }
        if self.order.len() + self.queue.len() + 1 > self.config.max_players {
            return Err(TableError::MaxPlayers { max: self.config.max_players });
        }
        let id = player.id().to_string();
        if self.players.contains_key(&id) || self.queue.iter().any(|p| p.id() == id) {
            return Err(TableError::DuplicatePlayer(id));
        }

        let queued = self.started;
        if queued {
            self.queue.push(player);
        } else {
            self.players.insert(id.clone(), player);
            self.order.push(id.clone());
        }
        log::debug!("player {} added (queued: {})", id, queued);
        self.notify(TableEvent::PlayerJoined { id, queued });
        Ok(())
    }

    /// Take a player off the table, returning them to the caller.
    ///
    /// Leaving mid-hand forfeits whatever they bet this round; the hand goes
    /// on without them, or ends if only one player is left in it.
    pub fn remove_player(&mut self, id: &str) -> Result<Box<dyn Player>, TableError> {
        if let Some(pos) = self.queue.iter().position(|p| p.id() == id) {
            let player = self.queue.remove(pos);
            self.notify(TableEvent::PlayerLeft { id: id.to_string() });
            return Ok(player);
        }
        let Some(seat) = self.order.iter().position(|x| x == id) else {
            return Err(TableError::PlayerNotFound(id.to_string()));
        };

        let was_turn = self.started && seat == self.turn;
        let mut player =
            self.detach_seat(seat).ok_or_else(|| TableError::PlayerNotFound(id.into()))?;
        self.notify(TableEvent::PlayerLeft { id: id.to_string() });
        if !self.started {
            return Ok(player);
        }

        let bet = player.last_bet();
        player.set_last_bet(0);
        if bet > 0 {
            self.forfeits.push(Contribution {
                id: id.to_string(),
                amount: bet,
                folded: true,
                all_in: false,
            });
        }
        for pot in &mut self.pots {
            pot.applicants.retain(|a| a != id);
        }
        if let Err(e) = self.resume_after_departure(was_turn) {
            self.eliminated.push(player);
            return Err(e);
        }
        Ok(player)
    }

    fn resume_after_departure(&mut self, was_turn: bool) -> Result<(), TableError> {
        if self.live_count() <= 1 {
            return self.enter_round(Round::Showdown);
        }
        if was_turn {
            return self.pass_turn();
        }
        self.advance_ready_rounds()
    }

    /// Remove seat `seat` from the order, keeping `dealer` and `turn` on the
    /// same players. A removed dealer/actor leaves the index on the previous seat.
    fn detach_seat(&mut self, seat: usize) -> Option<Box<dyn Player>> {
        let id = self.order.remove(seat);
        let n = self.order.len();
        let shift = |idx: usize| -> usize {
            if n == 0 {
                0
            } else if seat < idx {
                idx - 1
            } else if seat == idx {
                (idx + n - 1) % n
            } else {
                idx % n
            }
        };
        self.dealer = shift(self.dealer);
        self.turn = shift(self.turn);
        self.players.remove(&id)
    }

    // Hand lifecycle

    /// Begin a hand: reshuffle and enter pre-flop.
    pub fn start_game(&mut self) -> Result<(), TableError> {
        if self.started {
            return Err(TableError::GameStarted);
        }
        let available = self
            .order
            .iter()
            .filter_map(|id| self.players.get(id))
            .chain(self.queue.iter())
            .filter(|p| self.covers_ante(p.as_ref()))
            .count();
        if available < self.config.min_players {
            return Err(TableError::NotEnoughPlayers {
                required: self.config.min_players,
                available,
            });
        }

        self.increase_blinds_if_due(Instant::now());
        self.started = true;
        self.round = None;
        self.deck.refresh(self.seed);
        log::info!("hand starting with {} players, seed {}", available, self.seed);
        self.notify(TableEvent::GameStarted);
        self.new_round()?;
        self.advance_ready_rounds()
    }

    fn increase_blinds_if_due(&mut self, now: Instant) {
        let Some(interval) = self.config.blind_increase_interval else {
            return;
        };
        if now.saturating_duration_since(self.last_blind_increase) >= interval {
            self.small_blind = self.small_blind.saturating_mul(2);
            self.last_blind_increase = now;
            log::info!("small blind raised to {}", self.small_blind);
            self.notify(TableEvent::BlindsIncreased { small_blind: self.small_blind });
        }
    }

    /// Move the hand to its next round.
    pub fn new_round(&mut self) -> Result<(), TableError> {
        if !self.started {
            return Err(TableError::GameNotStarted);
        }
        let next = match self.round {
            None => Round::PreFlop,
            Some(r) => r.next().ok_or(TableError::GameNotStarted)?,
        };
        self.enter_round(next)
    }

    fn enter_round(&mut self, next: Round) -> Result<(), TableError> {
        self.collect_pots();
        self.round = Some(next);
        self.current_bet = 0;
        log::debug!("entering {}", next);
        self.notify(TableEvent::RoundStarted { round: next });
        self.reset_round_flags();

        match next {
            Round::PreFlop => self.begin_hand()?,
            Round::Flop => self.reveal(3)?,
            Round::Turn | Round::River => self.reveal(1)?,
            Round::Showdown => return self.showdown(),
        }
        self.choose_first_to_act();
        self.prompt_current();
        Ok(())
    }

    /// Gather this round's bets into the pot list.
    fn collect_pots(&mut self) {
        let mut contributions: Vec<Contribution> = self
            .order
            .iter()
            .filter_map(|id| self.players.get(id))
            .map(|p| Contribution::of(p.as_ref()))
            .collect();
        contributions.append(&mut self.forfeits);
        merge_pots(&mut self.pots, create_pots(&contributions));
    }

    fn reset_round_flags(&mut self) {
        for p in self.players.values_mut() {
            p.set_last_bet(0);
            p.set_ready(false);
        }
    }

    fn begin_hand(&mut self) -> Result<(), TableError> {
        self.promote_queue();
        self.pots.clear();
        self.board.clear();
        for p in self.players.values_mut() {
            p.set_fold(false);
            p.set_hand(None);
        }
        self.eliminate_short_stacks();
        if self.order.len() < 2 {
            self.started = false;
            self.round = None;
            let available = self.order.len();
            return Err(TableError::NotEnoughPlayers { required: 2, available });
        }

        self.post_ante();
        self.deal_hole_cards()?;
        self.choose_dealer();
        self.post_blinds();
        Ok(())
    }

    fn promote_queue(&mut self) {
        for mut p in std::mem::take(&mut self.queue) {
            p.set_last_bet(0);
            p.set_ready(false);
            let id = p.id().to_string();
            self.order.push(id.clone());
            self.players.insert(id, p);
        }
    }

    fn covers_ante(&self, p: &dyn Player) -> bool {
        p.balance() > 0 && p.balance() >= self.ante
    }

    fn eliminate_short_stacks(&mut self) {
        let mut seat = 0;
        while seat < self.order.len() {
            let covered = self
                .players
                .get(&self.order[seat])
                .is_some_and(|p| self.covers_ante(p.as_ref()));
            if covered {
                seat += 1;
                continue;
            }
            if let Some(p) = self.detach_seat(seat) {
                let (id, balance) = (p.id().to_string(), p.balance());
                log::warn!("player {} eliminated with {} chips, ante {}", id, balance, self.ante);
                self.eliminated.push(p);
                self.notify(TableEvent::PlayerEliminated { id, balance });
            }
        }
    }

    fn post_ante(&mut self) {
        if self.ante == 0 {
            return;
        }
        for p in self.players.values_mut() {
            p.debit(self.ante);
        }
        let total = self.ante * self.order.len() as Chips;
        merge_pots(&mut self.pots, vec![Pot::new(total, self.order.clone())]);
        self.notify(TableEvent::AntePosted { total });
    }

    fn deal_hole_cards(&mut self) -> Result<(), TableError> {
        for id in self.order.clone() {
            let cards = HoleCards::from_slice(&self.deck.draw(2)?)?;
            if let Some(p) = self.players.get_mut(&id) {
                p.set_hand(Some(cards));
            }
            self.notify(TableEvent::HoleCardsDealt { id, cards });
        }
        Ok(())
    }

    fn post_blinds(&mut self) {
        let n = self.order.len();
        let (sb, bb) = if n > 2 {
            ((self.dealer + 1) % n, (self.dealer + 2) % n)
        } else {
            (self.dealer, (self.dealer + 1) % n)
        };
        let small = self.post_forced(sb, self.small_blind);
        let big = self.post_forced(bb, self.big_blind());
        if n == 2 {
            // Heads-up the big blind has no option: a call from the button
            // closes pre-flop, a raise reopens it.
            if let Some(p) = self.order.get(bb).and_then(|id| self.players.get_mut(id)) {
                p.set_ready(true);
            }
        }
        if let Some(id) = self.order.get(sb).cloned() {
            self.notify(TableEvent::SmallBlindPosted { id, amount: small });
        }
        if let Some(id) = self.order.get(bb).cloned() {
            self.notify(TableEvent::BigBlindPosted { id, amount: big });
        }
        self.current_bet = small.max(big);
    }

    /// Take up to `amount` from the player in `seat` as this round's bet.
    fn post_forced(&mut self, seat: usize, amount: Chips) -> Chips {
        let Some(p) = self.order.get(seat).and_then(|id| self.players.get_mut(id)) else {
            return 0;
        };
        let paid = amount.min(p.balance());
        p.debit(paid);
        p.set_last_bet(paid);
        paid
    }

    fn reveal(&mut self, n: usize) -> Result<(), TableError> {
        let cards = self.deck.draw(n)?;
        self.board.extend(cards);
        self.notify(TableEvent::CommunityCards { board: self.board.clone() });
        Ok(())
    }

    /// Pay out and close the hand. When the evaluator fails, every pot is
    /// split among its live applicants instead, the hand still closes, and the
    /// evaluation error is returned.
    fn showdown(&mut self) -> Result<(), TableError> {
        let settled = pot::settle(
            &self.pots,
            &self.board,
            &self.order,
            self.dealer,
            &mut self.players,
            self.evaluator.as_ref(),
        );
        let (awards, failure) = match settled {
            Ok(awards) => (awards, None),
            Err(err) => {
                log::warn!("showdown evaluation failed ({}), splitting the pots", err);
                let awards =
                    pot::split_evenly(&self.pots, &self.order, self.dealer, &mut self.players);
                (awards, Some(err))
            }
        };
        for award in awards {
            log::info!(
                "pot {} ({} chips) to {:?}, odd chips {:?}",
                award.pot + 1,
                award.amount,
                award.winners,
                award.odd_chips
            );
            self.notify(TableEvent::PotAwarded {
                pot: award.pot + 1,
                share: award.share,
                winners: award.winners,
            });
        }

        self.seed = next_seed(self.seed);
        self.started = false;
        self.round = None;
        self.pots.clear();
        self.board.clear();
        self.current_bet = 0;
        for p in self.players.values_mut() {
            p.set_fold(false);
            p.set_ready(false);
            p.set_last_bet(0);
        }
        log::info!("hand finished");
        self.notify(TableEvent::HandFinished);
        match failure {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    /// True when betting in the current round is over: every player still in
    /// the hand has acted or is all-in, or at most one player can still bet and
    /// has nothing left to call.
    pub fn check_ready(&self) -> bool {
        if !self.started {
            return false;
        }
        let live: Vec<&dyn Player> =
            self.players.values().map(|p| p.as_ref()).filter(|p| !p.is_folded()).collect();
        if live.iter().all(|p| p.is_ready() || p.is_all_in()) {
            return true;
        }
        let mut actors = live.iter().filter(|p| p.can_act());
        match (actors.next(), actors.next()) {
            (Some(only), None) => only.last_bet() >= self.current_bet,
            _ => false,
        }
    }

    /// Deal out rounds for as long as nobody has a decision to make.
    fn advance_ready_rounds(&mut self) -> Result<(), TableError> {
        while self.started && self.check_ready() {
            self.new_round()?;
        }
        Ok(())
    }

    pub(crate) fn live_count(&self) -> usize {
        self.players.values().filter(|p| !p.is_folded()).count()
    }

    pub(crate) fn notify(&mut self, event: TableEvent) {
        log::debug!("{}", event);
        for o in &mut self.observers {
            o.update(&event);
        }
    }
}
