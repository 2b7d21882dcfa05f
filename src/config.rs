use crate::player::Chips;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("a table needs at least two players, min_players is {0}")]
    MinPlayersTooLow(usize),
    #[error("max_players {max} is below min_players {min}")]
    MaxBelowMin { max: usize, min: usize },
}

/// Table setup. Missing fields take their defaults when deserialized.
///
/// ```
/// use holdem_table::config::TableConfig;
///
/// let cfg = TableConfig::default().with_small_blind(5).with_seed(7);
/// assert_eq!(cfg.max_players, 10);
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Seated plus queued players allowed at once.
    pub max_players: usize,
    /// Players needed before a hand can start.
    pub min_players: usize,
    /// Whether players may join (into the queue) while a hand is running.
    pub enter_after_start: bool,
    /// When set, the small blind doubles at the first hand started after
    /// this much time has passed since the previous increase.
    pub blind_increase_interval: Option<Duration>,
    /// Starting small blind; the big blind is always twice this.
    pub small_blind: Chips,
    pub ante: Chips,
    /// Shuffle seed. Zero shuffles from entropy.
    pub seed: u64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            max_players: 10,
            min_players: 2,
            enter_after_start: true,
            blind_increase_interval: None,
            small_blind: 5,
            ante: 0,
            seed: 0,
        }
    }
}

impl TableConfig {
    pub fn with_max_players(mut self, max_players: usize) -> Self {
        self.max_players = max_players;
        self
    }

    pub fn with_min_players(mut self, min_players: usize) -> Self {
        self.min_players = min_players;
        self
    }

    pub fn with_enter_after_start(mut self, allowed: bool) -> Self {
        self.enter_after_start = allowed;
        self
    }

    pub fn with_blind_increase_interval(mut self, interval: Duration) -> Self {
        self.blind_increase_interval = Some(interval);
        self
    }

    pub fn with_small_blind(mut self, small_blind: Chips) -> Self {
        self.small_blind = small_blind;
        self
    }

    pub fn with_ante(mut self, ante: Chips) -> Self {
        self.ante = ante;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_players < 2 {
            return Err(ConfigError::MinPlayersTooLow(self.min_players));
        }
        if self.max_players < self.min_players {
            return Err(ConfigError::MaxBelowMin { max: self.max_players, min: self.min_players });
        }
        Ok(())
    }
}
