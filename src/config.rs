use serde::{Deserialize, Serialize};

/// Most seats a 52-card deck can serve: 2 hole cards each, 5 board, 3 burns.
pub const MAX_PLAYERS: usize = 22;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("need between 2 and 22 players, got {0}")]
    PlayerCount(usize),
    #[error("number of hands must be positive")]
    ZeroHands,
    #[error("number of workers must be positive")]
    ZeroWorkers,
    #[error("sample size must be positive")]
    ZeroSamples,
    #[error("blinds must be positive and small blind <= big blind (got {small}/{big})")]
    Blinds { small: u64, big: u64 },
    #[error("starting stack {stack} cannot cover the big blind {big}")]
    StackBelowBlind { stack: u64, big: u64 },
    #[error("lineup has {lineup} strategies for {players} players")]
    LineupSize { lineup: usize, players: usize },
}

/// Stakes and stack sizes for one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub starting_stack: u64,
    pub small_blind: u64,
    pub big_blind: u64,
    /// Raises allowed per phase before further raises count as calls.
    pub max_raises_per_phase: u32,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self { starting_stack: 1000, small_blind: 5, big_blind: 10, max_raises_per_phase: 4 }
    }
}

impl TableConfig {
    pub fn with_blinds(mut self, small: u64, big: u64) -> Self {
        self.small_blind = small;
        self.big_blind = big;
        self
    }

    pub fn with_starting_stack(mut self, stack: u64) -> Self {
        self.starting_stack = stack;
        self
    }

    pub fn with_max_raises(mut self, raises: u32) -> Self {
        self.max_raises_per_phase = raises;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.small_blind == 0 || self.small_blind > self.big_blind {
            return Err(ConfigError::Blinds { small: self.small_blind, big: self.big_blind });
        }
        if self.starting_stack < self.big_blind {
            return Err(ConfigError::StackBelowBlind {
                stack: self.starting_stack,
                big: self.big_blind,
            });
        }
        Ok(())
    }
}

/// Parameters for a simulation run.
///
/// ```
/// use holdem_sim::config::SimulationConfig;
///
/// let cfg = SimulationConfig::default().with_players(6).with_seed(7);
/// assert!(cfg.validate().is_ok());
/// assert_eq!(cfg.num_hands, 1000);
///
/// let json = serde_json::to_string(&cfg).unwrap();
/// let back: SimulationConfig = serde_json::from_str(&json).unwrap();
/// assert_eq!(back, cfg);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub num_players: usize,
    pub num_hands: u64,
    pub num_workers: usize,
    /// Monte Carlo trials per equity estimate.
    pub sample_size: u64,
    pub table: TableConfig,
    /// Fixed seed for reproducible runs; fresh entropy when absent.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_players: 4,
            num_hands: 1000,
            num_workers: 4,
            sample_size: 100,
            table: TableConfig::default(),
            seed: None,
        }
    }
}

impl SimulationConfig {
    pub fn with_players(mut self, n: usize) -> Self {
        self.num_players = n;
        self
    }

    pub fn with_hands(mut self, n: u64) -> Self {
        self.num_hands = n;
        self
    }

    pub fn with_workers(mut self, n: usize) -> Self {
        self.num_workers = n;
        self
    }

    pub fn with_sample_size(mut self, n: u64) -> Self {
        self.sample_size = n;
        self
    }

    pub fn with_table(mut self, table: TableConfig) -> Self {
        self.table = table;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(2..=MAX_PLAYERS).contains(&self.num_players) {
            return Err(ConfigError::PlayerCount(self.num_players));
        }
        if self.num_hands == 0 {
            return Err(ConfigError::ZeroHands);
        }
        if self.num_workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        if self.sample_size == 0 {
            return Err(ConfigError::ZeroSamples);
        }
        self.table.validate()
    }
}
