//! Configuration for live odds and percentile table builds.
//!
//! Both configs are plain serde structs with presets, `with_*` builders and
//! a `validate()` step, and can be loaded from JSON.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cards::Street;
use crate::error::{EquityError, Result};

/// Default number of trials per rayon batch.
pub const DEFAULT_BATCH_SIZE: usize = 1_000;

/// Number of trials to run on each street.
///
/// The defaults keep the standard error of any equity at or below ~0.0032
/// up to the turn (sigma <= 0.5 / sqrt(N)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrialSchedule {
    /// Trials with an empty board.
    pub preflop: usize,
    /// Trials with three board cards.
    pub flop: usize,
    /// Trials with four board cards.
    pub turn: usize,
    /// Trials with a complete board. One trial is exact when every hand is known.
    pub river: usize,
    /// Lower bound applied to every street.
    pub min_trials: usize,
}

impl Default for TrialSchedule {
    fn default() -> Self {
        Self {
            preflop: 50_000,
            flop: 25_000,
            turn: 10_000,
            river: 1,
            min_trials: 1,
        }
    }
}

impl TrialSchedule {
    /// Use the same trial count on every street except the river.
    pub fn uniform(trials: usize) -> Self {
        Self {
            preflop: trials,
            flop: trials,
            turn: trials,
            ..Default::default()
        }
    }

    /// Trial count for a street, never below `min_trials` (or 1).
    pub fn trials_for(&self, street: Street) -> usize {
        let n = match street {
            Street::Preflop => self.preflop,
            Street::Flop => self.flop,
            Street::Turn => self.turn,
            Street::River => self.river,
        };
        n.max(self.min_trials).max(1)
    }
}

/// Configuration for [`LiveOddsCalculator`](super::LiveOddsCalculator).
///
/// # Example
/// ```
/// use holdem_odds::equity::OddsConfig;
///
/// let config = OddsConfig::fast().with_seed(7);
/// assert_eq!(config.seed, Some(7));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OddsConfig {
    /// Trials per street.
    pub schedule: TrialSchedule,

    /// Trials per parallel batch.
    ///
    /// Each batch owns its own RNG stream, so results depend on the batch
    /// size but not on the number of threads.
    pub batch_size: usize,

    /// Random seed for reproducibility.
    ///
    /// If `None`, a fresh seed is drawn from the OS for every computation.
    pub seed: Option<u64>,

    /// Number of worker threads.
    ///
    /// Set to `None` to use the global rayon pool.
    pub num_threads: Option<usize>,
}

impl Default for OddsConfig {
    fn default() -> Self {
        Self {
            schedule: TrialSchedule::default(),
            batch_size: DEFAULT_BATCH_SIZE,
            seed: None,
            num_threads: None,
        }
    }
}

impl OddsConfig {
    /// Create a new OddsConfig with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Low trial counts for interactive use.
    pub fn fast() -> Self {
        Self {
            schedule: TrialSchedule {
                preflop: 10_000,
                flop: 5_000,
                turn: 2_000,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// High trial counts for offline analysis.
    pub fn precise() -> Self {
        Self {
            schedule: TrialSchedule {
                preflop: 500_000,
                flop: 250_000,
                turn: 100_000,
                ..Default::default()
            },
            batch_size: 5_000,
            ..Default::default()
        }
    }

    /// Builder method: set the trial schedule.
    pub fn with_schedule(mut self, schedule: TrialSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// Builder method: set the batch size.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Builder method: set random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builder method: set number of threads.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.num_threads = Some(threads);
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(EquityError::InvalidConfig("batch_size must be positive".into()));
        }
        if self.num_threads == Some(0) {
            return Err(EquityError::InvalidConfig("num_threads must be positive".into()));
        }
        Ok(())
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Parse configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

/// Configuration for building the preflop percentile table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PercentileConfig {
    /// Trials per starting-hand class, split evenly across its combos.
    pub trials_per_class: usize,
    /// Number of random opponents.
    pub opponents: usize,
    /// Random seed; the table is reproducible for a fixed seed.
    pub seed: u64,
    /// Trials per parallel batch.
    pub batch_size: usize,
}

impl Default for PercentileConfig {
    fn default() -> Self {
        Self {
            trials_per_class: 50_000,
            opponents: 1,
            seed: 42,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl PercentileConfig {
    /// Create a new PercentileConfig with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set trials per class.
    pub fn with_trials(mut self, trials: usize) -> Self {
        self.trials_per_class = trials;
        self
    }

    /// Builder method: set the number of random opponents.
    pub fn with_opponents(mut self, opponents: usize) -> Self {
        self.opponents = opponents;
        self
    }

    /// Builder method: set random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Builder method: set the batch size.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.trials_per_class == 0 {
            return Err(EquityError::InvalidConfig("trials_per_class must be positive".into()));
        }
        if !(1..=5).contains(&self.opponents) {
            return Err(EquityError::InvalidConfig(format!(
                "opponents must be between 1 and 5, got {}",
                self.opponents
            )));
        }
        if self.batch_size == 0 {
            return Err(EquityError::InvalidConfig("batch_size must be positive".into()));
        }
        Ok(())
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Parse configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}
