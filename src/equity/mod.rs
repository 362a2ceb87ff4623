//! Equity estimation.
//!
//! - [`TrialEngine`]: batched Monte Carlo trials over the residual deck
//! - [`LiveOddsCalculator`]: per-street equities with folds
//! - [`EquityRequest`] / [`EquityResponse`]: the JSON boundary

pub mod config;
pub mod fold;
pub mod live;
pub mod request;
pub mod trials;

pub use config::{OddsConfig, PercentileConfig, TrialSchedule, DEFAULT_BATCH_SIZE};
pub use fold::FoldSet;
pub use live::{Deal, EquityResult, LiveOddsCalculator, MAX_PLAYERS, MIN_PLAYERS};
pub use request::{EquityRequest, EquityResponse};
pub use trials::{Seat, Tally, TrialEngine};
