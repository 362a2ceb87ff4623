//! # Hold'em Odds
//!
//! Monte Carlo equity estimation for Texas Hold'em.
//!
//! ## Features
//!
//! - **Trial Engine**: Batched, seeded sampling on the rayon pool; results
//!   are reproducible for a seed regardless of thread count
//! - **Live Odds**: Per-street equities that follow the deal and drop
//!   folded seats, exact on the river
//! - **Preflop Percentiles**: All 169 starting-hand classes ranked by
//!   equity and weighted by their 1,326 combinations
//! - **Pluggable Oracle**: The engine ranks hands through the `HandRanker`
//!   trait
//!
//! ## Quick Start
//!
//! ```no_run
//! use holdem_odds::equity::{Deal, FoldSet, LiveOddsCalculator};
//!
//! let calc = LiveOddsCalculator::new();
//! let deal = Deal::parse(&["As Ah", "Kd Kc", "7h 6h"], "Qd 7c 2h")?;
//!
//! let folds = FoldSet::new(3);
//! let flop = calc.compute(&deal, &folds)?;
//!
//! // Seat 1 folds; equities are recomputed over the remaining seats.
//! let folds = folds.fold(1)?;
//! let after_fold = calc.compute(&deal, &folds)?;
//! assert_eq!(after_fold.equity(1), 0.0);
//! # Ok::<(), holdem_odds::EquityError>(())
//! ```
//!
//! ## Modules
//!
//! - [`cards`]: Cards, boards, residual decks, starting-hand classes
//! - [`eval`]: Hand-ranking oracle trait and reference evaluator
//! - [`equity`]: Trial engine, live odds, folds, request/response types
//! - [`percentile`]: Preflop percentile table and its cache
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │            Front ends (live_odds, preflop_table)              │
//! └───────────────────────────────────────────────────────────────┘
//!              │                                   │
//!              ▼                                   ▼
//!    ┌───────────────────┐               ┌───────────────────┐
//!    │ LiveOddsCalculator│               │  PercentileCache  │
//!    │  Deal + FoldSet   │               │  PercentileTable  │
//!    └───────────────────┘               └───────────────────┘
//!              │                                   │
//!              └─────────────────┬─────────────────┘
//!                                ▼
//!                    ┌───────────────────────┐
//!                    │      TrialEngine      │
//!                    │  rayon batches, Tally │
//!                    └───────────────────────┘
//!                      │                   │
//!                      ▼                   ▼
//!               ┌────────────┐      ┌────────────┐
//!               │ Card, Deck │      │ HandRanker │
//!               └────────────┘      └────────────┘
//! ```

#![warn(missing_docs)]

/// Cards, boards, decks and starting-hand classes.
pub mod cards;

/// Error type shared by every module.
pub mod error;

/// Hand-ranking oracle.
pub mod eval;

/// Equity estimation: trials, live odds, folds and configuration.
pub mod equity;

/// Preflop percentile ranking.
pub mod percentile;

// Re-export commonly used types at crate root for convenience
pub use cards::{Board, Card, HandClass, HoleCards, Street};
pub use equity::{
    Deal, EquityRequest, EquityResponse, EquityResult, FoldSet, LiveOddsCalculator, OddsConfig,
    PercentileConfig, TrialSchedule,
};
pub use error::{CardLocation, EquityError, Result};
pub use eval::{HandCategory, HandEvaluator, HandRank, HandRanker};
pub use percentile::{PercentileCache, PercentileEntry, PercentileTable};
