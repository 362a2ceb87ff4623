//! Preflop percentile ranking of the 169 starting-hand classes.
//!
//! ## Modules
//!
//! - `table`: Class equities, combination weights and percentiles
//! - `cache`: Process-lifetime table with explicit rebuild
//! - `output`: JSON/CSV export and grid display

pub mod cache;
pub mod output;
pub mod table;

pub use cache::PercentileCache;
pub use table::{PercentileEntry, PercentileTable};
