//! Hand-ranking oracle.
//!
//! The trial engine only sees the [`HandRanker`] trait; [`HandEvaluator`] is
//! the reference implementation.

pub mod hand_eval;

pub use hand_eval::{HandCategory, HandEvaluator, HandRank, HandRanker};
