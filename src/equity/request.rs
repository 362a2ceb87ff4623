//! JSON request and response types for live odds.
//!
//! ```json
//! { "num_players": 3, "hands": ["AS KD", "7h7d", "10h 9h"],
//!   "board": ["Qs Jd 2c"], "folded": [1] }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cards::{parse_cards, Board, Card, HoleCards, Street};
use crate::error::{EquityError, Result};
use crate::eval::HandRanker;

use super::fold::FoldSet;
use super::live::{Deal, EquityResult, LiveOddsCalculator};

/// A live odds query as received from a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquityRequest {
    /// Seats at the table (2-6).
    pub num_players: usize,
    /// One hand per seat, e.g. "AS KD", "AsKd" or "10h 9h".
    pub hands: Vec<String>,
    /// Board cards; each entry may hold several space-separated cards.
    #[serde(default)]
    pub board: Vec<String>,
    /// Seats that have folded.
    #[serde(default)]
    pub folded: Vec<usize>,
}

impl EquityRequest {
    /// Parse a request from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate the request and turn it into a deal and fold set.
    pub fn to_deal(&self) -> Result<(Deal, FoldSet)> {
        if self.hands.len() != self.num_players {
            return Err(EquityError::SeatCountMismatch {
                expected: self.num_players,
                got: self.hands.len(),
            });
        }

        let mut board: Vec<Card> = Vec::with_capacity(5);
        for entry in &self.board {
            board.extend(parse_cards(entry).map_err(EquityError::in_board)?);
        }
        let board = Board::from_cards(board).map_err(EquityError::in_board)?;

        let hands = self
            .hands
            .iter()
            .enumerate()
            .map(|(seat, s)| s.parse::<HoleCards>().map_err(|e| e.in_seat(seat)))
            .collect::<Result<Vec<_>>>()?;

        let deal = Deal::new(hands, board)?;
        let folds = FoldSet::from_folded(deal.num_seats(), &self.folded)?;
        Ok((deal, folds))
    }
}

/// Live odds as returned to a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityResponse {
    /// Equity by seat; folded seats are 0.
    pub equities: BTreeMap<usize, f64>,
    /// Probability each seat wins alone.
    pub win_probs: BTreeMap<usize, f64>,
    /// Probability that the pot is split.
    pub split_prob: f64,
    /// Current street.
    pub street: Street,
    /// Trials run.
    pub trials: usize,
    /// Made hand names by active seat, on the river only.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub hand_names: BTreeMap<usize, String>,
}

impl From<&EquityResult> for EquityResponse {
    fn from(result: &EquityResult) -> Self {
        let by_seat = |values: &[f64]| values.iter().copied().enumerate().collect();
        let hand_names = (0..result.categories.len())
            .filter_map(|seat| result.hand_name(seat).map(|name| (seat, name.to_string())))
            .collect();

        Self {
            equities: by_seat(&result.equities),
            win_probs: by_seat(&result.win_probs),
            split_prob: result.split_prob,
            street: result.street,
            trials: result.trials,
            hand_names,
        }
    }
}

impl<R: HandRanker> LiveOddsCalculator<R> {
    /// Validate a request and compute its response.
    pub fn handle(&self, request: &EquityRequest) -> Result<EquityResponse> {
        let (deal, folds) = request.to_deal()?;
        let result = self.compute(&deal, &folds)?;
        Ok(EquityResponse::from(&result))
    }
}
