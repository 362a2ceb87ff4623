//! Monte Carlo trial engine.
//!
//! Each trial completes the deal at random from the residual deck: unseen
//! seats get two cards, then the board is filled to five. Every seat tied at
//! the best hand takes an equal share of the pot.
//!
//! Trials run in fixed-size batches on the rayon pool. A batch seeds its own
//! `StdRng` from the run seed and its index, and batch tallies are summed in
//! index order, so a run is bit-identical for a given seed and batch size no
//! matter how many threads execute it.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::cards::{Card, Deck, HoleCards};
use crate::error::{CardLocation, EquityError, Result};
use crate::eval::{HandRank, HandRanker};

use super::config::DEFAULT_BATCH_SIZE;

/// A seat taking part in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seat {
    /// Hole cards are known.
    Known(HoleCards),
    /// Hole cards are dealt at random in every trial.
    Unseen,
}

impl Seat {
    /// Known hole cards, if any.
    pub fn hole_cards(&self) -> Option<HoleCards> {
        match self {
            Seat::Known(hole) => Some(*hole),
            Seat::Unseen => None,
        }
    }
}

impl From<HoleCards> for Seat {
    fn from(hole: HoleCards) -> Self {
        Seat::Known(hole)
    }
}

/// Accumulated outcomes of a set of trials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tally {
    /// Sum of pot shares won by each seat.
    pub shares: Vec<f64>,
    /// Trials each seat won alone.
    pub wins: Vec<u64>,
    /// Trials with more than one winner.
    pub splits: u64,
    /// Trials run.
    pub trials: u64,
}

impl Tally {
    /// Empty tally for `seats` seats.
    pub fn new(seats: usize) -> Self {
        Self {
            shares: vec![0.0; seats],
            wins: vec![0; seats],
            splits: 0,
            trials: 0,
        }
    }

    /// Record one trial given every seat's hand rank.
    pub fn record(&mut self, ranks: &[HandRank]) {
        self.trials += 1;
        let Some(best) = ranks.iter().max().copied() else {
            return;
        };
        let winners = ranks.iter().filter(|&&r| r == best).count();
        let share = 1.0 / winners as f64;

        for (seat, rank) in ranks.iter().enumerate() {
            if *rank == best {
                self.shares[seat] += share;
                if winners == 1 {
                    self.wins[seat] += 1;
                }
            }
        }
        if winners > 1 {
            self.splits += 1;
        }
    }

    /// Add another tally over the same seats.
    pub fn merge(&mut self, other: &Tally) {
        for (a, b) in self.shares.iter_mut().zip(&other.shares) {
            *a += b;
        }
        for (a, b) in self.wins.iter_mut().zip(&other.wins) {
            *a += b;
        }
        self.splits += other.splits;
        self.trials += other.trials;
    }

    /// Expected pot share per seat.
    pub fn equities(&self) -> Vec<f64> {
        self.shares.iter().map(|&s| self.ratio(s)).collect()
    }

    /// Probability that each seat wins alone.
    pub fn win_probs(&self) -> Vec<f64> {
        self.wins.iter().map(|&w| self.ratio(w as f64)).collect()
    }

    /// Probability that the pot is split.
    pub fn split_prob(&self) -> f64 {
        self.ratio(self.splits as f64)
    }

    fn ratio(&self, value: f64) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            value / self.trials as f64
        }
    }
}

/// Runs trials against a hand-ranking oracle.
pub struct TrialEngine<'a, R: HandRanker + ?Sized> {
    ranker: &'a R,
    batch_size: usize,
}

impl<'a, R: HandRanker + ?Sized> TrialEngine<'a, R> {
    /// Create an engine with the default batch size.
    pub fn new(ranker: &'a R) -> Self {
        Self {
            ranker,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Builder method: set trials per batch (at least 1).
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        if batch_size == 0 {
            log::warn!("batch size 0 clamped to 1");
        }
        self.batch_size = batch_size.max(1);
        self
    }

    /// Run `trials` trials and return the combined tally.
    ///
    /// `board` holds 0, 3, 4 or 5 known community cards and `dead` lists
    /// cards removed from play. When the board is complete and every seat is
    /// known the outcome is fixed, so exactly one trial runs.
    pub fn run(
        &self,
        seats: &[Seat],
        board: &[Card],
        dead: &[Card],
        trials: usize,
        seed: u64,
    ) -> Result<Tally> {
        let known = validate(seats, board, dead)?;

        let unseen = seats.iter().filter(|s| matches!(s, Seat::Unseen)).count();
        let needed = 2 * unseen + (5 - board.len());
        let available = 52 - known.count_ones() as usize;
        if needed > available {
            return Err(EquityError::DeckExhausted { needed, available });
        }

        let trials = if needed == 0 { 1 } else { trials.max(1) };
        let num_batches = trials.div_ceil(self.batch_size);

        log::debug!(
            "running {} trials in {} batches ({} seats, {} unseen, board {})",
            trials,
            num_batches,
            seats.len(),
            unseen,
            board.len()
        );

        let batches: Vec<Tally> = (0..num_batches)
            .into_par_iter()
            .map(|batch| {
                let start = batch * self.batch_size;
                let count = self.batch_size.min(trials - start);
                self.run_batch(seats, board, known, count, batch_seed(seed, batch as u64))
            })
            .collect::<Result<_>>()?;

        let mut total = Tally::new(seats.len());
        for tally in &batches {
            total.merge(tally);
        }
        Ok(total)
    }

    fn run_batch(
        &self,
        seats: &[Seat],
        board: &[Card],
        known: u64,
        count: usize,
        seed: u64,
    ) -> Result<Tally> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut deck = Deck::from_mask(known);
        let mut tally = Tally::new(seats.len());

        let mut full_board = [Card::from_id(0); 5];
        full_board[..board.len()].copy_from_slice(board);
        let mut holes: Vec<[Card; 2]> = seats
            .iter()
            .map(|s| s.hole_cards().map_or([Card::from_id(0); 2], |h| h.cards()))
            .collect();
        let mut ranks = Vec::with_capacity(seats.len());

        for _ in 0..count {
            deck.reset();

            for (hole, seat) in holes.iter_mut().zip(seats) {
                if let Seat::Unseen = seat {
                    *hole = [deck.draw(&mut rng)?, deck.draw(&mut rng)?];
                }
            }
            for slot in full_board.iter_mut().skip(board.len()) {
                *slot = deck.draw(&mut rng)?;
            }

            ranks.clear();
            for hole in &holes {
                ranks.push(self.ranker.rank_with_board(*hole, &full_board)?);
            }
            tally.record(&ranks);
        }

        Ok(tally)
    }
}

/// Check the inputs and return the mask of every known card.
fn validate(seats: &[Seat], board: &[Card], dead: &[Card]) -> Result<u64> {
    if seats.is_empty() {
        return Err(EquityError::InvalidPlayerCount(0));
    }
    if !matches!(board.len(), 0 | 3 | 4 | 5) {
        return Err(EquityError::InvalidBoardLength(board.len()));
    }

    let mut known = 0u64;
    let mut add = |card: Card, location: CardLocation| {
        if known & card.mask() != 0 {
            return Err(EquityError::DuplicateCard { card, location });
        }
        known |= card.mask();
        Ok(())
    };

    for (i, seat) in seats.iter().enumerate() {
        if let Seat::Known(hole) = seat {
            for card in hole.cards() {
                add(card, CardLocation::Seat(i))?;
            }
        }
    }
    for &card in board {
        add(card, CardLocation::Board)?;
    }
    for &card in dead {
        add(card, CardLocation::Dead)?;
    }
    Ok(known)
}

/// Derive an independent stream seed for one batch (SplitMix64 finalizer).
fn batch_seed(seed: u64, batch: u64) -> u64 {
    let mut z = seed.wrapping_add(batch.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
