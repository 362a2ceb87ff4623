//! Fold tracking.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EquityError, Result};

/// The set of folded seats at a table.
///
/// Folding returns a new set and never removes a seat from it, so a fold
/// cannot be undone and a rejected fold leaves the original untouched.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FoldSet {
    seats: usize,
    folded: u8,
}

impl FoldSet {
    /// No folds at a table with `seats` seats (at most 8).
    pub fn new(seats: usize) -> Self {
        if seats > 8 {
            log::warn!("fold set clamped from {} to 8 seats", seats);
        }
        Self {
            seats: seats.min(8),
            folded: 0,
        }
    }

    /// Build a fold set from a list of folded seats.
    pub fn from_folded(seats: usize, folded: &[usize]) -> Result<Self> {
        folded
            .iter()
            .try_fold(Self::new(seats), |set, &seat| set.fold(seat))
    }

    /// Fold `seat`, returning the new set.
    pub fn fold(&self, seat: usize) -> Result<Self> {
        if seat >= self.seats {
            return Err(EquityError::InvalidSeat {
                seat,
                seats: self.seats,
            });
        }
        if self.is_folded(seat) {
            return Err(EquityError::AlreadyFolded(seat));
        }
        if self.num_active() == 1 {
            return Err(EquityError::LastPlayer { seat });
        }
        Ok(Self {
            seats: self.seats,
            folded: self.folded | (1 << seat),
        })
    }

    /// Check if a seat has folded.
    pub fn is_folded(&self, seat: usize) -> bool {
        seat < self.seats && self.folded & (1 << seat) != 0
    }

    /// Check if a seat is still in the hand.
    pub fn is_active(&self, seat: usize) -> bool {
        seat < self.seats && !self.is_folded(seat)
    }

    /// Number of seats at the table.
    pub fn num_seats(&self) -> usize {
        self.seats
    }

    /// Number of seats still in the hand.
    pub fn num_active(&self) -> usize {
        self.seats - self.folded.count_ones() as usize
    }

    /// Active seat indices in ascending order.
    pub fn active(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.seats).filter(move |&s| self.is_active(s))
    }

    /// Folded seat indices in ascending order.
    pub fn folded(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.seats).filter(move |&s| self.is_folded(s))
    }
}

impl fmt::Debug for FoldSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FoldSet")
            .field("seats", &self.seats)
            .field("folded", &self.folded().collect::<Vec<_>>())
            .finish()
    }
}
