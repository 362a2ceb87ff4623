//! Residual deck model.
//!
//! The deck is the 52-card universe minus every known card. Sampling draws
//! without replacement by swap-removal, so each draw costs O(1) and a trial
//! never sees the same card twice.

use std::fmt;

use rand::Rng;

use super::card::{card_mask, Card};
use crate::error::{CardLocation, EquityError, Result};

/// The 52-card universe minus `known`, in card id order.
///
/// Fails with `DuplicateCard` if `known` repeats a card.
pub fn available_cards(known: &[Card]) -> Result<Vec<Card>> {
    let mask = card_mask(known, CardLocation::Input)?;
    Ok(cards_outside(mask))
}

/// All cards whose bit is not set in `mask`, in card id order.
pub fn cards_outside(mask: u64) -> Vec<Card> {
    Card::all().filter(|c| mask & c.mask() == 0).collect()
}

/// A deck of the cards still in circulation.
///
/// Drawn cards are swapped behind the live region, so `reset` restores the
/// full residual deck without reallocating.
#[derive(Clone)]
pub struct Deck {
    /// Residual cards; `cards[..live]` are still drawable.
    cards: Vec<Card>,
    /// Number of cards not yet drawn.
    live: usize,
}

impl Deck {
    /// Create a full 52-card deck in standard order.
    pub fn new() -> Self {
        Self::from_mask(0)
    }

    /// Create a deck with the given cards removed.
    pub fn without(dead_cards: &[Card]) -> Result<Self> {
        Ok(Self::from_cards(available_cards(dead_cards)?))
    }

    /// Create a deck with every card in `mask` removed.
    pub fn from_mask(mask: u64) -> Self {
        Self::from_cards(cards_outside(mask))
    }

    fn from_cards(cards: Vec<Card>) -> Self {
        let live = cards.len();
        Self { cards, live }
    }

    /// Draw one uniformly random card without replacement.
    #[inline]
    pub fn draw<R: Rng>(&mut self, rng: &mut R) -> Result<Card> {
        if self.live == 0 {
            return Err(EquityError::DeckExhausted {
                needed: 1,
                available: 0,
            });
        }
        let pick = rng.gen_range(0..self.live);
        self.live -= 1;
        self.cards.swap(pick, self.live);
        Ok(self.cards[self.live])
    }

    /// Put every drawn card back.
    #[inline]
    pub fn reset(&mut self) {
        self.live = self.cards.len();
    }

    /// Get the number of remaining cards.
    pub fn remaining(&self) -> usize {
        self.live
    }

}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Deck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Deck({}/{} remaining)", self.live, self.cards.len())
    }
}
