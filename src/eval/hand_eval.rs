//! Poker hand evaluation.
//!
//! This module provides hand ranking and comparison for 5-7 card poker hands.
//! The evaluator works directly on rank counts and per-suit rank bitmasks, so
//! a 7-card hand is ranked in one pass without enumerating 5-card subsets.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cards::{card_mask, Card};
use crate::error::{CardLocation, EquityError, Result};

/// Hand rank categories, ordered from worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HandCategory {
    /// No made hand.
    HighCard = 0,
    /// One pair.
    OnePair = 1,
    /// Two pair.
    TwoPair = 2,
    /// Trips or a set.
    ThreeOfAKind = 3,
    /// Five consecutive ranks, the wheel included.
    Straight = 4,
    /// Five cards of one suit.
    Flush = 5,
    /// Three of a kind plus a pair.
    FullHouse = 6,
    /// Quads.
    FourOfAKind = 7,
    /// Includes the royal flush.
    StraightFlush = 8,
}

impl HandCategory {
    /// Get the category name.
    pub fn name(&self) -> &'static str {
        match self {
            HandCategory::HighCard => "High Card",
            HandCategory::OnePair => "One Pair",
            HandCategory::TwoPair => "Two Pair",
            HandCategory::ThreeOfAKind => "Three of a Kind",
            HandCategory::Straight => "Straight",
            HandCategory::Flush => "Flush",
            HandCategory::FullHouse => "Full House",
            HandCategory::FourOfAKind => "Four of a Kind",
            HandCategory::StraightFlush => "Straight Flush",
        }
    }
}

impl fmt::Display for HandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A hand rank that can be compared.
/// Higher values are better hands; equal values split the pot.
/// Format: category (4 bits) | kicker1 (4 bits) | kicker2 (4 bits) | ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandRank(u32);

impl HandRank {
    /// Create a new hand rank.
    fn new(category: HandCategory, kickers: &[u8]) -> Self {
        let mut value = (category as u32) << 20;
        for (i, &k) in kickers.iter().take(5).enumerate() {
            value |= (k as u32) << (16 - i * 4);
        }
        Self(value)
    }

    /// Get the hand category.
    pub fn category(&self) -> HandCategory {
        match self.0 >> 20 {
            0 => HandCategory::HighCard,
            1 => HandCategory::OnePair,
            2 => HandCategory::TwoPair,
            3 => HandCategory::ThreeOfAKind,
            4 => HandCategory::Straight,
            5 => HandCategory::Flush,
            6 => HandCategory::FullHouse,
            7 => HandCategory::FourOfAKind,
            _ => HandCategory::StraightFlush,
        }
    }
}

/// The hand-ranking oracle consumed by the trial engine.
///
/// Implementations must accept 5, 6 or 7 distinct cards and return a totally
/// ordered strength where higher is better and identical hands compare equal.
/// Anything else must fail, never silently succeed.
pub trait HandRanker: Send + Sync {
    /// Rank the best five-card hand contained in `cards`.
    fn rank(&self, cards: &[Card]) -> Result<HandRank>;

    /// Rank two hole cards together with a board.
    fn rank_with_board(&self, hole: [Card; 2], board: &[Card]) -> Result<HandRank> {
        let mut cards = [hole[0]; 7];
        let total = 2 + board.len();
        if total > 7 {
            return Err(EquityError::InsufficientOracleInput(total));
        }
        cards[1] = hole[1];
        cards[2..total].copy_from_slice(board);
        self.rank(&cards[..total])
    }
}

/// Reference hand evaluator.
#[derive(Debug, Clone, Copy, Default)]
pub struct HandEvaluator;

impl HandEvaluator {
    /// Create a new hand evaluator.
    pub fn new() -> Self {
        Self
    }

    /// Rank 5-7 cards that are already known to be distinct.
    pub fn evaluate(&self, cards: &[Card]) -> HandRank {
        // Build rank counts and per-suit rank bitmasks
        let mut rank_counts = [0u8; 13];
        let mut suit_bits = [0u16; 4];
        let mut rank_bits = 0u16;

        for card in cards {
            rank_counts[card.rank() as usize] += 1;
            suit_bits[card.suit() as usize] |= 1 << card.rank();
            rank_bits |= 1 << card.rank();
        }

        let flush_bits = suit_bits.iter().copied().find(|bits| bits.count_ones() >= 5);

        // Straight flush
        if let Some(high) = flush_bits.and_then(find_straight) {
            return HandRank::new(HandCategory::StraightFlush, &[high]);
        }

        // Group ranks by multiplicity, highest rank first
        let mut quads = Ranks::default();
        let mut trips = Ranks::default();
        let mut pairs = Ranks::default();
        let mut singles = Ranks::default();

        for rank in (0..13u8).rev() {
            match rank_counts[rank as usize] {
                4 => quads.push(rank),
                3 => trips.push(rank),
                2 => pairs.push(rank),
                1 => singles.push(rank),
                _ => {}
            }
        }

        // Four of a kind: best remaining card of any multiplicity
        if let Some(quad) = quads.first() {
            let kicker = highest_rank(rank_bits & !(1 << quad)).unwrap_or(0);
            return HandRank::new(HandCategory::FourOfAKind, &[quad, kicker]);
        }

        // Full house
        if let Some(trip) = trips.first() {
            let pair = match (trips.get(1), pairs.first()) {
                (Some(t), Some(p)) => Some(t.max(p)),
                (t, p) => t.or(p),
            };
            if let Some(pair) = pair {
                return HandRank::new(HandCategory::FullHouse, &[trip, pair]);
            }
        }

        // Flush: top five ranks of the flush suit
        if let Some(bits) = flush_bits {
            return HandRank::new(HandCategory::Flush, top_ranks(bits, 5).as_slice());
        }

        // Straight
        if let Some(high) = find_straight(rank_bits) {
            return HandRank::new(HandCategory::Straight, &[high]);
        }

        // Three of a kind
        if let Some(trip) = trips.first() {
            let kickers = top_ranks(rank_bits & !(1 << trip), 2);
            return HandRank::new(
                HandCategory::ThreeOfAKind,
                &[trip, kickers.get(0).unwrap_or(0), kickers.get(1).unwrap_or(0)],
            );
        }

        // Two pair: a third pair can still play as the kicker
        if let (Some(p1), Some(p2)) = (pairs.first(), pairs.get(1)) {
            let kicker = highest_rank(rank_bits & !(1 << p1) & !(1 << p2)).unwrap_or(0);
            return HandRank::new(HandCategory::TwoPair, &[p1, p2, kicker]);
        }

        // One pair
        if let Some(pair) = pairs.first() {
            let kickers = top_ranks(rank_bits & !(1 << pair), 3);
            let mut ranks = [pair, 0, 0, 0];
            ranks[1..1 + kickers.len].copy_from_slice(kickers.as_slice());
            return HandRank::new(HandCategory::OnePair, &ranks);
        }

        // High card
        HandRank::new(HandCategory::HighCard, top_ranks(rank_bits, 5).as_slice())
    }
}

impl HandRanker for HandEvaluator {
    fn rank(&self, cards: &[Card]) -> Result<HandRank> {
        if !(5..=7).contains(&cards.len()) {
            return Err(EquityError::InsufficientOracleInput(cards.len()));
        }
        card_mask(cards, CardLocation::Input)?;
        Ok(self.evaluate(cards))
    }
}

/// Up to seven ranks in descending order, stored inline.
#[derive(Default, Clone, Copy)]
struct Ranks {
    ranks: [u8; 7],
    len: usize,
}

impl Ranks {
    fn push(&mut self, rank: u8) {
        self.ranks[self.len] = rank;
        self.len += 1;
    }

    fn first(&self) -> Option<u8> {
        self.get(0)
    }

    fn get(&self, i: usize) -> Option<u8> {
        (i < self.len).then(|| self.ranks[i])
    }

    fn as_slice(&self) -> &[u8] {
        &self.ranks[..self.len]
    }
}

/// The `n` highest ranks set in `bits`, descending.
fn top_ranks(bits: u16, n: usize) -> Ranks {
    let mut out = Ranks::default();
    let mut rest = bits;
    while out.len < n {
        match highest_rank(rest) {
            Some(rank) => {
                out.push(rank);
                rest &= !(1 << rank);
            }
            None => break,
        }
    }
    out
}

fn highest_rank(bits: u16) -> Option<u8> {
    (bits != 0).then(|| 15 - bits.leading_zeros() as u8)
}

/// Find the highest straight from a rank bitmask.
/// Returns the high card of the straight, or None if no straight.
fn find_straight(rank_bits: u16) -> Option<u8> {
    for high in (4..=12u8).rev() {
        let mask = 0b11111u16 << (high - 4);
        if rank_bits & mask == mask {
            return Some(high);
        }
    }

    // Wheel: A-2-3-4-5, five high
    const WHEEL: u16 = 0b1_0000_0000_1111;
    (rank_bits & WHEEL == WHEEL).then_some(3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;

    fn rank(s: &str) -> HandRank {
        HandEvaluator::new().rank(&parse_cards(s).unwrap()).unwrap()
    }

    #[test]
    fn test_high_card() {
        assert_eq!(rank("As Kd Qh Jc 9s").category(), HandCategory::HighCard);
    }

    #[test]
    fn test_one_pair() {
        assert_eq!(rank("As Ad Kh Qc Js").category(), HandCategory::OnePair);
    }

    #[test]
    fn test_two_pair() {
        assert_eq!(rank("As Ad Kh Kc Js").category(), HandCategory::TwoPair);
    }

    #[test]
    fn test_three_of_a_kind() {
        assert_eq!(rank("As Ad Ah Kc Js").category(), HandCategory::ThreeOfAKind);
    }

    #[test]
    fn test_straight() {
        assert_eq!(rank("Ts 9d 8h 7c 6s").category(), HandCategory::Straight);
        assert_eq!(rank("As Kd Qh Jc Ts").category(), HandCategory::Straight);

        // Wheel (A-2-3-4-5) loses to a six-high straight
        let wheel = rank("5s 4d 3h 2c As");
        assert_eq!(wheel.category(), HandCategory::Straight);
        assert!(wheel < rank("6s 5d 4h 3c 2s"));
    }

    #[test]
    fn test_flush() {
        assert_eq!(rank("As Ks 9s 7s 2s").category(), HandCategory::Flush);
    }

    #[test]
    fn test_full_house() {
        assert_eq!(rank("As Ad Ah Kc Kd").category(), HandCategory::FullHouse);
    }

    #[test]
    fn test_four_of_a_kind() {
        assert_eq!(rank("As Ad Ah Ac Ks").category(), HandCategory::FourOfAKind);
    }

    #[test]
    fn test_straight_flush() {
        assert_eq!(rank("9s 8s 7s 6s 5s").category(), HandCategory::StraightFlush);
        assert_eq!(rank("As Ks Qs Js Ts").category(), HandCategory::StraightFlush);
        assert_eq!(rank("5h 4h 3h 2h Ah").category(), HandCategory::StraightFlush);
    }

    #[test]
    fn test_seven_card_picks_best_five() {
        assert_eq!(rank("Ah As Ad Ac Kh Qs Jd").category(), HandCategory::FourOfAKind);
        // Flush and straight in different cards: flush wins
        assert_eq!(rank("2h 7h 9h Jh Kh Tc Qd").category(), HandCategory::Flush);
        // Two trips make a full house with the lower trips as the pair
        assert_eq!(rank("Kh Kd Kc 7s 7d 7h 2c"), rank("Kh Kd Kc 7s 7d"));
        // Straight flush hidden among seven cards
        assert_eq!(rank("2c 9d Td Jd Qd Kd Ac").category(), HandCategory::StraightFlush);
    }

    #[test]
    fn test_kickers_and_ties() {
        // Same pair, better kicker
        assert!(rank("Ah Ad Kc 7s 4d 3h 2c") > rank("As Ac Qc 7h 4s 3d 2d"));
        // Board plays for both: exact tie
        assert_eq!(rank("2c 3d Ah Kh Qh Jh Th"), rank("4c 5d Ah Kh Qh Jh Th"));
        // Sixth card does not matter in two pair with a third pair
        assert_eq!(rank("Ah Ad Kh Kd Qc Qs 2c"), rank("Ah Ad Kh Kd Qc 3s 2c"));
        // Six-card evaluation
        assert_eq!(rank("Ah Ad Kh Kd Qc 2s").category(), HandCategory::TwoPair);
    }

    #[test]
    fn test_category_ordering() {
        let ladder = [
            "As Kd Qh Jc 9s",
            "As Ad Kh Qc Js",
            "As Ad Kh Kc Js",
            "As Ad Ah Kc Js",
            "Ts 9d 8h 7c 6s",
            "As Ks 9s 7s 2s",
            "As Ad Ah Kc Kd",
            "As Ad Ah Ac Ks",
            "9s 8s 7s 6s 5s",
        ];
        for pair in ladder.windows(2) {
            assert!(rank(pair[0]) < rank(pair[1]), "{} should lose to {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_oracle_rejects_bad_input() {
        let eval = HandEvaluator::new();
        let four = parse_cards("As Kd Qh Jc").unwrap();
        assert!(matches!(eval.rank(&four), Err(EquityError::InsufficientOracleInput(4))));

        let eight = parse_cards("As Kd Qh Jc 9s 8s 7s 6s").unwrap();
        assert!(matches!(eval.rank(&eight), Err(EquityError::InsufficientOracleInput(8))));

        let dup = parse_cards("As Kd Qh Jc As").unwrap();
        assert!(matches!(eval.rank(&dup), Err(EquityError::DuplicateCard { .. })));
    }

    #[test]
    fn test_rank_with_board() {
        let eval = HandEvaluator::new();
        let hole = parse_cards("Ah As").unwrap();
        let board = parse_cards("Ad Ac Kh Qs Jd").unwrap();
        let r = eval.rank_with_board([hole[0], hole[1]], &board).unwrap();
        assert_eq!(r.category(), HandCategory::FourOfAKind);

        let short = parse_cards("Ad Ac").unwrap();
        assert!(eval.rank_with_board([hole[0], hole[1]], &short).is_err());
    }
}
