//! Canonical starting-hand classes.
//!
//! There are 169 strategically distinct preflop hands:
//! - 13 pairs (AA, KK, ..., 22), 6 combos each
//! - 78 suited hands (AKs, AQs, ..., 32s), 4 combos each
//! - 78 offsuit hands (AKo, AQo, ..., 32o), 12 combos each
//!
//! for a total of 1,326 concrete two-card combinations.
//!
//! Indices: pairs 0-12 (22-AA), suited 13-90, offsuit 91-168.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::card::{parse_rank, Card, HoleCards, RANK_CHARS};
use crate::error::{EquityError, Result};

/// Number of starting-hand classes.
pub const NUM_HAND_CLASSES: usize = 169;

/// Number of concrete two-card starting hands (52 choose 2).
pub const NUM_COMBOS: usize = 1326;

/// Which of the three class shapes a hand belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassKind {
    /// Two cards of the same rank.
    Pair,
    /// Two ranks, same suit.
    Suited,
    /// Two ranks, different suits.
    Offsuit,
}

impl ClassKind {
    /// Number of concrete combinations for this shape.
    pub fn combos(&self) -> u8 {
        match self {
            ClassKind::Pair => 6, // C(4,2)
            ClassKind::Suited => 4,
            ClassKind::Offsuit => 12,
        }
    }
}

/// A starting-hand class such as "AKs", "QQ" or "72o".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandClass {
    /// Rank of first card (higher or equal)
    pub rank1: u8,
    /// Rank of second card (lower or equal)
    pub rank2: u8,
    /// Whether suited (always false for pairs)
    pub suited: bool,
}

impl HandClass {
    /// Get hand class from index (0-168).
    pub fn from_index(index: u8) -> Self {
        debug_assert!((index as usize) < NUM_HAND_CLASSES);
        if index < 13 {
            Self {
                rank1: index,
                rank2: index,
                suited: false,
            }
        } else if index < 91 {
            let (r1, r2) = decode_triangular(index - 13);
            Self {
                rank1: r1,
                rank2: r2,
                suited: true,
            }
        } else {
            let (r1, r2) = decode_triangular(index - 91);
            Self {
                rank1: r1,
                rank2: r2,
                suited: false,
            }
        }
    }

    /// Class of a concrete two-card hand.
    pub fn of(hole_cards: &HoleCards) -> Self {
        let (r1, r2) = (hole_cards.card1.rank(), hole_cards.card2.rank());
        Self {
            rank1: r1.max(r2),
            rank2: r1.min(r2),
            suited: r1 != r2 && hole_cards.is_suited(),
        }
    }

    /// Get the hand class index (0-168).
    pub fn index(&self) -> u8 {
        if self.rank1 == self.rank2 {
            self.rank1
        } else if self.suited {
            13 + encode_triangular(self.rank1, self.rank2)
        } else {
            91 + encode_triangular(self.rank1, self.rank2)
        }
    }

    /// Pair, suited or offsuit.
    pub fn kind(&self) -> ClassKind {
        if self.rank1 == self.rank2 {
            ClassKind::Pair
        } else if self.suited {
            ClassKind::Suited
        } else {
            ClassKind::Offsuit
        }
    }

    /// Number of combinations for this hand class.
    pub fn num_combos(&self) -> u8 {
        self.kind().combos()
    }

    /// Display label (e.g., "AKs", "QQ", "72o").
    pub fn label(&self) -> String {
        self.to_string()
    }

    /// Enumerate all specific combos for this hand class.
    pub fn enumerate_combos(&self) -> Vec<HoleCards> {
        let mut combos = Vec::with_capacity(self.num_combos() as usize);

        match self.kind() {
            ClassKind::Pair => {
                for s1 in 0..4u8 {
                    for s2 in (s1 + 1)..4u8 {
                        combos.push(HoleCards::new(
                            Card::new(self.rank1, s1),
                            Card::new(self.rank2, s2),
                        ));
                    }
                }
            }
            ClassKind::Suited => {
                for suit in 0..4u8 {
                    combos.push(HoleCards::new(
                        Card::new(self.rank1, suit),
                        Card::new(self.rank2, suit),
                    ));
                }
            }
            ClassKind::Offsuit => {
                for s1 in 0..4u8 {
                    for s2 in 0..4u8 {
                        if s1 != s2 {
                            combos.push(HoleCards::new(
                                Card::new(self.rank1, s1),
                                Card::new(self.rank2, s2),
                            ));
                        }
                    }
                }
            }
        }

        combos
    }

    /// Position in the 13x13 grid (row, col), aces first.
    ///
    /// Pairs sit on the diagonal, suited hands above it and offsuit below.
    pub fn grid_position(&self) -> (usize, usize) {
        let hi = 12 - self.rank1 as usize;
        let lo = 12 - self.rank2 as usize;
        if self.suited {
            (hi, lo)
        } else {
            (lo, hi)
        }
    }

    /// Hand class at a grid position (inverse of `grid_position`).
    pub fn at_grid(row: usize, col: usize) -> Self {
        debug_assert!(row < 13 && col < 13);
        let r_row = 12 - row as u8;
        let r_col = 12 - col as u8;
        Self {
            rank1: r_row.max(r_col),
            rank2: r_row.min(r_col),
            suited: row < col,
        }
    }

    /// Iterate over all 169 classes in index order.
    pub fn all() -> HandClassIter {
        HandClassIter::new()
    }
}

impl fmt::Display for HandClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r1 = RANK_CHARS[self.rank1 as usize];
        let r2 = RANK_CHARS[self.rank2 as usize];
        match self.kind() {
            ClassKind::Pair => write!(f, "{}{}", r1, r2),
            ClassKind::Suited => write!(f, "{}{}s", r1, r2),
            ClassKind::Offsuit => write!(f, "{}{}o", r1, r2),
        }
    }
}

impl FromStr for HandClass {
    type Err = EquityError;

    /// Parse labels like "AA", "AKs" or "kqo". Non-pairs need an s/o suffix.
    fn from_str(s: &str) -> Result<Self> {
        let label = s.trim();
        let invalid = || EquityError::InvalidHandClass(label.to_string());
        let chars: Vec<char> = label.chars().collect();
        if chars.len() < 2 || chars.len() > 3 {
            return Err(invalid());
        }

        let r1 = parse_rank(chars[0]).ok_or_else(invalid)?;
        let r2 = parse_rank(chars[1]).ok_or_else(invalid)?;
        let (high, low) = (r1.max(r2), r1.min(r2));

        let suited = match (high == low, chars.get(2).map(|c| c.to_ascii_lowercase())) {
            (true, None) => false,
            (false, Some('s')) => true,
            (false, Some('o')) => false,
            _ => return Err(invalid()),
        };

        Ok(Self {
            rank1: high,
            rank2: low,
            suited,
        })
    }
}

impl Serialize for HandClass {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HandClass {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Encode two ranks (r1 > r2) to triangular index.
fn encode_triangular(r1: u8, r2: u8) -> u8 {
    debug_assert!(r1 > r2);
    r1 * (r1 - 1) / 2 + r2
}

/// Decode triangular index to two ranks (r1 > r2).
fn decode_triangular(idx: u8) -> (u8, u8) {
    let mut r1 = 1u8;
    let mut remaining = idx;

    while remaining >= r1 {
        remaining -= r1;
        r1 += 1;
    }

    (r1, remaining)
}

/// Iterator over all 169 hand classes.
pub struct HandClassIter {
    index: u8,
}

impl HandClassIter {
    /// Start at index 0 (22).
    pub fn new() -> Self {
        Self { index: 0 }
    }
}

impl Iterator for HandClassIter {
    type Item = HandClass;

    fn next(&mut self) -> Option<Self::Item> {
        if (self.index as usize) < NUM_HAND_CLASSES {
            let hc = HandClass::from_index(self.index);
            self.index += 1;
            Some(hc)
        } else {
            None
        }
    }
}

impl Default for HandClassIter {
    fn default() -> Self {
        Self::new()
    }
}
