//! Card representation for Hold'em equity.
//!
//! This module provides the fundamental value types used by the engine:
//! - `Card`: A single playing card with rank and suit
//! - `HoleCards`: A player's two private cards
//! - `Board`: Community cards (0, 3, 4 or 5 cards)
//! - `Street`: The betting round implied by the board length

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CardLocation, EquityError, Result};

// Ranks (0-12: 2-A).
/// Deuce.
pub const RANK_2: u8 = 0;
/// Three.
pub const RANK_3: u8 = 1;
/// Four.
pub const RANK_4: u8 = 2;
/// Five.
pub const RANK_5: u8 = 3;
/// Six.
pub const RANK_6: u8 = 4;
/// Seven.
pub const RANK_7: u8 = 5;
/// Eight.
pub const RANK_8: u8 = 6;
/// Nine.
pub const RANK_9: u8 = 7;
/// Ten.
pub const RANK_T: u8 = 8;
/// Jack.
pub const RANK_J: u8 = 9;
/// Queen.
pub const RANK_Q: u8 = 10;
/// King.
pub const RANK_K: u8 = 11;
/// Ace.
pub const RANK_A: u8 = 12;

// Suits (0-3).
/// Clubs.
pub const SUIT_CLUBS: u8 = 0;
/// Diamonds.
pub const SUIT_DIAMONDS: u8 = 1;
/// Hearts.
pub const SUIT_HEARTS: u8 = 2;
/// Spades.
pub const SUIT_SPADES: u8 = 3;

/// Rank characters for display.
pub(crate) const RANK_CHARS: [char; 13] =
    ['2', '3', '4', '5', '6', '7', '8', '9', 'T', 'J', 'Q', 'K', 'A'];

/// Suit characters for display.
const SUIT_CHARS: [char; 4] = ['c', 'd', 'h', 's'];

/// Suit symbols for pretty display.
const SUIT_SYMBOLS: [char; 4] = ['♣', '♦', '♥', '♠'];

/// Number of distinct cards.
pub const NUM_CARDS: usize = 52;

/// A single playing card.
///
/// Ordering is by rank, then suit, which is exactly the order of the id.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Card {
    /// Card index 0-51: rank * 4 + suit
    id: u8,
}

impl Card {
    /// Create a new card from rank (0-12) and suit (0-3).
    #[inline]
    pub fn new(rank: u8, suit: u8) -> Self {
        debug_assert!(rank < 13, "rank must be 0-12");
        debug_assert!(suit < 4, "suit must be 0-3");
        Self { id: rank * 4 + suit }
    }

    /// Create a card from its ID (0-51).
    #[inline]
    pub fn from_id(id: u8) -> Self {
        debug_assert!(id < 52, "card id must be 0-51");
        Self { id }
    }

    /// Get the card's ID (0-51).
    #[inline]
    pub fn id(&self) -> u8 {
        self.id
    }

    /// Single-bit mask of this card within a 52-bit set.
    #[inline]
    pub fn mask(&self) -> u64 {
        1u64 << self.id
    }

    /// Get the card's rank (0-12: 2-A).
    #[inline]
    pub fn rank(&self) -> u8 {
        self.id / 4
    }

    /// Get the card's suit (0-3).
    #[inline]
    pub fn suit(&self) -> u8 {
        self.id % 4
    }

    /// Get rank character for display.
    pub fn rank_char(&self) -> char {
        RANK_CHARS[self.rank() as usize]
    }

    /// Get suit character for display.
    pub fn suit_char(&self) -> char {
        SUIT_CHARS[self.suit() as usize]
    }

    /// Display with a suit symbol, e.g. "A♠".
    pub fn pretty(&self) -> String {
        format!("{}{}", self.rank_char(), SUIT_SYMBOLS[self.suit() as usize])
    }

    /// Iterate over all 52 cards in id order.
    pub fn all() -> impl Iterator<Item = Card> {
        (0..NUM_CARDS as u8).map(Card::from_id)
    }
}

/// Parse a rank character (case-insensitive).
pub(crate) fn parse_rank(c: char) -> Option<u8> {
    RANK_CHARS
        .iter()
        .position(|&r| r == c.to_ascii_uppercase())
        .map(|r| r as u8)
}

impl FromStr for Card {
    type Err = EquityError;

    /// Parse a card from a code like "As", "kh", "TD" or "10c".
    fn from_str(s: &str) -> Result<Self> {
        let token = s.trim();
        let parse_error = |reason| EquityError::Parse {
            token: token.to_string(),
            reason,
        };

        let chars: Vec<char> = match token.strip_prefix("10") {
            Some(rest) => std::iter::once('T').chain(rest.chars()).collect(),
            None => token.chars().collect(),
        };
        if chars.len() != 2 {
            return Err(parse_error("expected rank character followed by suit character"));
        }

        let rank = parse_rank(chars[0]).ok_or_else(|| parse_error("invalid rank"))?;
        let suit = SUIT_CHARS
            .iter()
            .position(|&c| c == chars[1].to_ascii_lowercase())
            .ok_or_else(|| parse_error("invalid suit"))?;

        Ok(Self::new(rank, suit as u8))
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank_char(), self.suit_char())
    }
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl Serialize for Card {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Parse whitespace-separated card codes ("As Kh"). Adjacent codes without
/// separators ("AsKh") are also accepted.
pub fn parse_cards(s: &str) -> Result<Vec<Card>> {
    let mut cards = Vec::new();
    for token in s.split_whitespace() {
        if token.chars().count() <= 3 {
            cards.push(token.parse()?);
            continue;
        }
        // Glued codes: split after every suit character.
        let mut start = 0;
        for (i, c) in token.char_indices() {
            if SUIT_CHARS.contains(&c.to_ascii_lowercase()) && i > start {
                cards.push(token[start..=i].parse()?);
                start = i + c.len_utf8();
            }
        }
        if start < token.len() {
            cards.push(token[start..].parse()?);
        }
    }
    Ok(cards)
}

/// Bitmask of a card slice, failing on the first repeated card.
pub fn card_mask(cards: &[Card], location: CardLocation) -> Result<u64> {
    let mut mask = 0u64;
    for &card in cards {
        if mask & card.mask() != 0 {
            return Err(EquityError::DuplicateCard { card, location });
        }
        mask |= card.mask();
    }
    Ok(mask)
}

/// A player's two hole cards.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HoleCards {
    /// First card (higher rank by convention).
    pub card1: Card,
    /// Second card.
    pub card2: Card,
}

impl HoleCards {
    /// Create hole cards, ordering by rank (higher first).
    pub fn new(card1: Card, card2: Card) -> Self {
        debug_assert!(card1 != card2, "hole cards must be distinct");
        if card1 >= card2 {
            Self { card1, card2 }
        } else {
            Self {
                card1: card2,
                card2: card1,
            }
        }
    }

    /// Build hole cards from a parsed card list, which must hold two distinct cards.
    pub fn from_cards(cards: &[Card]) -> Result<Self> {
        match *cards {
            [a, b] if a == b => Err(EquityError::DuplicateCard {
                card: a,
                location: CardLocation::Input,
            }),
            [a, b] => Ok(Self::new(a, b)),
            _ => Err(EquityError::HandSize(cards.len())),
        }
    }

    /// Check if hole cards are suited.
    pub fn is_suited(&self) -> bool {
        self.card1.suit() == self.card2.suit()
    }

    /// Get both cards as an array.
    pub fn cards(&self) -> [Card; 2] {
        [self.card1, self.card2]
    }

    /// Bitmask of both cards.
    pub fn mask(&self) -> u64 {
        self.card1.mask() | self.card2.mask()
    }

    /// Display with suit symbols, e.g. "A♠ K♥".
    pub fn pretty(&self) -> String {
        format!("{} {}", self.card1.pretty(), self.card2.pretty())
    }
}

impl FromStr for HoleCards {
    type Err = EquityError;

    /// Parse hole cards from a string like "AhKs" or "Ah Ks".
    fn from_str(s: &str) -> Result<Self> {
        Self::from_cards(&parse_cards(s)?)
    }
}

impl fmt::Display for HoleCards {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.card1, self.card2)
    }
}

impl fmt::Debug for HoleCards {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

/// Community cards on the board.
///
/// A `Board` always holds a valid street length and distinct cards.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Board {
    cards: Vec<Card>,
}

impl Board {
    /// Create an empty (preflop) board.
    pub fn new() -> Self {
        Self {
            cards: Vec::with_capacity(5),
        }
    }

    /// Create a board from cards, validating length and uniqueness.
    pub fn from_cards(cards: Vec<Card>) -> Result<Self> {
        Street::from_board_len(cards.len())?;
        card_mask(&cards, CardLocation::Board)?;
        Ok(Self { cards })
    }

    /// Get the number of cards on the board.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if board is empty.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Get the cards on the board.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Bitmask of the board cards.
    pub fn mask(&self) -> u64 {
        self.cards.iter().fold(0, |m, c| m | c.mask())
    }

    /// Whether `other` is this board with zero or more cards appended.
    pub fn is_prefix_of(&self, other: &Board) -> bool {
        other.cards.starts_with(&self.cards)
    }

    /// Get the current street based on board cards.
    pub fn street(&self) -> Street {
        // Length is validated on construction.
        Street::from_board_len(self.cards.len()).unwrap_or(Street::Preflop)
    }
}

impl FromStr for Board {
    type Err = EquityError;

    /// Parse a board from a string like "AhKsQd" or "Ah Ks Qd".
    fn from_str(s: &str) -> Result<Self> {
        Self::from_cards(parse_cards(s)?)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for card in &self.cards {
            write!(f, "{}", card)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self)
    }
}

/// Street in a poker hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Street {
    /// No community cards.
    Preflop,
    /// Three community cards.
    Flop,
    /// Four community cards.
    Turn,
    /// All five community cards.
    River,
}

impl Street {
    /// Resolve the street from a board length (0, 3, 4 or 5).
    pub fn from_board_len(len: usize) -> Result<Street> {
        match len {
            0 => Ok(Street::Preflop),
            3 => Ok(Street::Flop),
            4 => Ok(Street::Turn),
            5 => Ok(Street::River),
            n => Err(EquityError::InvalidBoardLength(n)),
        }
    }

    /// Lowercase label used at the request boundary.
    pub fn label(&self) -> &'static str {
        match self {
            Street::Preflop => "preflop",
            Street::Flop => "flop",
            Street::Turn => "turn",
            Street::River => "river",
        }
    }
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Street::Preflop => write!(f, "Preflop"),
            Street::Flop => write!(f, "Flop"),
            Street::Turn => write!(f, "Turn"),
            Street::River => write!(f, "River"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_creation() {
        let ace_spades = Card::new(RANK_A, SUIT_SPADES);
        assert_eq!(ace_spades.rank(), RANK_A);
        assert_eq!(ace_spades.suit(), SUIT_SPADES);
        assert_eq!(ace_spades.to_string(), "As");
        assert_eq!(ace_spades.pretty(), "A♠");

        let two_clubs = Card::new(RANK_2, SUIT_CLUBS);
        assert_eq!(two_clubs.rank(), RANK_2);
        assert_eq!(two_clubs.suit(), SUIT_CLUBS);
        assert_eq!(two_clubs.to_string(), "2c");
    }

    #[test]
    fn test_card_parsing() {
        assert_eq!("As".parse::<Card>().unwrap().to_string(), "As");
        assert_eq!("AS".parse::<Card>().unwrap().to_string(), "As");
        assert_eq!("kh".parse::<Card>().unwrap().to_string(), "Kh");
        assert_eq!("tD".parse::<Card>().unwrap().to_string(), "Td");
        assert_eq!("10c".parse::<Card>().unwrap().to_string(), "Tc");
        assert_eq!(" 2c ".parse::<Card>().unwrap().to_string(), "2c");
    }

    #[test]
    fn test_card_parse_errors() {
        for bad in ["A1", "XX", "A", "", "Asd", "1s", "Ax"] {
            let err = bad.parse::<Card>().unwrap_err();
            assert!(err.is_parse(), "{} should be a parse error, got {:?}", bad, err);
        }
    }

    #[test]
    fn test_all_52_codes_parse() {
        let mut seen = 0u64;
        for r in RANK_CHARS {
            for s in SUIT_CHARS {
                let card: Card = format!("{}{}", r, s).parse().unwrap();
                seen |= card.mask();
            }
        }
        assert_eq!(seen.count_ones(), 52);
        assert_eq!(Card::all().count(), 52);
    }

    #[test]
    fn test_card_ordering_rank_then_suit() {
        let two_spades: Card = "2s".parse().unwrap();
        let three_clubs: Card = "3c".parse().unwrap();
        let three_hearts: Card = "3h".parse().unwrap();
        assert!(two_spades < three_clubs);
        assert!(three_clubs < three_hearts);
    }

    #[test]
    fn test_parse_cards_list() {
        let cards = parse_cards("As Kh").unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].to_string(), "As");

        let glued = parse_cards("AsKh10d").unwrap();
        assert_eq!(glued.iter().map(|c| c.to_string()).collect::<Vec<_>>(), ["As", "Kh", "Td"]);

        assert!(parse_cards("   ").unwrap().is_empty());
        assert!(parse_cards("As K").is_err());
    }

    #[test]
    fn test_hole_cards() {
        let hc: HoleCards = "AhKs".parse().unwrap();
        assert_eq!(hc.card1.rank(), RANK_A);
        assert_eq!(hc.card2.rank(), RANK_K);
        assert!(!hc.is_suited());

        let hc_suited: HoleCards = "Ks As".parse().unwrap();
        assert!(hc_suited.is_suited());
        assert_eq!(hc_suited.card1.rank(), RANK_A);
    }

    #[test]
    fn test_hole_cards_errors() {
        assert!(matches!("As".parse::<HoleCards>(), Err(EquityError::HandSize(1))));
        assert!(matches!("As Kd Qh".parse::<HoleCards>(), Err(EquityError::HandSize(3))));
        assert!(matches!(
            "As As".parse::<HoleCards>(),
            Err(EquityError::DuplicateCard { .. })
        ));
    }

    #[test]
    fn test_board() {
        let board = Board::new();
        assert_eq!(board.len(), 0);
        assert_eq!(board.street(), Street::Preflop);

        let board: Board = "AhKsQd".parse().unwrap();
        assert_eq!(board.len(), 3);
        assert_eq!(board.street(), Street::Flop);

        let turn: Board = "Ah Ks Qd Jc".parse().unwrap();
        assert_eq!(turn.street(), Street::Turn);
        assert!(board.is_prefix_of(&turn));
        assert!(!turn.is_prefix_of(&board));

        let river: Board = "Ah Ks Qd Jc Tc".parse().unwrap();
        assert_eq!(river.street(), Street::River);
    }

    #[test]
    fn test_board_rejects_invalid_lengths() {
        for s in ["Ah", "Ah Ks", "Ah Ks Qd Jc Tc 9c"] {
            assert!(matches!(s.parse::<Board>(), Err(EquityError::InvalidBoardLength(_))));
        }
        assert!(matches!(
            "Ah Ks Ah".parse::<Board>(),
            Err(EquityError::DuplicateCard { location: CardLocation::Board, .. })
        ));
    }

    #[test]
    fn test_street_from_board_len() {
        assert_eq!(Street::from_board_len(0).unwrap(), Street::Preflop);
        assert_eq!(Street::from_board_len(3).unwrap(), Street::Flop);
        assert_eq!(Street::from_board_len(4).unwrap(), Street::Turn);
        assert_eq!(Street::from_board_len(5).unwrap(), Street::River);
        for len in [1, 2, 6] {
            assert!(matches!(
                Street::from_board_len(len),
                Err(EquityError::InvalidBoardLength(n)) if n == len
            ));
        }
        assert!(Street::Preflop < Street::River);
    }

    #[test]
    fn test_card_serde_roundtrip() {
        let card: Card = "Td".parse().unwrap();
        let json = serde_json::to_string(&card).unwrap();
        assert_eq!(json, "\"Td\"");
        let back: Card = serde_json::from_str(&json).unwrap();
        assert_eq!(back, card);
    }
}
