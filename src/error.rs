//! Error types shared by every layer of the equity engine.
//!
//! Validation runs before any sampling starts, so a caller either gets a
//! complete result or exactly one of these errors.

use std::fmt;

use thiserror::Error;

use crate::cards::Card;

/// Where an offending card was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardLocation {
    /// Hole cards of the seat with this index (0-based).
    Seat(usize),
    /// Community cards.
    Board,
    /// Dead cards (folded hands or explicitly removed cards).
    Dead,
    /// A bare card list handed to the oracle or the deck model.
    Input,
}

impl fmt::Display for CardLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardLocation::Seat(seat) => write!(f, "seat {}", seat),
            CardLocation::Board => write!(f, "board"),
            CardLocation::Dead => write!(f, "dead cards"),
            CardLocation::Input => write!(f, "input"),
        }
    }
}

/// Errors produced by parsing, validation, sampling and table building.
#[derive(Debug, Error)]
pub enum EquityError {
    /// A card token is not one of the 52 valid rank/suit codes.
    #[error("cannot parse card '{token}': {reason}")]
    Parse {
        /// The offending token.
        token: String,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// A parse or size error raised while reading one seat's hand.
    #[error("seat {seat}: {source}")]
    InSeat {
        /// Seat whose input failed.
        seat: usize,
        /// The underlying error.
        #[source]
        source: Box<EquityError>,
    },

    /// A parse or length error raised while reading the board.
    #[error("board: {0}")]
    InBoard(#[source] Box<EquityError>),

    /// The same card appears twice across hands, board and dead cards.
    #[error("duplicate card {card} in {location}")]
    DuplicateCard {
        /// The repeated card.
        card: Card,
        /// Where the second copy was found.
        location: CardLocation,
    },

    /// Board length is not 0, 3, 4 or 5.
    #[error("invalid board length {0} (expected 0, 3, 4 or 5)")]
    InvalidBoardLength(usize),

    /// A new board is shorter than, or disagrees with, the current one.
    #[error("board {new} does not extend current board {current}")]
    BoardRegression {
        /// Board already dealt.
        current: String,
        /// Rejected replacement.
        new: String,
    },

    /// Folding would leave no active seat.
    #[error("cannot fold seat {seat}: it is the last active player")]
    LastPlayer {
        /// Seat that tried to fold.
        seat: usize,
    },

    /// Fold targets a seat that is already folded.
    #[error("seat {0} has already folded")]
    AlreadyFolded(usize),

    /// A seat index outside the table.
    #[error("seat {seat} does not exist (table has {seats} seats)")]
    InvalidSeat {
        /// Requested seat.
        seat: usize,
        /// Seats at the table.
        seats: usize,
    },

    /// Seat count outside the supported 2..=6.
    #[error("number of players must be between 2 and 6, got {0}")]
    InvalidPlayerCount(usize),

    /// The number of hands disagrees with the declared seat count.
    #[error("expected {expected} hands, got {got}")]
    SeatCountMismatch {
        /// Declared seat count.
        expected: usize,
        /// Hands actually supplied.
        got: usize,
    },

    /// A hand that does not hold exactly two cards.
    #[error("a hand needs exactly 2 cards, got {0}")]
    HandSize(usize),

    /// The oracle was asked to rank fewer than 5 or more than 7 cards.
    #[error("hand ranking needs 5 to 7 cards, got {0}")]
    InsufficientOracleInput(usize),

    /// A starting-hand class label such as "AKs" could not be parsed.
    #[error("invalid hand class '{0}'")]
    InvalidHandClass(String),

    /// The residual deck ran out while dealing a trial.
    #[error("deck exhausted: needed {needed} cards, {available} available")]
    DeckExhausted {
        /// Cards one trial must deal.
        needed: usize,
        /// Cards left in the residual deck.
        available: usize,
    },

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Reading or writing a file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EquityError {
    /// Attach a seat index to an error raised while reading that seat's input.
    pub fn in_seat(self, seat: usize) -> Self {
        match self {
            // Already carries its own location.
            EquityError::DuplicateCard { .. } | EquityError::InSeat { .. } => self,
            other => EquityError::InSeat {
                seat,
                source: Box::new(other),
            },
        }
    }

    /// Mark an error as raised while reading the board.
    pub fn in_board(self) -> Self {
        match self {
            EquityError::DuplicateCard { .. } | EquityError::InBoard(_) => self,
            other => EquityError::InBoard(Box::new(other)),
        }
    }

    /// The seat this error points at, if any.
    pub fn seat(&self) -> Option<usize> {
        match self {
            EquityError::InSeat { seat, .. } => Some(*seat),
            EquityError::DuplicateCard {
                location: CardLocation::Seat(seat),
                ..
            } => Some(*seat),
            EquityError::LastPlayer { seat } => Some(*seat),
            EquityError::AlreadyFolded(seat) => Some(*seat),
            EquityError::InvalidSeat { seat, .. } => Some(*seat),
            _ => None,
        }
    }

    /// Whether this is (or wraps) a card parse failure.
    pub fn is_parse(&self) -> bool {
        match self {
            EquityError::Parse { .. } => true,
            EquityError::InSeat { source, .. } => source.is_parse(),
            EquityError::InBoard(source) => source.is_parse(),
            _ => false,
        }
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, EquityError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_seat_wraps_parse_errors() {
        let err = EquityError::Parse {
            token: "XX".to_string(),
            reason: "invalid rank",
        }
        .in_seat(2);
        assert_eq!(err.seat(), Some(2));
        assert!(err.is_parse());
        assert!(err.to_string().starts_with("seat 2:"));
    }

    #[test]
    fn test_in_seat_keeps_duplicate_location() {
        let card: Card = "As".parse().unwrap();
        let err = EquityError::DuplicateCard {
            card,
            location: CardLocation::Board,
        }
        .in_seat(1);
        assert!(matches!(err, EquityError::DuplicateCard { location: CardLocation::Board, .. }));
        assert_eq!(err.seat(), None);
    }

    #[test]
    fn test_in_board_wraps_parse_errors() {
        let err = EquityError::InvalidBoardLength(2).in_board();
        assert!(err.to_string().starts_with("board:"));
        assert!(!err.is_parse());

        let err = EquityError::Parse {
            token: "Zz".to_string(),
            reason: "invalid rank",
        }
        .in_board();
        assert!(err.is_parse());
        assert_eq!(err.seat(), None);
    }
}
