//! Cards, boards, decks and starting-hand classes.
//!
//! ## Modules
//!
//! - `card`: Card, hole cards, board and street representations
//! - `deck`: Residual deck with swap-removal sampling
//! - `hand_class`: The 169 canonical starting-hand classes

pub mod card;
pub mod deck;
pub mod hand_class;

// Re-export commonly used types
pub use card::{card_mask, parse_cards, Board, Card, HoleCards, Street};
pub use deck::{available_cards, Deck};
pub use hand_class::{ClassKind, HandClass, NUM_COMBOS, NUM_HAND_CLASSES};
