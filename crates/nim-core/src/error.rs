//! Error types for the core game logic.
//!
//! An invalid move is an expected event: the engine answers it by
//! prompting the same player again, so this type never leaves the
//! engine as a failure of the session.

use thiserror::Error;

/// Reasons a move request is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidMove {
    /// The pile index does not exist in the current position.
    #[error("no pile {pile} (position has {count} piles)")]
    NoSuchPile { pile: u8, count: usize },

    /// A move has to take at least one stick.
    #[error("move takes no sticks")]
    EmptyRange,

    /// `start + amount` runs past the end of the pile.
    #[error("range {start}+{amount} exceeds pile {pile} of size {size}")]
    OutOfRange {
        pile: u8,
        start: u8,
        amount: u8,
        size: u8,
    },

    /// Splitting would create more piles than the wire format can carry.
    #[error("split would exceed the pile limit")]
    TooManyPiles,
}
