//! Pile set and move arithmetic.
//!
//! A Nim position is an ordered list of piles, each represented purely by
//! its stick count. A move removes a contiguous run of sticks from one
//! pile, which can only produce three shapes:
//! - the whole pile disappears,
//! - the pile shrinks from one of its edges,
//! - the pile is split into two piles around the removed run.
//!
//! Pile sizes are `u8` because the wire format carries them as single
//! bytes; the number of piles is capped at [`MAX_PILES`] for the same
//! reason.

use std::fmt;

use crate::error::InvalidMove;

/// Maximum number of piles a position may hold (the wire count is one byte).
pub const MAX_PILES: usize = u8::MAX as usize;

/// A request to remove `amount` sticks from pile `pile`, starting at
/// stick offset `start` within that pile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    /// Zero-based pile index.
    pub pile: u8,

    /// Offset of the first removed stick inside the pile.
    pub start: u8,

    /// Number of consecutive sticks to remove.
    pub amount: u8,
}

impl Move {
    pub fn new(pile: u8, start: u8, amount: u8) -> Self {
        Move { pile, start, amount }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pile {} start {} amount {}", self.pile, self.start, self.amount)
    }
}

/// Shape of an accepted move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The requested range covered the whole pile; pile count shrank by one.
    RemovedPile,

    /// The range touched an edge of the pile; the pile got smaller.
    Shrunk,

    /// The range was strictly interior; the pile became two piles.
    Split,
}

/// Ordered set of piles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PileSet {
    piles: Vec<u8>,
}

impl PileSet {
    /// Create a pile set from pile sizes, in order.
    pub fn new(piles: impl Into<Vec<u8>>) -> Self {
        PileSet { piles: piles.into() }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.piles
    }

    pub fn len(&self) -> usize {
        self.piles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.piles.is_empty()
    }

    /// Size of pile `index`, if it exists.
    pub fn get(&self, index: usize) -> Option<u8> {
        self.piles.get(index).copied()
    }

    /// Validate and apply a move.
    ///
    /// On error the pile set is left untouched; a move is never applied
    /// partially.
    pub fn apply(&mut self, mv: Move) -> Result<MoveOutcome, InvalidMove> {
        let index = usize::from(mv.pile);
        let size = self.get(index).ok_or(InvalidMove::NoSuchPile {
            pile: mv.pile,
            count: self.piles.len(),
        })?;

        if mv.amount == 0 {
            return Err(InvalidMove::EmptyRange);
        }

        // u16 so start + amount cannot wrap.
        let end = u16::from(mv.start) + u16::from(mv.amount);
        if end > u16::from(size) {
            return Err(InvalidMove::OutOfRange {
                pile: mv.pile,
                start: mv.start,
                amount: mv.amount,
                size,
            });
        }

        let whole = end == u16::from(size);

        if mv.start == 0 && whole {
            self.piles.remove(index);
            return Ok(MoveOutcome::RemovedPile);
        }

        if mv.start == 0 || whole {
            self.piles[index] = size - mv.amount;
            return Ok(MoveOutcome::Shrunk);
        }

        if self.piles.len() >= MAX_PILES {
            return Err(InvalidMove::TooManyPiles);
        }

        let tail = size - mv.start - mv.amount;
        self.piles[index] = mv.start;
        self.piles.insert(index + 1, tail);
        Ok(MoveOutcome::Split)
    }
}

impl From<Vec<u8>> for PileSet {
    fn from(piles: Vec<u8>) -> Self {
        PileSet { piles }
    }
}

impl fmt::Display for PileSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, pile) in self.piles.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", pile)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_whole_pile_removes_it() {
        let mut piles = PileSet::new(vec![3, 4, 5]);
        assert_eq!(piles.apply(Move::new(0, 0, 3)), Ok(MoveOutcome::RemovedPile));
        assert_eq!(piles.as_slice(), &[4, 5]);
    }

    #[test]
    fn interior_range_splits_in_place() {
        let mut piles = PileSet::new(vec![4, 5]);
        assert_eq!(piles.apply(Move::new(0, 1, 2)), Ok(MoveOutcome::Split));
        assert_eq!(piles.as_slice(), &[1, 1, 5]);
    }

    #[test]
    fn left_edge_shrinks() {
        let mut piles = PileSet::new(vec![4, 5]);
        assert_eq!(piles.apply(Move::new(1, 0, 2)), Ok(MoveOutcome::Shrunk));
        assert_eq!(piles.as_slice(), &[4, 3]);
    }

    #[test]
    fn range_past_end_is_rejected_untouched() {
        let mut piles = PileSet::new(vec![3, 4, 5]);
        let err = piles.apply(Move::new(1, 2, 5)).unwrap_err();
        assert_eq!(
            err,
            InvalidMove::OutOfRange {
                pile: 1,
                start: 2,
                amount: 5,
                size: 4
            }
        );
        assert_eq!(piles.as_slice(), &[3, 4, 5]);
    }

    #[test]
    fn missing_pile_and_empty_range_are_rejected() {
        let mut piles = PileSet::new(vec![3]);
        assert!(matches!(
            piles.apply(Move::new(1, 0, 1)),
            Err(InvalidMove::NoSuchPile { pile: 1, count: 1 })
        ));
        assert_eq!(piles.apply(Move::new(0, 1, 0)), Err(InvalidMove::EmptyRange));
    }

    #[test]
    fn start_plus_amount_does_not_wrap() {
        let mut piles = PileSet::new(vec![255]);
        assert!(matches!(
            piles.apply(Move::new(0, 200, 100)),
            Err(InvalidMove::OutOfRange { .. })
        ));
    }

    #[test]
    fn split_refused_at_pile_cap() {
        let mut piles = PileSet::new(vec![3; MAX_PILES]);
        assert_eq!(piles.apply(Move::new(0, 1, 1)), Err(InvalidMove::TooManyPiles));
        assert_eq!(piles.len(), MAX_PILES);

        // Non-splitting moves are still fine at the cap.
        assert_eq!(piles.apply(Move::new(0, 0, 1)), Ok(MoveOutcome::Shrunk));
    }

    #[test]
    fn display_is_space_separated() {
        assert_eq!(PileSet::new(vec![1, 1, 5]).to_string(), "1 1 5");
        assert_eq!(PileSet::default().to_string(), "");
    }
}
