//! Record of played moves. Moves can only be appended and removed from the
//! end, so the most recent move is always the one taken back first.

use crate::chess::core::Move;

/// Played moves, oldest first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct History {
    moves: Vec<Move>,
}

impl History {
    pub(super) fn push(&mut self, played: Move) {
        self.moves.push(played);
    }

    pub(super) fn pop(&mut self) -> Option<Move> {
        self.moves.pop()
    }

    /// Most recently played move.
    #[must_use]
    pub fn last(&self) -> Option<&Move> {
        self.moves.last()
    }

    /// Number of played moves.
    #[must_use]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// True before the first move.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Moves in the order they were played.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Move> + '_ {
        self.moves.iter()
    }
}
