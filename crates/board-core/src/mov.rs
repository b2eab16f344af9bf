//! Move representation.

use crate::{PieceKind, Square};
use std::fmt;

/// Flags for special move types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveFlag {
    /// Normal move or capture (no special action).
    Normal,
    /// Pawn double push from its starting row.
    DoublePush,
    /// Kingside castling (O-O).
    CastleKingside,
    /// Queenside castling (O-O-O).
    CastleQueenside,
    /// En passant capture.
    EnPassant,
    /// Pawn promotion; the chosen kind is in [`Move::promotion`].
    Promotion,
}

impl MoveFlag {
    /// Returns true if this is a castling move.
    #[inline]
    pub const fn is_castling(self) -> bool {
        matches!(self, MoveFlag::CastleKingside | MoveFlag::CastleQueenside)
    }
}

/// A move from one square to another.
///
/// Produced by a game's move generator and consumed by its executor. The
/// executor trusts the move, so hand-built moves must match what the
/// generator would produce for the position.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Move<K> {
    pub from: Square,
    pub to: Square,
    /// Squares whose pieces are removed by this move.
    pub captures: Vec<Square>,
    pub flag: MoveFlag,
    pub promotion: Option<K>,
}

impl<K: PieceKind> Move<K> {
    /// Creates a quiet move with the given flag.
    #[inline]
    pub fn new(from: Square, to: Square, flag: MoveFlag) -> Self {
        Move {
            from,
            to,
            captures: Vec::new(),
            flag,
            promotion: None,
        }
    }

    /// Creates a normal, non-capturing move.
    #[inline]
    pub fn normal(from: Square, to: Square) -> Self {
        Self::new(from, to, MoveFlag::Normal)
    }

    /// Creates a move that removes the piece on `captured`.
    #[inline]
    pub fn capture(from: Square, to: Square, captured: Square) -> Self {
        Move {
            captures: vec![captured],
            ..Self::normal(from, to)
        }
    }

    /// Creates a promotion move to the given kind.
    #[inline]
    pub fn promotion(from: Square, to: Square, kind: K) -> Self {
        Move {
            promotion: Some(kind),
            ..Self::new(from, to, MoveFlag::Promotion)
        }
    }

    /// Adds a captured square to this move.
    pub fn with_capture(mut self, captured: Square) -> Self {
        self.captures.push(captured);
        self
    }

    /// Returns true if the move removes at least one piece.
    #[inline]
    pub fn is_capture(&self) -> bool {
        !self.captures.is_empty()
    }

    /// Returns true if the move goes from `from` to `to`.
    #[inline]
    pub fn connects(&self, from: Square, to: Square) -> bool {
        self.from == from && self.to == to
    }

    /// Returns the notation for this move (`e2e4`, `e7e8q`, `c3xe5`).
    pub fn notation(&self) -> String {
        let sep = if self.is_capture() && self.flag != MoveFlag::EnPassant {
            "x"
        } else {
            ""
        };
        let promo = self
            .promotion
            .map(|k| k.symbol().to_string())
            .unwrap_or_default();
        format!("{}{}{}{}", self.from, sep, self.to, promo)
    }
}

impl<K: PieceKind> fmt::Debug for Move<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({})", self.notation())
    }
}

impl<K: PieceKind> fmt::Display for Move<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.notation())
    }
}

/// An ordered list of moves, kept in generation order.
#[derive(Clone, PartialEq, Eq)]
pub struct MoveList<K> {
    moves: Vec<Move<K>>,
}

impl<K: PieceKind> MoveList<K> {
    /// Creates an empty move list.
    #[inline]
    pub const fn new() -> Self {
        MoveList { moves: Vec::new() }
    }

    /// Adds a move to the list.
    #[inline]
    pub fn push(&mut self, m: Move<K>) {
        self.moves.push(m);
    }

    /// Returns the number of moves.
    #[inline]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// Returns true if the list is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Returns a slice of the moves.
    #[inline]
    pub fn as_slice(&self) -> &[Move<K>] {
        &self.moves
    }

    /// Iterates over the moves in generation order.
    pub fn iter(&self) -> std::slice::Iter<'_, Move<K>> {
        self.moves.iter()
    }

    /// Clears the move list.
    #[inline]
    pub fn clear(&mut self) {
        self.moves.clear();
    }

    /// Retains only moves for which the predicate returns true.
    pub fn retain<F>(&mut self, f: F)
    where
        F: FnMut(&Move<K>) -> bool,
    {
        self.moves.retain(f);
    }

    /// Returns true if any move captures.
    pub fn has_capture(&self) -> bool {
        self.moves.iter().any(Move::is_capture)
    }

    /// Returns the first move from `from` to `to`, if any.
    pub fn find(&self, from: Square, to: Square) -> Option<&Move<K>> {
        self.moves.iter().find(|m| m.connects(from, to))
    }

    /// Returns the distinct destination squares, in generation order.
    pub fn destinations(&self) -> Vec<Square> {
        let mut out: Vec<Square> = Vec::with_capacity(self.moves.len());
        for m in &self.moves {
            if !out.contains(&m.to) {
                out.push(m.to);
            }
        }
        out
    }

    /// Consumes the list and returns the underlying vector.
    pub fn into_vec(self) -> Vec<Move<K>> {
        self.moves
    }
}

impl<K: PieceKind> Default for MoveList<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> std::ops::Index<usize> for MoveList<K> {
    type Output = Move<K>;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.moves[index]
    }
}

impl<'a, K> IntoIterator for &'a MoveList<K> {
    type Item = &'a Move<K>;
    type IntoIter = std::slice::Iter<'a, Move<K>>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.iter()
    }
}

impl<K> IntoIterator for MoveList<K> {
    type Item = Move<K>;
    type IntoIter = std::vec::IntoIter<Move<K>>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.into_iter()
    }
}

impl<K> FromIterator<Move<K>> for MoveList<K> {
    fn from_iter<I: IntoIterator<Item = Move<K>>>(iter: I) -> Self {
        MoveList {
            moves: iter.into_iter().collect(),
        }
    }
}

impl<K: PieceKind> fmt::Debug for MoveList<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}
