//! The 8x8 grid of optional pieces.

use crate::{BoardPiece, Side, Square};
use std::fmt;

/// An 8x8 grid where each cell holds at most one piece.
///
/// The board performs no rule validation: legality is the move generator's
/// job. Cells are a flat array of `Copy` values, so `clone()` is a plain
/// memory copy and is the snapshot/restore mechanism used by history and
/// search.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board<P> {
    cells: [Option<P>; 64],
}

impl<P: BoardPiece> Board<P> {
    /// Creates an empty board.
    pub const fn empty() -> Self {
        Board { cells: [None; 64] }
    }

    /// Returns the piece at the given square, if any.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<P> {
        self.cells[sq.index() as usize]
    }

    /// Puts a piece on the square, returning whatever was there before.
    #[inline]
    pub fn place(&mut self, sq: Square, piece: P) -> Option<P> {
        self.cells[sq.index() as usize].replace(piece)
    }

    /// Removes and returns the piece on the square.
    #[inline]
    pub fn remove(&mut self, sq: Square) -> Option<P> {
        self.cells[sq.index() as usize].take()
    }

    /// Returns true if no piece is on the square.
    #[inline]
    pub fn is_empty(&self, sq: Square) -> bool {
        self.cells[sq.index() as usize].is_none()
    }

    /// Returns true if the square holds a piece owned by `side`.
    #[inline]
    pub fn is_occupied_by(&self, sq: Square, side: Side) -> bool {
        matches!(self.piece_at(sq), Some(p) if p.owner() == side)
    }

    /// Returns every square holding a piece of the given side, in square order.
    pub fn squares_occupied_by(&self, side: Side) -> Vec<Square> {
        self.pieces()
            .filter(|(_, p)| p.owner() == side)
            .map(|(sq, _)| sq)
            .collect()
    }

    /// Iterates over occupied squares and their pieces, in square order.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, P)> + '_ {
        Square::all().filter_map(move |sq| self.piece_at(sq).map(|p| (sq, p)))
    }

    /// Counts the pieces owned by a side.
    pub fn count(&self, side: Side) -> usize {
        self.pieces().filter(|(_, p)| p.owner() == side).count()
    }

    /// Finds the first square holding exactly this piece.
    pub fn find(&self, piece: P) -> Option<Square> {
        self.pieces().find(|(_, p)| *p == piece).map(|(sq, _)| sq)
    }
}

impl<P: BoardPiece> Default for Board<P> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Renders the board as eight text rows, top row first, `.` for empty cells.
impl<P: BoardPiece> fmt::Display for Board<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..8u8 {
            write!(f, "{} ", 8 - row)?;
            for col in 0..8u8 {
                let c = self
                    .piece_at(Square::at(row, col))
                    .map_or('.', |p| p.to_char());
                write!(f, "{}", c)?;
                if col < 7 {
                    write!(f, " ")?;
                }
            }
            writeln!(f)?;
        }
        write!(f, "  a b c d e f g h")
    }
}

impl<P: BoardPiece> fmt::Debug for Board<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({})", crate::placement::to_placement(self))
    }
}
