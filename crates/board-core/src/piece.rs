//! Piece abstractions shared by every game.

use crate::Side;
use std::fmt;
use std::hash::Hash;

/// The kind of a piece, independent of its owner (pawn, man, king, ...).
pub trait PieceKind: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static {
    /// Lowercase letter used in move notation (e.g. the `q` in `e7e8q`).
    fn symbol(self) -> char;
}

/// A piece that can sit on a [`Board`](crate::Board) cell.
///
/// Pieces are small `Copy` values so that boards can be snapshotted with a
/// flat copy.
pub trait BoardPiece: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static {
    /// The kind type of this game's pieces.
    type Kind: PieceKind;

    /// Returns the kind of this piece.
    fn kind(&self) -> Self::Kind;

    /// Returns the side that owns this piece.
    fn owner(&self) -> Side;

    /// Returns the placement character for this piece.
    fn to_char(&self) -> char;

    /// Parses a placement character.
    fn from_char(c: char) -> Option<Self>;
}
