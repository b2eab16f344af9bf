//! Chess position representation.

use super::fen::{FenError, STARTPOS};
use super::piece::{ChessKind, ChessPiece};
use crate::rules::GamePosition;
use board_core::{Board, Side, Square};

/// Castling rights flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const WHITE_KINGSIDE: u8 = 0b0001;
    pub const WHITE_QUEENSIDE: u8 = 0b0010;
    pub const BLACK_KINGSIDE: u8 = 0b0100;
    pub const BLACK_QUEENSIDE: u8 = 0b1000;
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    /// Creates new castling rights from flags.
    #[inline]
    pub const fn new(flags: u8) -> Self {
        CastlingRights(flags & 0b1111)
    }

    const fn kingside_flag(side: Side) -> u8 {
        match side {
            Side::White => Self::WHITE_KINGSIDE,
            Side::Black => Self::BLACK_KINGSIDE,
        }
    }

    const fn queenside_flag(side: Side) -> u8 {
        match side {
            Side::White => Self::WHITE_QUEENSIDE,
            Side::Black => Self::BLACK_QUEENSIDE,
        }
    }

    /// Returns true if the given side can castle kingside.
    #[inline]
    pub const fn can_castle_kingside(self, side: Side) -> bool {
        self.0 & Self::kingside_flag(side) != 0
    }

    /// Returns true if the given side can castle queenside.
    #[inline]
    pub const fn can_castle_queenside(self, side: Side) -> bool {
        self.0 & Self::queenside_flag(side) != 0
    }

    /// Removes both castling rights for a side.
    #[inline]
    pub fn remove_side(&mut self, side: Side) {
        self.0 &= !(Self::kingside_flag(side) | Self::queenside_flag(side));
    }

    /// Removes the right tied to a rook home square, if `sq` is one.
    ///
    /// Called for the origin of every move and for every captured square, so
    /// a rook that moves or is taken loses its side's right on that wing.
    pub fn remove_for_square(&mut self, sq: Square) {
        for side in Side::BOTH {
            let home = side.home_row();
            if sq == Square::at(home, 7) {
                self.0 &= !Self::kingside_flag(side);
            } else if sq == Square::at(home, 0) {
                self.0 &= !Self::queenside_flag(side);
            }
        }
    }

    /// Returns the raw flags.
    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

/// Complete chess position state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChessPosition {
    /// Piece placement.
    pub board: Board<ChessPiece>,

    /// The side to move.
    pub side_to_move: Side,

    /// Castling rights.
    pub castling: CastlingRights,

    /// En passant target square (the square the double-stepping pawn skipped).
    pub en_passant: Option<Square>,

    /// King squares, indexed by [`Side::index`].
    pub kings: [Option<Square>; 2],

    /// Halfmove clock, reset by pawn moves and captures.
    pub halfmove_clock: u32,

    /// Fullmove number (starts at 1, increments after Black's move).
    pub fullmove_number: u32,
}

impl ChessPosition {
    /// Creates a position from a board, locating the kings.
    ///
    /// Castling rights start empty and the clocks at their initial values.
    pub fn from_board(board: Board<ChessPiece>, side_to_move: Side) -> Self {
        let kings = Side::BOTH.map(|side| {
            board
                .pieces()
                .find(|(_, p)| p.kind == ChessKind::King && p.side == side)
                .map(|(sq, _)| sq)
        });
        ChessPosition {
            board,
            side_to_move,
            castling: CastlingRights::NONE,
            en_passant: None,
            kings,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Creates the standard starting position.
    pub fn startpos() -> Self {
        Self::from_fen(STARTPOS).expect("STARTPOS is valid")
    }

    /// Returns the piece on a square.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<ChessPiece> {
        self.board.piece_at(sq)
    }

    /// Returns the king square of a side.
    #[inline]
    pub fn king_square(&self, side: Side) -> Option<Square> {
        self.kings[side.index()]
    }

    /// Validates that each side has exactly one king.
    pub(crate) fn check_kings(&self) -> Result<(), FenError> {
        for side in Side::BOTH {
            let count = self
                .board
                .pieces()
                .filter(|(_, p)| p.kind == ChessKind::King && p.side == side)
                .count();
            if count != 1 {
                return Err(FenError::KingCount { side, count });
            }
        }
        Ok(())
    }
}

impl Default for ChessPosition {
    fn default() -> Self {
        Self::startpos()
    }
}

impl GamePosition for ChessPosition {
    type Piece = ChessPiece;

    fn board(&self) -> &Board<ChessPiece> {
        &self.board
    }

    fn side_to_move(&self) -> Side {
        self.side_to_move
    }
}
