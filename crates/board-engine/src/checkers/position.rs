//! Checkers position and its text notation.

use super::piece::CheckersPiece;
use crate::rules::GamePosition;
use board_core::{parse_placement, to_placement, Board, PlacementError, Side, Square};
use thiserror::Error;

/// The starting position: black men on the dark squares of rows 0-2, red men
/// on rows 5-7, red to move.
pub const START: &str = "1b1b1b1b/b1b1b1b1/1b1b1b1b/8/8/r1r1r1r1/1r1r1r1r/r1r1r1r1 r";

/// Errors that can occur when parsing checkers notation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NotationError {
    #[error("expected 2 or 3 fields, got {0}")]
    InvalidPartCount(usize),

    #[error("invalid piece placement: {0}")]
    InvalidPiecePlacement(#[from] PlacementError),

    #[error("piece on light square {0}")]
    LightSquare(Square),

    #[error("invalid side to move: expected 'r' or 'b', got '{0}'")]
    InvalidSide(String),

    #[error("invalid continuation square: {0}")]
    InvalidContinuation(String),
}

/// A checkers position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CheckersPosition {
    /// Piece placement; only dark squares are ever occupied.
    pub board: Board<CheckersPiece>,

    /// The side to move.
    pub side_to_move: Side,

    /// Square of the piece that must keep capturing, if a multi-capture is
    /// in progress.
    pub continuation: Option<Square>,
}

impl CheckersPosition {
    /// Creates the standard starting position.
    pub fn startpos() -> Self {
        Self::from_notation(START).expect("START is valid")
    }

    /// Parses `<placement> <r|b> [<continuation square>]`.
    pub fn from_notation(text: &str) -> Result<Self, NotationError> {
        let parts: Vec<&str> = text.split_whitespace().collect();
        if parts.len() != 2 && parts.len() != 3 {
            return Err(NotationError::InvalidPartCount(parts.len()));
        }

        let board: Board<CheckersPiece> = parse_placement(parts[0])?;
        if let Some((sq, _)) = board.pieces().find(|(sq, _)| !sq.is_dark()) {
            return Err(NotationError::LightSquare(sq));
        }

        let side_to_move = match parts[1] {
            "r" => Side::White,
            "b" => Side::Black,
            other => return Err(NotationError::InvalidSide(other.to_string())),
        };

        let continuation = match parts.get(2) {
            None => None,
            Some(field) => match Square::from_algebraic(field) {
                Some(sq) if board.is_occupied_by(sq, side_to_move) => Some(sq),
                _ => return Err(NotationError::InvalidContinuation(field.to_string())),
            },
        };

        Ok(CheckersPosition {
            board,
            side_to_move,
            continuation,
        })
    }

    /// Formats the position in the notation accepted by
    /// [`from_notation`](Self::from_notation).
    pub fn to_notation(&self) -> String {
        let side = match self.side_to_move {
            Side::White => 'r',
            Side::Black => 'b',
        };
        match self.continuation {
            Some(sq) => format!("{} {} {}", to_placement(&self.board), side, sq),
            None => format!("{} {}", to_placement(&self.board), side),
        }
    }

    /// Returns the piece on a square.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<CheckersPiece> {
        self.board.piece_at(sq)
    }
}

impl Default for CheckersPosition {
    fn default() -> Self {
        Self::startpos()
    }
}

impl GamePosition for CheckersPosition {
    type Piece = CheckersPiece;

    fn board(&self) -> &Board<CheckersPiece> {
        &self.board
    }

    fn side_to_move(&self) -> Side {
        self.side_to_move
    }
}
