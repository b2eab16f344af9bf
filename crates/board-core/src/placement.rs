//! Piece-placement notation (the first field of a FEN string).
//!
//! Eight rows separated by `/`, top row first. Digits stand for runs of
//! empty squares; every other character is a piece as defined by the game's
//! [`BoardPiece::from_char`]. Chess FEN and the checkers position strings
//! both build on this.

use crate::{Board, BoardPiece, Square};
use thiserror::Error;

/// Errors that can occur when parsing a placement string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlacementError {
    #[error("expected 8 rows, got {0}")]
    RowCount(usize),

    #[error("invalid character '{ch}' in row {row}")]
    InvalidCharacter { ch: char, row: usize },

    #[error("row {row} has {squares} squares, expected 8")]
    RowLength { row: usize, squares: u32 },
}

/// Parses a placement string into a board.
pub fn parse_placement<P: BoardPiece>(placement: &str) -> Result<Board<P>, PlacementError> {
    let rows: Vec<&str> = placement.split('/').collect();
    if rows.len() != 8 {
        return Err(PlacementError::RowCount(rows.len()));
    }

    let mut board = Board::empty();
    for (row, text) in rows.iter().enumerate() {
        let mut col = 0u32;
        for ch in text.chars() {
            if let Some(run) = ch.to_digit(10) {
                col += run;
            } else if let Some(piece) = P::from_char(ch) {
                if let Some(sq) = Square::new(row as u8, col as u8) {
                    board.place(sq, piece);
                }
                col += 1;
            } else {
                return Err(PlacementError::InvalidCharacter { ch, row });
            }
        }
        if col != 8 {
            return Err(PlacementError::RowLength { row, squares: col });
        }
    }

    Ok(board)
}

/// Formats a board as a placement string.
pub fn to_placement<P: BoardPiece>(board: &Board<P>) -> String {
    let mut out = String::new();
    for row in 0..8u8 {
        let mut empty_run = 0;
        for col in 0..8u8 {
            match board.piece_at(Square::at(row, col)) {
                Some(piece) => {
                    if empty_run > 0 {
                        out.push_str(&empty_run.to_string());
                        empty_run = 0;
                    }
                    out.push(piece.to_char());
                }
                None => empty_run += 1,
            }
        }
        if empty_run > 0 {
            out.push_str(&empty_run.to_string());
        }
        if row < 7 {
            out.push('/');
        }
    }
    out
}
