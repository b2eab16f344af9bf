//! FEN (Forsyth-Edwards Notation) parsing and serialization.

use super::piece::ChessPiece;
use super::position::{CastlingRights, ChessPosition};
use board_core::{parse_placement, to_placement, Board, PlacementError, Side, Square};
use thiserror::Error;

/// The standard starting position FEN.
pub const STARTPOS: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Errors that can occur when parsing FEN strings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid FEN: expected 4 or 6 fields, got {0}")]
    InvalidPartCount(usize),

    #[error("invalid piece placement: {0}")]
    InvalidPiecePlacement(#[from] PlacementError),

    #[error("invalid active color: expected 'w' or 'b', got '{0}'")]
    InvalidActiveColor(String),

    #[error("invalid castling rights: {0}")]
    InvalidCastlingRights(String),

    #[error("invalid en passant square: {0}")]
    InvalidEnPassantSquare(String),

    #[error("invalid halfmove clock: {0}")]
    InvalidHalfmoveClock(String),

    #[error("invalid fullmove number: {0}")]
    InvalidFullmoveNumber(String),

    #[error("{side} must have exactly one king, found {count}")]
    KingCount { side: Side, count: usize },
}

impl ChessPosition {
    /// Creates a position from a FEN string.
    ///
    /// The halfmove and fullmove fields may be omitted. Pieces that stand
    /// off their starting squares are marked as having moved.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() != 6 && parts.len() != 4 {
            return Err(FenError::InvalidPartCount(parts.len()));
        }

        let mut board: Board<ChessPiece> = parse_placement(parts[0])?;
        let placed: Vec<(Square, ChessPiece)> = board.pieces().collect();
        for (sq, mut piece) in placed {
            piece.has_moved = !piece.starts_on(sq);
            board.place(sq, piece);
        }

        let side_to_move = match parts[1] {
            "w" => Side::White,
            "b" => Side::Black,
            other => return Err(FenError::InvalidActiveColor(other.to_string())),
        };

        let mut position = ChessPosition::from_board(board, side_to_move);
        position.castling = parse_castling(parts[2])?;
        position.en_passant = parse_en_passant(parts[3])?;

        if parts.len() == 6 {
            position.halfmove_clock = parts[4]
                .parse::<u32>()
                .map_err(|_| FenError::InvalidHalfmoveClock(parts[4].to_string()))?;
            position.fullmove_number = parts[5]
                .parse::<u32>()
                .map_err(|_| FenError::InvalidFullmoveNumber(parts[5].to_string()))?;
        }

        position.check_kings()?;
        Ok(position)
    }

    /// Converts the position to a FEN string.
    pub fn to_fen(&self) -> String {
        let active = match self.side_to_move {
            Side::White => 'w',
            Side::Black => 'b',
        };
        let ep = self
            .en_passant
            .map(|sq| sq.to_algebraic())
            .unwrap_or_else(|| "-".to_string());
        format!(
            "{} {} {} {} {} {}",
            to_placement(&self.board),
            active,
            castling_field(self.castling),
            ep,
            self.halfmove_clock,
            self.fullmove_number
        )
    }
}

fn parse_castling(field: &str) -> Result<CastlingRights, FenError> {
    if field == "-" {
        return Ok(CastlingRights::NONE);
    }

    let mut flags = 0u8;
    for c in field.chars() {
        flags |= match c {
            'K' => CastlingRights::WHITE_KINGSIDE,
            'Q' => CastlingRights::WHITE_QUEENSIDE,
            'k' => CastlingRights::BLACK_KINGSIDE,
            'q' => CastlingRights::BLACK_QUEENSIDE,
            _ => {
                return Err(FenError::InvalidCastlingRights(format!(
                    "invalid character '{}'",
                    c
                )))
            }
        };
    }
    Ok(CastlingRights::new(flags))
}

fn castling_field(rights: CastlingRights) -> String {
    let mut out = String::new();
    for (flag, c) in [
        (CastlingRights::WHITE_KINGSIDE, 'K'),
        (CastlingRights::WHITE_QUEENSIDE, 'Q'),
        (CastlingRights::BLACK_KINGSIDE, 'k'),
        (CastlingRights::BLACK_QUEENSIDE, 'q'),
    ] {
        if rights.raw() & flag != 0 {
            out.push(c);
        }
    }
    if out.is_empty() {
        out.push('-');
    }
    out
}

fn parse_en_passant(field: &str) -> Result<Option<Square>, FenError> {
    if field == "-" {
        return Ok(None);
    }
    match Square::from_algebraic(field) {
        // Target squares sit on the third or sixth rank.
        Some(sq) if sq.row() == 2 || sq.row() == 5 => Ok(Some(sq)),
        _ => Err(FenError::InvalidEnPassantSquare(field.to_string())),
    }
}
