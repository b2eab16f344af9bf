//! Piece geometry and square attack detection.

use super::piece::{ChessKind, ChessPiece};
use board_core::{Board, Side, Square};

/// Knight move offsets as (row delta, column delta).
pub(crate) const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

/// King move offsets.
pub(crate) const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Orthogonal ray directions (rook, queen).
pub(crate) const ROOK_DIRECTIONS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Diagonal ray directions (bishop, queen).
pub(crate) const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// Returns true if any piece of `by` attacks `sq`.
///
/// Attacks are geometric: a pinned piece still attacks, and the square may
/// hold a piece of either side.
pub fn is_square_attacked(board: &Board<ChessPiece>, sq: Square, by: Side) -> bool {
    let holds = |target: Option<Square>, kinds: &[ChessKind]| {
        target
            .and_then(|t| board.piece_at(t))
            .is_some_and(|p| p.side == by && kinds.contains(&p.kind))
    };

    // A pawn of `by` attacks one row in its forward direction.
    let back = -by.forward();
    if holds(sq.offset(back, -1), &[ChessKind::Pawn]) || holds(sq.offset(back, 1), &[ChessKind::Pawn])
    {
        return true;
    }

    if KNIGHT_OFFSETS
        .iter()
        .any(|&(dr, dc)| holds(sq.offset(dr, dc), &[ChessKind::Knight]))
    {
        return true;
    }

    if KING_OFFSETS
        .iter()
        .any(|&(dr, dc)| holds(sq.offset(dr, dc), &[ChessKind::King]))
    {
        return true;
    }

    let ray_hits = |directions: &[(i8, i8)], kinds: &[ChessKind]| {
        directions.iter().any(|&(dr, dc)| {
            let mut current = sq.offset(dr, dc);
            while let Some(t) = current {
                if let Some(p) = board.piece_at(t) {
                    return p.side == by && kinds.contains(&p.kind);
                }
                current = t.offset(dr, dc);
            }
            false
        })
    };

    ray_hits(&BISHOP_DIRECTIONS, &[ChessKind::Bishop, ChessKind::Queen])
        || ray_hits(&ROOK_DIRECTIONS, &[ChessKind::Rook, ChessKind::Queen])
}
