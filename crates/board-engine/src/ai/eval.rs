//! Static evaluation shared by the heuristic and search strategies.

use crate::checkers::{self, Checkers, CheckersKind, CheckersPiece, CheckersPosition};
use crate::chess::{ChessKind, ChessPiece, ChessPosition, StandardChess};
use crate::rules::{GamePosition, MoveOf, PieceOf, RuleSet};
use board_core::{BoardPiece, Move, Side, Square};

/// Game-specific scoring terms used by the AI strategies.
pub trait Evaluate: RuleSet {
    /// Material value of a piece for position evaluation.
    fn material(&self, piece: PieceOf<Self>) -> f64;

    /// Value of capturing a piece in the one-ply heuristic.
    fn capture_value(&self, piece: PieceOf<Self>) -> f64 {
        self.material(piece)
    }

    /// Game-specific bonus for a move in the one-ply heuristic.
    fn move_bonus(&self, _position: &Self::Position, _m: &MoveOf<Self>) -> f64 {
        0.0
    }

    /// Positional value of a piece on a square, from its owner's view.
    fn positional(&self, _piece: PieceOf<Self>, _sq: Square) -> f64 {
        0.0
    }

    /// Weight of the legal-move-count difference in position evaluation.
    fn mobility_weight(&self) -> f64 {
        0.0
    }

    /// Number of legal moves `side` would have in the position.
    fn mobility(&self, _position: &Self::Position, _side: Side) -> usize {
        0
    }
}

/// Evaluates a position from `perspective`'s point of view.
///
/// Own material and positional terms count positive, the opponent's
/// negative, plus the weighted mobility difference.
pub fn evaluate<R: Evaluate>(rules: &R, position: &R::Position, perspective: Side) -> f64 {
    let mut score = 0.0;
    for (sq, piece) in position.board().pieces() {
        let value = rules.material(piece) + rules.positional(piece, sq);
        if piece.owner() == perspective {
            score += value;
        } else {
            score -= value;
        }
    }

    let weight = rules.mobility_weight();
    if weight != 0.0 {
        let own = rules.mobility(position, perspective) as f64;
        let theirs = rules.mobility(position, perspective.opposite()) as f64;
        score += weight * (own - theirs);
    }
    score
}

/// Capture value of everything a move removes.
pub fn captured_value<R: Evaluate>(rules: &R, position: &R::Position, m: &MoveOf<R>) -> f64 {
    m.captures
        .iter()
        .filter_map(|&sq| position.board().piece_at(sq))
        .map(|p| rules.capture_value(p))
        .sum()
}

/// Conventional piece values: pawn 1, knight 3, bishop 3, rook 5, queen 9.
pub fn chess_value(kind: ChessKind) -> f64 {
    match kind {
        ChessKind::Pawn => 1.0,
        ChessKind::Knight | ChessKind::Bishop => 3.0,
        ChessKind::Rook => 5.0,
        ChessKind::Queen => 9.0,
        ChessKind::King => 0.0,
    }
}

const PAWN_ADVANCE_BONUS: f64 = 0.2;

impl Evaluate for StandardChess {
    fn material(&self, piece: ChessPiece) -> f64 {
        chess_value(piece.kind)
    }

    /// Developing a knight or bishop for the first time is worth 2. A pawn
    /// push earns 0.2 per rank beyond its starting rank, and a promotion is
    /// worth ten times the new piece on top of that.
    fn move_bonus(&self, position: &ChessPosition, m: &Move<ChessKind>) -> f64 {
        let mut bonus = 0.0;
        if let Some(piece) = position.board.piece_at(m.from) {
            if !piece.has_moved && piece.kind.is_minor() {
                bonus += 2.0;
            }
            if piece.kind == ChessKind::Pawn {
                let from_home = (m.to.row() as i8 - piece.side.home_row() as i8).abs();
                bonus += (from_home - 1).max(0) as f64 * PAWN_ADVANCE_BONUS;
            }
        }
        if let Some(kind) = m.promotion {
            bonus += chess_value(kind) * 10.0;
        }
        bonus
    }
}

impl Evaluate for Checkers {
    fn material(&self, piece: CheckersPiece) -> f64 {
        match piece.kind {
            CheckersKind::Man => 1.0,
            CheckersKind::King => 5.0,
        }
    }

    fn capture_value(&self, piece: CheckersPiece) -> f64 {
        match piece.kind {
            CheckersKind::Man => 1.0,
            CheckersKind::King => 1.5,
        }
    }

    fn move_bonus(&self, position: &CheckersPosition, m: &Move<CheckersKind>) -> f64 {
        let mut bonus = 0.0;
        let crowns = position
            .board
            .piece_at(m.from)
            .is_some_and(|p| p.kind == CheckersKind::Man && m.to.row() == p.side.promotion_row());
        if crowns {
            bonus += 8.0;
        }
        if m.to.is_edge() {
            bonus -= 1.0;
        }
        bonus
    }

    fn positional(&self, piece: CheckersPiece, sq: Square) -> f64 {
        let centre = (7.0 - sq.center_distance()) * 0.05;
        match piece.kind {
            CheckersKind::Man => {
                let advanced = (sq.row() as i8 - piece.side.home_row() as i8).abs();
                centre + advanced as f64 * 0.1
            }
            CheckersKind::King => centre,
        }
    }

    fn mobility_weight(&self) -> f64 {
        0.1
    }

    fn mobility(&self, position: &CheckersPosition, side: Side) -> usize {
        if position.side_to_move == side {
            return checkers::generate_moves(position).len();
        }
        let turned = CheckersPosition {
            side_to_move: side,
            continuation: None,
            ..position.clone()
        };
        checkers::generate_moves(&turned).len()
    }
}
