//! Standard chess.
//!
//! Rules covered: standard piece movement, castling, en passant, promotion
//! to any of the four pieces, check, checkmate, stalemate and the
//! insufficient-material draw. Repetition and the fifty-move rule are not
//! draws here; the halfmove clock is tracked for FEN only.

mod attacks;
mod fen;
mod movegen;
mod piece;
mod position;

pub use attacks::is_square_attacked;
pub use fen::{FenError, STARTPOS};
pub use movegen::{generate_moves, is_king_attacked, legal_moves_from, make_move, ChessMove};
pub use piece::{ChessKind, ChessPiece};
pub use position::{CastlingRights, ChessPosition};

use crate::rules::{DrawReason, GameResult, RuleSet, WinReason};
use board_core::{MoveList, Square};

/// Standard chess rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardChess;

impl RuleSet for StandardChess {
    type Position = ChessPosition;

    fn name(&self) -> &'static str {
        "chess"
    }

    fn initial_position(&self) -> ChessPosition {
        ChessPosition::startpos()
    }

    fn generate_moves(&self, position: &ChessPosition) -> MoveList<ChessKind> {
        generate_moves(position)
    }

    fn legal_moves_from(&self, position: &ChessPosition, from: Square) -> MoveList<ChessKind> {
        legal_moves_from(position, from)
    }

    fn make_move(&self, position: &ChessPosition, m: &ChessMove) -> ChessPosition {
        make_move(position, m)
    }

    fn is_check(&self, position: &ChessPosition) -> bool {
        is_king_attacked(position, position.side_to_move)
    }

    fn game_result(&self, position: &ChessPosition) -> Option<GameResult> {
        if generate_moves(position).is_empty() {
            return Some(if self.is_check(position) {
                GameResult::Win {
                    winner: position.side_to_move.opposite(),
                    reason: WinReason::Checkmate,
                }
            } else {
                GameResult::Draw(DrawReason::Stalemate)
            });
        }

        if self.is_insufficient_material(position) {
            return Some(GameResult::Draw(DrawReason::InsufficientMaterial));
        }

        None
    }

    /// Only kings remain, or each side has at most one knight or bishop
    /// besides its king. The limit is per side, so king and minor against
    /// king and minor is a draw too.
    fn is_insufficient_material(&self, position: &ChessPosition) -> bool {
        let mut minors = [0usize; 2];
        for (_, piece) in position.board.pieces() {
            match piece.kind {
                ChessKind::King => {}
                kind if kind.is_minor() => minors[piece.side.index()] += 1,
                _ => return false,
            }
        }
        minors.iter().all(|&n| n <= 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use board_core::Side;

    fn play(position: &ChessPosition, moves: &[(&str, &str)]) -> ChessPosition {
        let mut pos = position.clone();
        for (from, to) in moves {
            let from = Square::from_algebraic(from).unwrap();
            let to = Square::from_algebraic(to).unwrap();
            let m = StandardChess
                .legal_moves_from(&pos, from)
                .find(from, to)
                .cloned()
                .unwrap();
            pos = StandardChess.make_move(&pos, &m);
        }
        pos
    }

    #[test]
    fn initial_position() {
        let pos = StandardChess.initial_position();
        assert_eq!(pos.to_fen(), STARTPOS);
        assert_eq!(StandardChess.game_result(&pos), None);
        assert!(!StandardChess.is_check(&pos));
    }

    #[test]
    fn fools_mate() {
        let pos = play(
            &StandardChess.initial_position(),
            &[("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")],
        );
        assert!(StandardChess.is_check(&pos));
        assert_eq!(
            StandardChess.game_result(&pos),
            Some(GameResult::Win {
                winner: Side::Black,
                reason: WinReason::Checkmate
            })
        );
    }

    #[test]
    fn stalemate() {
        let pos = ChessPosition::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(!StandardChess.is_check(&pos));
        assert_eq!(
            StandardChess.game_result(&pos),
            Some(GameResult::Draw(DrawReason::Stalemate))
        );
    }

    #[test]
    fn insufficient_material() {
        let cases = [
            ("4k3/8/8/8/8/8/8/4K3 w - - 0 1", true),
            ("4k3/8/8/8/8/8/8/4KN2 w - - 0 1", true),
            ("4kb2/8/8/8/8/8/8/4KN2 w - - 0 1", true),
            ("4k3/8/8/8/8/8/8/3BKN2 w - - 0 1", false),
            ("4k3/8/8/8/8/8/8/4KR2 w - - 0 1", false),
            ("4k3/p7/8/8/8/8/8/4K3 w - - 0 1", false),
        ];
        for (fen, expected) in cases {
            let pos = ChessPosition::from_fen(fen).unwrap();
            assert_eq!(StandardChess.is_insufficient_material(&pos), expected, "{}", fen);
        }

        let pos = ChessPosition::from_fen("4k3/8/8/8/8/8/8/4KN2 w - - 0 1").unwrap();
        assert_eq!(
            StandardChess.game_result(&pos),
            Some(GameResult::Draw(DrawReason::InsufficientMaterial))
        );
    }

    #[test]
    fn is_legal_and_try_make_move() {
        let pos = StandardChess.initial_position();
        let e2 = Square::from_algebraic("e2").unwrap();
        let e5 = Square::from_algebraic("e5").unwrap();
        let bogus = ChessMove::normal(e2, e5);
        assert!(!StandardChess.is_legal(&pos, &bogus));
        assert!(StandardChess.try_make_move(&pos, &bogus).is_none());

        let e4 = StandardChess.legal_moves_from(&pos, e2)[1].clone();
        assert!(StandardChess.is_legal(&pos, &e4));
        assert!(StandardChess.try_make_move(&pos, &e4).is_some());
    }
}
