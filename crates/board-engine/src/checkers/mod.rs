//! Checkers (draughts on the dark squares of an 8x8 board).
//!
//! Red ([`Side`](board_core::Side)`::White`) starts at the bottom and moves
//! first. Men step and capture diagonally forward; kings move and capture in
//! all four diagonals. Captures are mandatory, and a piece that can keep
//! capturing must do so. A side with no pieces or no legal move loses.

mod movegen;
mod piece;
mod position;

pub use movegen::{can_jump, generate_moves, legal_moves_from, make_move, CheckersMove};
pub use piece::{CheckersKind, CheckersPiece};
pub use position::{CheckersPosition, NotationError, START};

use crate::rules::{GameResult, RuleSet, WinReason};
use board_core::{MoveList, Square};

/// Checkers rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct Checkers;

impl RuleSet for Checkers {
    type Position = CheckersPosition;

    fn name(&self) -> &'static str {
        "checkers"
    }

    fn initial_position(&self) -> CheckersPosition {
        CheckersPosition::startpos()
    }

    fn generate_moves(&self, position: &CheckersPosition) -> MoveList<CheckersKind> {
        generate_moves(position)
    }

    fn legal_moves_from(&self, position: &CheckersPosition, from: Square) -> MoveList<CheckersKind> {
        legal_moves_from(position, from)
    }

    fn make_move(&self, position: &CheckersPosition, m: &CheckersMove) -> CheckersPosition {
        make_move(position, m)
    }

    fn is_check(&self, _position: &CheckersPosition) -> bool {
        false
    }

    fn continuation(&self, position: &CheckersPosition) -> Option<Square> {
        position.continuation
    }

    fn game_result(&self, position: &CheckersPosition) -> Option<GameResult> {
        if generate_moves(position).is_empty() {
            Some(GameResult::Win {
                winner: position.side_to_move.opposite(),
                reason: WinReason::NoMovesLeft,
            })
        } else {
            None
        }
    }

    fn is_insufficient_material(&self, _position: &CheckersPosition) -> bool {
        false
    }
}
