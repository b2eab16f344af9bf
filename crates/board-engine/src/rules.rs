//! Rule set abstraction for board games.
//!
//! This module provides the [`RuleSet`] trait which abstracts over the games
//! the engine can play. The game state machine and the AI are rule-agnostic:
//! they delegate move generation, move execution and terminal detection to
//! the active rule set.

use board_core::{Board, BoardPiece, Move, MoveList, Side, Square};
use std::fmt;

/// The piece type of a rule set.
pub type PieceOf<R> = <<R as RuleSet>::Position as GamePosition>::Piece;

/// The piece kind type of a rule set.
pub type KindOf<R> = <PieceOf<R> as BoardPiece>::Kind;

/// The move type of a rule set.
pub type MoveOf<R> = Move<KindOf<R>>;

/// Result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    /// One side won.
    Win { winner: Side, reason: WinReason },
    /// Draw with a specific reason.
    Draw(DrawReason),
}

impl GameResult {
    /// Returns the winning side, if any.
    pub const fn winner(self) -> Option<Side> {
        match self {
            GameResult::Win { winner, .. } => Some(winner),
            GameResult::Draw(_) => None,
        }
    }
}

/// How a game was won.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WinReason {
    /// The loser is in check with no legal moves.
    Checkmate,
    /// The loser has no pieces or no legal moves (checkers).
    NoMovesLeft,
    /// The loser resigned.
    Resignation,
}

/// Reason for a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawReason {
    /// Stalemate - no legal moves but not in check.
    Stalemate,
    /// Insufficient material to checkmate.
    InsufficientMaterial,
}

/// A snapshot of a game: the board plus whatever the rules need to track.
///
/// Positions are plain values. Applying a move produces a new position, and
/// restoring a clone is how history and search go back.
pub trait GamePosition: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// The piece type placed on the board.
    type Piece: BoardPiece;

    /// Returns the board.
    fn board(&self) -> &Board<Self::Piece>;

    /// Returns the side to move.
    fn side_to_move(&self) -> Side;
}

/// Trait for implementing a game's rules.
///
/// # Example
///
/// ```
/// use board_engine::chess::StandardChess;
/// use board_engine::rules::RuleSet;
///
/// let position = StandardChess.initial_position();
/// let moves = StandardChess.generate_moves(&position);
/// assert_eq!(moves.len(), 20);
/// ```
pub trait RuleSet: Clone + fmt::Debug + Send + Sync + 'static {
    /// The position type for this game.
    type Position: GamePosition;

    /// Short identifier for the game ("chess", "checkers").
    fn name(&self) -> &'static str;

    /// Returns the initial position.
    fn initial_position(&self) -> Self::Position;

    /// Generates all legal moves for the side to move, in generation order.
    fn generate_moves(&self, position: &Self::Position) -> MoveList<KindOf<Self>>;

    /// Generates the legal moves of the piece on `from`.
    ///
    /// Returns an empty list for empty squares and for pieces of the side
    /// not to move.
    fn legal_moves_from(&self, position: &Self::Position, from: Square) -> MoveList<KindOf<Self>> {
        let mut moves = self.generate_moves(position);
        moves.retain(|m| m.from == from);
        moves
    }

    /// Returns true if the given move is legal in the position.
    fn is_legal(&self, position: &Self::Position, m: &MoveOf<Self>) -> bool {
        self.legal_moves_from(position, m.from)
            .as_slice()
            .contains(m)
    }

    /// Makes a move on the position, returning the new position.
    ///
    /// The move must come from [`generate_moves`](RuleSet::generate_moves)
    /// for this position; use [`try_make_move`](RuleSet::try_make_move) for
    /// unchecked input.
    fn make_move(&self, position: &Self::Position, m: &MoveOf<Self>) -> Self::Position;

    /// Attempts to make a move, returning `None` if illegal.
    fn try_make_move(&self, position: &Self::Position, m: &MoveOf<Self>) -> Option<Self::Position> {
        if self.is_legal(position, m) {
            Some(self.make_move(position, m))
        } else {
            None
        }
    }

    /// Returns true if the side to move is in check.
    fn is_check(&self, position: &Self::Position) -> bool;

    /// Returns the square of a piece that must keep capturing, if any.
    ///
    /// While a continuation is pending the side to move does not change and
    /// only that piece may move.
    fn continuation(&self, _position: &Self::Position) -> Option<Square> {
        None
    }

    /// Returns the game result if the game is over, otherwise `None`.
    fn game_result(&self, position: &Self::Position) -> Option<GameResult>;

    /// Returns true if the game is over.
    fn is_game_over(&self, position: &Self::Position) -> bool {
        self.game_result(position).is_some()
    }

    /// Returns true if neither side has sufficient material to win.
    fn is_insufficient_material(&self, position: &Self::Position) -> bool;
}
