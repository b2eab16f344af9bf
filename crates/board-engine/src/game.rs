//! Game state machine with history tracking.
//!
//! The [`Game`] struct wraps a rule set and a position and adds:
//! - turn and terminal-state tracking ([`GameStatus`])
//! - an undo stack of position snapshots and move records
//! - a pending promotion choice for moves entered as (from, to)
//! - enforcement of checkers multi-capture continuations

use crate::rules::{
    DrawReason, GamePosition, GameResult, KindOf, MoveOf, PieceOf, RuleSet, WinReason,
};
use board_core::{Board, BoardPiece, Move, MoveList, Side, Square};
use std::fmt;
use thiserror::Error;

/// Where a game stands after the last applied move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    /// The given side is to move.
    InProgress(Side),
    /// The given side is to move and is in check.
    Check(Side),
    /// The given side won by checkmate.
    Checkmate(Side),
    Stalemate,
    DrawInsufficientMaterial,
    /// The given side won because the opponent resigned.
    Resigned(Side),
    /// The given side won because the opponent has no pieces or no moves.
    NoMovesLeft(Side),
}

impl GameStatus {
    /// Returns true for terminal states.
    pub const fn is_over(self) -> bool {
        !matches!(self, GameStatus::InProgress(_) | GameStatus::Check(_))
    }

    /// Returns the winner of a finished game, if there is one.
    pub const fn winner(self) -> Option<Side> {
        match self {
            GameStatus::Checkmate(side)
            | GameStatus::Resigned(side)
            | GameStatus::NoMovesLeft(side) => Some(side),
            _ => None,
        }
    }

    /// Converts a terminal state into a game result.
    pub const fn outcome(self) -> Option<GameResult> {
        let (winner, reason) = match self {
            GameStatus::InProgress(_) | GameStatus::Check(_) => return None,
            GameStatus::Stalemate => return Some(GameResult::Draw(DrawReason::Stalemate)),
            GameStatus::DrawInsufficientMaterial => {
                return Some(GameResult::Draw(DrawReason::InsufficientMaterial))
            }
            GameStatus::Checkmate(side) => (side, WinReason::Checkmate),
            GameStatus::Resigned(side) => (side, WinReason::Resignation),
            GameStatus::NoMovesLeft(side) => (side, WinReason::NoMovesLeft),
        };
        Some(GameResult::Win { winner, reason })
    }

    /// Converts a game result into the matching terminal state.
    pub const fn from_result(result: GameResult) -> Self {
        match result {
            GameResult::Win { winner, reason } => match reason {
                WinReason::Checkmate => GameStatus::Checkmate(winner),
                WinReason::NoMovesLeft => GameStatus::NoMovesLeft(winner),
                WinReason::Resignation => GameStatus::Resigned(winner),
            },
            GameResult::Draw(DrawReason::Stalemate) => GameStatus::Stalemate,
            GameResult::Draw(DrawReason::InsufficientMaterial) => {
                GameStatus::DrawInsufficientMaterial
            }
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::InProgress(side) => write!(f, "{} to move", side),
            GameStatus::Check(side) => write!(f, "{} is in check", side),
            GameStatus::Checkmate(winner) => write!(f, "checkmate, {} wins", winner),
            GameStatus::Stalemate => write!(f, "stalemate"),
            GameStatus::DrawInsufficientMaterial => write!(f, "draw by insufficient material"),
            GameStatus::Resigned(winner) => {
                write!(f, "{} resigned, {} wins", winner.opposite(), winner)
            }
            GameStatus::NoMovesLeft(winner) => write!(f, "no moves left, {} wins", winner),
        }
    }
}

/// Error type for game operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("illegal move: {from} to {to}")]
    IllegalMove { from: Square, to: Square },

    #[error("the piece on {square} must continue capturing")]
    ContinuationRequired { square: Square },

    #[error("a promotion choice is pending")]
    PromotionChoiceRequired,

    #[error("no promotion is pending")]
    NoPendingPromotion,

    #[error("promotion to that piece is not offered")]
    InvalidPromotion,

    #[error("nothing to undo")]
    NothingToUndo,

    #[error("game has already ended")]
    GameAlreadyOver,
}

/// A recorded move in game history.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveRecord<P: BoardPiece> {
    /// The move as generated.
    pub mov: Move<P::Kind>,
    /// The side that made the move.
    pub side: Side,
    /// The piece that moved, as it was before the move.
    pub piece: P,
    /// Pieces removed by the move and where they stood.
    pub captured: Vec<(Square, P)>,
    /// The new kind if the piece was promoted or crowned.
    pub promoted_to: Option<P::Kind>,
    /// True if the same side moves again (checkers continuation).
    pub continues: bool,
    /// True if the move leaves the side to move in check.
    pub gives_check: bool,
}

/// Outcome of [`Game::submit`].
#[derive(Debug, Clone, PartialEq)]
pub enum Submitted<P: BoardPiece> {
    /// The move was applied.
    Applied(MoveRecord<P>),
    /// Several promotion moves match; [`Game::promote`] must pick one.
    PromotionPending {
        from: Square,
        to: Square,
        choices: Vec<P::Kind>,
    },
}

/// A game in progress with history tracking.
///
/// All mutation goes through the methods here, which reject input that does
/// not fit the current state without changing anything.
#[derive(Debug, Clone)]
pub struct Game<R: RuleSet> {
    rules: R,
    position: R::Position,
    /// Positions before each applied move, parallel to `records`.
    snapshots: Vec<R::Position>,
    records: Vec<MoveRecord<PieceOf<R>>>,
    status: GameStatus,
    pending_promotion: Option<MoveList<KindOf<R>>>,
}

impl<R: RuleSet + Default> Default for Game<R> {
    fn default() -> Self {
        Self::new(R::default())
    }
}

impl<R: RuleSet> Game<R> {
    /// Creates a new game from the rule set's initial position.
    pub fn new(rules: R) -> Self {
        let position = rules.initial_position();
        Self::from_position(rules, position)
    }

    /// Creates a game from a custom starting position.
    pub fn from_position(rules: R, position: R::Position) -> Self {
        let mut game = Game {
            rules,
            position,
            snapshots: Vec::new(),
            records: Vec::new(),
            status: GameStatus::InProgress(Side::White),
            pending_promotion: None,
        };
        game.status = game.evaluate();
        game
    }

    /// Starts over from the initial position.
    pub fn reset(&mut self) {
        *self = Self::new(self.rules.clone());
    }

    pub fn rules(&self) -> &R {
        &self.rules
    }

    /// Returns the current position.
    pub fn position(&self) -> &R::Position {
        &self.position
    }

    pub fn board(&self) -> &Board<PieceOf<R>> {
        self.position.board()
    }

    pub fn side_to_move(&self) -> Side {
        self.position.side_to_move()
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Returns true if the game has ended.
    pub fn is_over(&self) -> bool {
        self.status.is_over()
    }

    /// Returns the square of the piece that must keep capturing, if any.
    pub fn continuation(&self) -> Option<Square> {
        self.rules.continuation(&self.position)
    }

    /// Returns the origin and destination of a move awaiting a promotion
    /// choice.
    pub fn pending_promotion(&self) -> Option<(Square, Square)> {
        self.pending_promotion
            .as_ref()
            .and_then(|moves| moves.as_slice().first())
            .map(|m| (m.from, m.to))
    }

    /// Returns all legal moves, or none once the game is over.
    pub fn legal_moves(&self) -> MoveList<KindOf<R>> {
        if self.is_over() {
            MoveList::new()
        } else {
            self.rules.generate_moves(&self.position)
        }
    }

    /// Returns the legal moves of the piece on `from`, for highlighting.
    ///
    /// An empty square or an opponent's piece yields an empty list.
    pub fn select(&self, from: Square) -> Result<MoveList<KindOf<R>>, GameError> {
        self.check_accepting_input()?;
        self.check_continuation(from)?;
        Ok(self.rules.legal_moves_from(&self.position, from))
    }

    /// Applies a fully specified move.
    pub fn make_move(&mut self, m: &MoveOf<R>) -> Result<MoveRecord<PieceOf<R>>, GameError> {
        self.check_accepting_input()?;
        self.check_continuation(m.from)?;
        if !self.rules.is_legal(&self.position, m) {
            return Err(GameError::IllegalMove {
                from: m.from,
                to: m.to,
            });
        }
        self.apply(m)
    }

    /// Applies the move from `from` to `to`.
    ///
    /// When the destination is reached by several promotion moves the game
    /// holds them pending and every other input is rejected until
    /// [`promote`](Self::promote) picks one.
    pub fn submit(&mut self, from: Square, to: Square) -> Result<Submitted<PieceOf<R>>, GameError> {
        self.check_accepting_input()?;
        self.check_continuation(from)?;

        let mut candidates = self.rules.legal_moves_from(&self.position, from);
        candidates.retain(|m| m.to == to);

        match candidates.len() {
            0 => Err(GameError::IllegalMove { from, to }),
            1 => self.apply(&candidates[0]).map(Submitted::Applied),
            _ => {
                let choices = candidates.iter().filter_map(|m| m.promotion).collect();
                self.pending_promotion = Some(candidates);
                Ok(Submitted::PromotionPending { from, to, choices })
            }
        }
    }

    /// Resolves a pending promotion with the chosen kind.
    pub fn promote(&mut self, kind: KindOf<R>) -> Result<MoveRecord<PieceOf<R>>, GameError> {
        let options = self
            .pending_promotion
            .as_ref()
            .ok_or(GameError::NoPendingPromotion)?;
        let chosen = options
            .iter()
            .find(|m| m.promotion == Some(kind))
            .cloned()
            .ok_or(GameError::InvalidPromotion)?;
        self.pending_promotion = None;
        self.apply(&chosen)
    }

    /// Drops a pending promotion without moving. Returns true if one was
    /// pending.
    pub fn cancel_promotion(&mut self) -> bool {
        self.pending_promotion.take().is_some()
    }

    /// Takes back the last ply, restoring the exact previous position.
    pub fn undo(&mut self) -> Result<MoveRecord<PieceOf<R>>, GameError> {
        self.check_accepting_input()?;
        match (self.snapshots.pop(), self.records.pop()) {
            (Some(previous), Some(record)) => {
                self.position = previous;
                self.status = self.evaluate();
                Ok(record)
            }
            _ => Err(GameError::NothingToUndo),
        }
    }

    /// Ends the game with `side` resigning.
    pub fn resign(&mut self, side: Side) -> Result<GameStatus, GameError> {
        if self.is_over() {
            return Err(GameError::GameAlreadyOver);
        }
        self.pending_promotion = None;
        self.status = GameStatus::Resigned(side.opposite());
        Ok(self.status)
    }

    /// Returns the move history, oldest first.
    pub fn history(&self) -> &[MoveRecord<PieceOf<R>>] {
        &self.records
    }

    pub fn last_move(&self) -> Option<&MoveRecord<PieceOf<R>>> {
        self.records.last()
    }

    /// Returns the number of plies played.
    pub fn move_count(&self) -> usize {
        self.records.len()
    }

    /// Returns the number of enemy pieces captured by `side`.
    pub fn capture_count(&self, side: Side) -> usize {
        self.records
            .iter()
            .filter(|r| r.side == side)
            .map(|r| r.captured.len())
            .sum()
    }

    fn check_accepting_input(&self) -> Result<(), GameError> {
        if self.is_over() {
            return Err(GameError::GameAlreadyOver);
        }
        if self.pending_promotion.is_some() {
            return Err(GameError::PromotionChoiceRequired);
        }
        Ok(())
    }

    fn check_continuation(&self, from: Square) -> Result<(), GameError> {
        match self.continuation() {
            Some(square) if square != from => Err(GameError::ContinuationRequired { square }),
            _ => Ok(()),
        }
    }

    /// Applies a move known to be legal and records it.
    fn apply(&mut self, m: &MoveOf<R>) -> Result<MoveRecord<PieceOf<R>>, GameError> {
        let before = &self.position;
        let side = before.side_to_move();
        let piece = before
            .board()
            .piece_at(m.from)
            .ok_or(GameError::IllegalMove {
                from: m.from,
                to: m.to,
            })?;
        let captured = m
            .captures
            .iter()
            .filter_map(|&sq| before.board().piece_at(sq).map(|p| (sq, p)))
            .collect();

        let after = self.rules.make_move(before, m);
        let promoted_to = after
            .board()
            .piece_at(m.to)
            .map(|p| p.kind())
            .filter(|&kind| kind != piece.kind());
        let record = MoveRecord {
            mov: m.clone(),
            side,
            piece,
            captured,
            promoted_to,
            continues: after.side_to_move() == side,
            gives_check: self.rules.is_check(&after),
        };

        let previous = std::mem::replace(&mut self.position, after);
        self.snapshots.push(previous);
        self.records.push(record.clone());
        self.status = self.evaluate();
        Ok(record)
    }

    fn evaluate(&self) -> GameStatus {
        let side = self.position.side_to_move();
        match self.rules.game_result(&self.position) {
            Some(result) => GameStatus::from_result(result),
            None if self.rules.is_check(&self.position) => GameStatus::Check(side),
            None => GameStatus::InProgress(side),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkers::{Checkers, CheckersPosition};
    use crate::chess::{ChessKind, ChessPosition, StandardChess};

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn submit<R: RuleSet>(game: &mut Game<R>, from: &str, to: &str) -> Submitted<PieceOf<R>> {
        game.submit(sq(from), sq(to)).unwrap()
    }

    #[test]
    fn new_game_status() {
        let game = Game::new(StandardChess);
        assert_eq!(game.status(), GameStatus::InProgress(Side::White));
        assert_eq!(game.legal_moves().len(), 20);
        assert_eq!(game.move_count(), 0);
        assert!(game.last_move().is_none());
    }

    #[test]
    fn submit_and_turns() {
        let mut game = Game::new(StandardChess);
        let Submitted::Applied(record) = submit(&mut game, "e2", "e4") else {
            panic!("expected an applied move");
        };
        assert_eq!(record.side, Side::White);
        assert_eq!(record.piece.kind, ChessKind::Pawn);
        assert!(!record.continues);
        assert_eq!(game.status(), GameStatus::InProgress(Side::Black));
        assert_eq!(game.move_count(), 1);
    }

    #[test]
    fn illegal_submit_changes_nothing() {
        let mut game = Game::new(StandardChess);
        let before = game.position().clone();
        assert_eq!(
            game.submit(sq("e2"), sq("e5")),
            Err(GameError::IllegalMove {
                from: sq("e2"),
                to: sq("e5")
            })
        );
        assert_eq!(
            game.submit(sq("e7"), sq("e5")),
            Err(GameError::IllegalMove {
                from: sq("e7"),
                to: sq("e5")
            })
        );
        assert_eq!(game.position(), &before);
        assert_eq!(game.move_count(), 0);
    }

    #[test]
    fn select_returns_destinations() {
        let game = Game::new(StandardChess);
        let moves = game.select(sq("b1")).unwrap();
        assert_eq!(moves.destinations(), vec![sq("a3"), sq("c3")]);
        assert!(game.select(sq("e4")).unwrap().is_empty());
    }

    #[test]
    fn fools_mate_ends_game() {
        let mut game = Game::new(StandardChess);
        submit(&mut game, "f2", "f3");
        submit(&mut game, "e7", "e5");
        submit(&mut game, "g2", "g4");
        let Submitted::Applied(record) = submit(&mut game, "d8", "h4") else {
            panic!("expected an applied move");
        };
        assert!(record.gives_check);
        assert_eq!(game.status(), GameStatus::Checkmate(Side::Black));
        assert_eq!(game.status().winner(), Some(Side::Black));
        assert!(game.legal_moves().is_empty());

        assert_eq!(game.submit(sq("a2"), sq("a3")), Err(GameError::GameAlreadyOver));
        assert_eq!(game.undo(), Err(GameError::GameAlreadyOver));
        assert_eq!(game.resign(Side::White), Err(GameError::GameAlreadyOver));
    }

    #[test]
    fn check_status() {
        let pos = ChessPosition::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        let mut game = Game::from_position(StandardChess, pos);
        submit(&mut game, "a1", "a8");
        assert_eq!(game.status(), GameStatus::Check(Side::Black));
        assert!(game.last_move().unwrap().gives_check);
    }

    #[test]
    fn promotion_choice_flow() {
        let pos = ChessPosition::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let mut game = Game::from_position(StandardChess, pos);

        assert_eq!(game.promote(ChessKind::Queen), Err(GameError::NoPendingPromotion));

        let Submitted::PromotionPending { choices, .. } = submit(&mut game, "a7", "a8") else {
            panic!("expected a pending promotion");
        };
        assert_eq!(choices, ChessKind::PROMOTIONS.to_vec());
        assert_eq!(game.pending_promotion(), Some((sq("a7"), sq("a8"))));

        assert_eq!(
            game.submit(sq("e1"), sq("e2")),
            Err(GameError::PromotionChoiceRequired)
        );
        assert_eq!(game.undo(), Err(GameError::PromotionChoiceRequired));
        assert_eq!(game.promote(ChessKind::King), Err(GameError::InvalidPromotion));

        let record = game.promote(ChessKind::Knight).unwrap();
        assert_eq!(record.promoted_to, Some(ChessKind::Knight));
        assert_eq!(game.pending_promotion(), None);
        assert_eq!(
            game.board().piece_at(sq("a8")).map(|p| p.kind),
            Some(ChessKind::Knight)
        );
    }

    #[test]
    fn cancel_promotion() {
        let pos = ChessPosition::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let mut game = Game::from_position(StandardChess, pos);
        submit(&mut game, "a7", "a8");
        assert!(game.cancel_promotion());
        assert!(!game.cancel_promotion());
        assert!(game.select(sq("e1")).is_ok());
    }

    #[test]
    fn undo_restores_previous_position() {
        let mut game = Game::new(StandardChess);
        let start = game.position().clone();
        submit(&mut game, "e2", "e4");
        let after_e4 = game.position().clone();
        submit(&mut game, "d7", "d5");
        submit(&mut game, "e4", "d5");
        assert_eq!(game.capture_count(Side::White), 1);

        game.undo().unwrap();
        game.undo().unwrap();
        assert_eq!(game.position(), &after_e4);
        game.undo().unwrap();
        assert_eq!(game.position(), &start);
        assert_eq!(game.undo(), Err(GameError::NothingToUndo));
        assert_eq!(game.status(), GameStatus::InProgress(Side::White));
    }

    #[test]
    fn resign_ends_game() {
        let mut game = Game::new(StandardChess);
        assert_eq!(game.resign(Side::White), Ok(GameStatus::Resigned(Side::Black)));
        assert!(game.is_over());
        assert_eq!(
            game.status().outcome(),
            Some(GameResult::Win {
                winner: Side::Black,
                reason: WinReason::Resignation
            })
        );
        game.reset();
        assert_eq!(game.status(), GameStatus::InProgress(Side::White));
    }

    #[test]
    fn checkers_continuation_is_enforced() {
        let pos = CheckersPosition::from_notation("8/8/8/8/5b2/8/3b4/2r3r1 r").unwrap();
        let mut game = Game::from_position(Checkers, pos);

        let Submitted::Applied(first) = submit(&mut game, "c1", "e3") else {
            panic!("expected an applied move");
        };
        assert!(first.continues);
        assert_eq!(game.side_to_move(), Side::White);
        assert_eq!(game.continuation(), Some(sq("e3")));
        assert_eq!(
            game.select(sq("g1")),
            Err(GameError::ContinuationRequired { square: sq("e3") })
        );

        submit(&mut game, "e3", "g5");
        assert_eq!(game.capture_count(Side::White), 2);
        assert_eq!(game.status(), GameStatus::NoMovesLeft(Side::White));
    }

    #[test]
    fn checkers_undo_inside_chain() {
        let pos = CheckersPosition::from_notation("8/8/8/8/5b2/8/3b4/2r5 r").unwrap();
        let mut game = Game::from_position(Checkers, pos.clone());
        submit(&mut game, "c1", "e3");
        let record = game.undo().unwrap();
        assert!(record.continues);
        assert_eq!(game.position(), &pos);
        assert_eq!(game.continuation(), None);
    }

    #[test]
    fn status_outcome_roundtrip() {
        for status in [
            GameStatus::Checkmate(Side::White),
            GameStatus::Stalemate,
            GameStatus::DrawInsufficientMaterial,
            GameStatus::Resigned(Side::Black),
            GameStatus::NoMovesLeft(Side::White),
        ] {
            let result = status.outcome().unwrap();
            assert_eq!(GameStatus::from_result(result), status);
        }
        assert_eq!(GameStatus::InProgress(Side::White).outcome(), None);
        assert_eq!(GameStatus::Check(Side::Black).outcome(), None);
    }

    #[test]
    fn status_display() {
        assert_eq!(GameStatus::InProgress(Side::White).to_string(), "White to move");
        assert_eq!(
            GameStatus::Resigned(Side::Black).to_string(),
            "White resigned, Black wins"
        );
    }
}
