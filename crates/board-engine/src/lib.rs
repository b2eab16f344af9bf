//! Rules engines for chess and checkers.
//!
//! This crate provides:
//! - [`RuleSet`] - Trait the games implement: move generation, move
//!   execution and terminal detection
//! - [`chess::StandardChess`] and [`checkers::Checkers`] - The two rule sets
//! - [`Game`] - Game state machine with history, undo, pending promotion
//!   and capture continuations
//! - [`ai`] - Computer opponents at three difficulty levels
//!
//! # Example
//!
//! ```
//! use board_engine::chess::StandardChess;
//! use board_engine::{Ai, Difficulty, Game, Submitted};
//! use board_core::Square;
//!
//! let mut game = Game::new(StandardChess);
//! let e2 = Square::from_algebraic("e2").unwrap();
//! let e4 = Square::from_algebraic("e4").unwrap();
//! assert!(matches!(game.submit(e2, e4), Ok(Submitted::Applied(_))));
//!
//! let mut ai = Ai::with_seed(Difficulty::Medium, 7);
//! let reply = ai.select_move(game.rules(), game.position()).unwrap();
//! game.make_move(&reply).unwrap();
//! assert_eq!(game.move_count(), 2);
//! ```

pub mod ai;
pub mod checkers;
pub mod chess;
mod game;
pub mod rules;

pub use ai::{Ai, Difficulty, ParseDifficultyError, Strategy};
pub use game::{Game, GameError, GameStatus, MoveRecord, Submitted};
pub use rules::{
    DrawReason, GamePosition, GameResult, KindOf, MoveOf, PieceOf, RuleSet, WinReason,
};
