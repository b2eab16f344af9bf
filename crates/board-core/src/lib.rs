//! Core types for turn-based 8x8 board games.
//!
//! This crate provides the game-independent building blocks shared by the
//! chess and checkers rule sets:
//! - [`Side`] for the two players
//! - [`Square`] for board coordinates
//! - [`Board`] as a grid of any [`BoardPiece`]
//! - [`Move`] and [`MoveList`] for move representation
//! - placement notation parsing and formatting

mod board;
mod mov;
mod piece;
mod placement;
mod side;
mod square;

pub use board::Board;
pub use mov::{Move, MoveFlag, MoveList};
pub use piece::{BoardPiece, PieceKind};
pub use placement::{parse_placement, to_placement, PlacementError};
pub use side::Side;
pub use square::{Square, BOARD_SIZE};
