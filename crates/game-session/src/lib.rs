//! Interactive sessions on top of the board-game engine.
//!
//! This crate provides:
//! - [`Session`] - A game with its players: turns against the computer,
//!   selection, undo, hints and high scores, driven by commands that
//!   return [`SessionEvent`]s
//! - [`actor`] - A tokio task that owns a session, paces the computer and
//!   runs the move clock
//! - [`SessionConfig`] - Settings loaded from `games.toml`
//! - [`scores`] - SQLite-backed high-score lists

pub mod actor;
pub mod config;
pub mod scores;
mod session;

pub use actor::{spawn, ActorConfig, Request, SessionHandle, Snapshot};
pub use config::{ConfigError, SessionConfig};
pub use scores::{HighScores, ScoreEntry, StoreError};
pub use session::{EventOf, Mode, Session, SessionError, SessionEvent};
