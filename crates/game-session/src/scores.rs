//! SQLite storage for high-score lists.
//!
//! Each game keeps its own list of at most [`MAX_ENTRIES`] results, best
//! first. Among equal scores the most recently recorded result ranks first.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Length of every high-score list.
pub const MAX_ENTRIES: usize = 10;

/// Errors from the score store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("invalid stored counters: {0}")]
    Counters(#[from] serde_json::Error),
    #[error("invalid stored timestamp: {0}")]
    Timestamp(#[from] chrono::ParseError),
}

/// How a game ended for the player being scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

/// Statistics of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreCounters {
    pub outcome: Outcome,
    /// Enemy pieces captured by the scored player.
    pub captures: u32,
    /// Plies played by both sides.
    pub plies: u32,
}

impl ScoreCounters {
    /// Win 100, draw 50, loss 0, plus 10 per capture, minus one per ply,
    /// never below zero.
    pub fn score(&self) -> u32 {
        let base: i64 = match self.outcome {
            Outcome::Win => 100,
            Outcome::Draw => 50,
            Outcome::Loss => 0,
        };
        let total = base + 10 * i64::from(self.captures) - i64::from(self.plies);
        total.max(0) as u32
    }
}

/// One line of a high-score list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub summary: String,
    pub score: u32,
    pub counters: ScoreCounters,
    pub recorded_at: DateTime<Utc>,
}

impl ScoreEntry {
    /// Creates an entry scored from its counters, stamped now.
    pub fn new(summary: impl Into<String>, counters: ScoreCounters) -> Self {
        ScoreEntry {
            summary: summary.into(),
            score: counters.score(),
            counters,
            recorded_at: Utc::now(),
        }
    }
}

/// SQLite-backed high-score lists keyed by game name.
pub struct ScoreStore {
    conn: Connection,
}

impl ScoreStore {
    /// Opens or creates a SQLite database at the given path.
    ///
    /// The schema is created on first open. `":memory:"` gives a private
    /// in-memory store.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS scores (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                game TEXT NOT NULL,
                summary TEXT NOT NULL,
                score INTEGER NOT NULL,
                counters TEXT NOT NULL,
                recorded_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS scores_by_game ON scores (game, score);
            ",
        )?;
        Ok(())
    }

    /// Adds an entry to a game's list and trims the list to
    /// [`MAX_ENTRIES`]. Returns the list after the write.
    pub fn record(&mut self, game: &str, entry: &ScoreEntry) -> Result<Vec<ScoreEntry>, StoreError> {
        let counters = serde_json::to_string(&entry.counters)?;
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO scores (game, summary, score, counters, recorded_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                game,
                entry.summary,
                entry.score,
                counters,
                entry.recorded_at.to_rfc3339()
            ],
        )?;
        tx.execute(
            "DELETE FROM scores WHERE game = ?1 AND id NOT IN (
                SELECT id FROM scores WHERE game = ?1
                ORDER BY score DESC, id DESC LIMIT ?2
             )",
            params![game, MAX_ENTRIES as i64],
        )?;
        tx.commit()?;
        self.top(game)
    }

    /// Returns a game's list, best first.
    pub fn top(&self, game: &str) -> Result<Vec<ScoreEntry>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT summary, score, counters, recorded_at FROM scores
             WHERE game = ?1 ORDER BY score DESC, id DESC LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![game, MAX_ENTRIES as i64], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, u32>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (summary, score, counters, recorded_at) = row?;
            entries.push(ScoreEntry {
                summary,
                score,
                counters: serde_json::from_str(&counters)?,
                recorded_at: DateTime::parse_from_rfc3339(&recorded_at)?.with_timezone(&Utc),
            });
        }
        Ok(entries)
    }
}

/// High-score lists that never fail the caller.
///
/// Storage problems are logged and otherwise ignored; a store that could
/// not be opened behaves as an always-empty list.
pub struct HighScores {
    store: Option<ScoreStore>,
}

impl HighScores {
    /// Opens the store at `path`, creating its parent directory.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            if let Err(e) = std::fs::create_dir_all(dir) {
                tracing::warn!("Failed to create score directory {:?}: {}", dir, e);
            }
        }
        match ScoreStore::open(path) {
            Ok(store) => HighScores { store: Some(store) },
            Err(e) => {
                tracing::warn!("High scores disabled, cannot open {:?}: {}", path, e);
                HighScores::disabled()
            }
        }
    }

    /// An in-memory store, for tests and throwaway sessions.
    pub fn in_memory() -> Self {
        Self::open(":memory:")
    }

    /// A store that records nothing.
    pub fn disabled() -> Self {
        HighScores { store: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.store.is_some()
    }

    /// Records an entry; returns the updated list, or an empty list if the
    /// write failed.
    pub fn record(&mut self, game: &str, entry: &ScoreEntry) -> Vec<ScoreEntry> {
        let Some(store) = self.store.as_mut() else {
            return Vec::new();
        };
        store.record(game, entry).unwrap_or_else(|e| {
            tracing::warn!("Failed to record {} score: {}", game, e);
            Vec::new()
        })
    }

    /// Returns a game's list, best first.
    pub fn top(&self, game: &str) -> Vec<ScoreEntry> {
        let Some(store) = self.store.as_ref() else {
            return Vec::new();
        };
        store.top(game).unwrap_or_else(|e| {
            tracing::warn!("Failed to read {} scores: {}", game, e);
            Vec::new()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_store() -> ScoreStore {
        ScoreStore::open(":memory:").expect("Failed to create in-memory store")
    }

    fn entry(summary: &str, outcome: Outcome, captures: u32, plies: u32) -> ScoreEntry {
        ScoreEntry::new(
            summary,
            ScoreCounters {
                outcome,
                captures,
                plies,
            },
        )
    }

    #[test]
    fn score_formula() {
        let counters = |outcome, captures, plies| ScoreCounters {
            outcome,
            captures,
            plies,
        };
        assert_eq!(counters(Outcome::Win, 3, 40).score(), 90);
        assert_eq!(counters(Outcome::Draw, 0, 20).score(), 30);
        assert_eq!(counters(Outcome::Loss, 1, 5).score(), 5);
        assert_eq!(counters(Outcome::Loss, 0, 80).score(), 0);
    }

    #[test]
    fn open_creates_table() {
        let store = create_test_store();
        let count: i32 = store
            .conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='scores'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn lists_are_sorted_and_kept_per_game() {
        let mut store = create_test_store();
        store.record("chess", &entry("low", Outcome::Loss, 1, 2)).unwrap();
        store.record("chess", &entry("high", Outcome::Win, 0, 10)).unwrap();
        store.record("checkers", &entry("other", Outcome::Draw, 0, 0)).unwrap();

        let chess = store.top("chess").unwrap();
        let summaries: Vec<_> = chess.iter().map(|e| e.summary.as_str()).collect();
        assert_eq!(summaries, ["high", "low"]);
        assert_eq!(chess[0].score, 90);
        assert_eq!(chess[0].counters.outcome, Outcome::Win);
        assert_eq!(store.top("checkers").unwrap().len(), 1);
        assert!(store.top("go").unwrap().is_empty());
    }

    #[test]
    fn eleventh_entry_drops_the_lowest() {
        let mut store = create_test_store();
        for plies in 0..10 {
            store
                .record("chess", &entry(&format!("game {plies}"), Outcome::Win, 0, plies))
                .unwrap();
        }
        // Scores are 100 down to 91; a 95 pushes out the 91.
        let list = store
            .record("chess", &entry("new", Outcome::Win, 0, 5))
            .unwrap();

        assert_eq!(list.len(), MAX_ENTRIES);
        assert!(list.windows(2).all(|w| w[0].score >= w[1].score));
        assert!(list.iter().all(|e| e.summary != "game 9"));
        assert_eq!(list.last().unwrap().score, 92);
    }

    #[test]
    fn ties_rank_newest_first() {
        let mut store = create_test_store();
        store.record("chess", &entry("first", Outcome::Draw, 0, 0)).unwrap();
        let list = store
            .record("chess", &entry("second", Outcome::Draw, 0, 0))
            .unwrap();
        assert_eq!(list[0].summary, "second");
        assert_eq!(list[1].summary, "first");
    }

    #[test]
    fn timestamps_roundtrip() {
        let mut store = create_test_store();
        let e = entry("game", Outcome::Win, 2, 30);
        let list = store.record("checkers", &e).unwrap();
        assert_eq!(list[0].recorded_at.timestamp(), e.recorded_at.timestamp());
    }

    #[test]
    fn disabled_store_is_empty() {
        let mut scores = HighScores::disabled();
        assert!(!scores.is_enabled());
        assert!(scores.record("chess", &entry("x", Outcome::Win, 0, 0)).is_empty());
        assert!(scores.top("chess").is_empty());
    }

    #[test]
    fn unopenable_store_is_disabled() {
        let scores = HighScores::open("/dev/null/scores.db");
        assert!(!scores.is_enabled());
    }

    #[test]
    fn in_memory_store_records() {
        let mut scores = HighScores::in_memory();
        assert!(scores.is_enabled());
        let list = scores.record("chess", &entry("x", Outcome::Win, 1, 1));
        assert_eq!(list.len(), 1);
        assert_eq!(scores.top("chess")[0].score, 109);
    }
}
