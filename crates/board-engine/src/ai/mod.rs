//! Computer opponents.
//!
//! Three strategies implement [`Strategy`]: [`RandomStrategy`] (easy),
//! [`HeuristicStrategy`] (medium) and [`MinimaxStrategy`] (hard). [`Ai`]
//! dispatches to one of them by [`Difficulty`].

mod eval;
mod heuristic;
mod minimax;
mod random;

pub use eval::{captured_value, chess_value, evaluate, Evaluate};
pub use heuristic::HeuristicStrategy;
pub use minimax::MinimaxStrategy;
pub use random::RandomStrategy;

use crate::rules::MoveOf;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Search depth used by the hard opponent unless configured otherwise.
pub const DEFAULT_SEARCH_DEPTH: u8 = 3;

/// Picks a move for the side to move.
pub trait Strategy<R: Evaluate> {
    /// Returns `None` only when the side to move has no legal move.
    fn select_move(&mut self, rules: &R, position: &R::Position) -> Option<MoveOf<R>>;
}

/// Opponent strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Easy -> Medium -> Hard -> Easy.
    pub const fn next(self) -> Difficulty {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown difficulty: {0} (expected easy, medium or hard)")]
pub struct ParseDifficultyError(String);

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseDifficultyError(s.to_string()))
    }
}

/// A computer player with a switchable difficulty.
///
/// A difficulty change applies from the next call to [`Ai::select_move`].
#[derive(Debug, Clone)]
pub struct Ai {
    difficulty: Difficulty,
    random: RandomStrategy,
    heuristic: HeuristicStrategy,
    minimax: MinimaxStrategy,
}

impl Ai {
    pub fn new(difficulty: Difficulty) -> Self {
        Ai {
            difficulty,
            random: RandomStrategy::new(),
            heuristic: HeuristicStrategy::new(),
            minimax: MinimaxStrategy::new(DEFAULT_SEARCH_DEPTH),
        }
    }

    /// Creates an opponent whose random choices are reproducible.
    pub fn with_seed(difficulty: Difficulty, seed: u64) -> Self {
        Ai {
            difficulty,
            random: RandomStrategy::with_seed(seed),
            heuristic: HeuristicStrategy::with_seed(seed.wrapping_add(1)),
            minimax: MinimaxStrategy::new(DEFAULT_SEARCH_DEPTH),
        }
    }

    pub fn with_search_depth(mut self, depth: u8) -> Self {
        self.minimax.set_depth(depth);
        self
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }

    /// Advances to the next difficulty and returns it.
    pub fn cycle_difficulty(&mut self) -> Difficulty {
        self.difficulty = self.difficulty.next();
        self.difficulty
    }

    pub fn search_depth(&self) -> u8 {
        self.minimax.depth()
    }

    /// Selects a move for the side to move at the current difficulty.
    pub fn select_move<R: Evaluate>(
        &mut self,
        rules: &R,
        position: &R::Position,
    ) -> Option<MoveOf<R>> {
        match self.difficulty {
            Difficulty::Easy => self.random.select_move(rules, position),
            Difficulty::Medium => self.heuristic.select_move(rules, position),
            Difficulty::Hard => self.minimax.select_move(rules, position),
        }
    }

    /// Selects a move with the easy strategy regardless of difficulty.
    pub fn fallback_move<R: Evaluate>(
        &mut self,
        rules: &R,
        position: &R::Position,
    ) -> Option<MoveOf<R>> {
        self.random.select_move(rules, position)
    }
}

impl Default for Ai {
    fn default() -> Self {
        Self::new(Difficulty::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkers::Checkers;
    use crate::chess::StandardChess;
    use crate::rules::RuleSet;

    #[test]
    fn difficulty_cycles() {
        let mut ai = Ai::with_seed(Difficulty::Easy, 0);
        assert_eq!(ai.cycle_difficulty(), Difficulty::Medium);
        assert_eq!(ai.cycle_difficulty(), Difficulty::Hard);
        assert_eq!(ai.cycle_difficulty(), Difficulty::Easy);
    }

    #[test]
    fn difficulty_parses_and_displays() {
        for d in Difficulty::ALL {
            assert_eq!(d.to_string().parse::<Difficulty>(), Ok(d));
        }
        assert_eq!("HARD".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert!("expert".parse::<Difficulty>().is_err());
        assert_eq!(Difficulty::default(), Difficulty::Medium);
    }

    #[test]
    fn difficulty_serializes_lowercase() {
        let json = serde_json::to_string(&Difficulty::Hard).unwrap();
        assert_eq!(json, "\"hard\"");
        let back: Difficulty = serde_json::from_str("\"easy\"").unwrap();
        assert_eq!(back, Difficulty::Easy);
    }

    #[test]
    fn every_difficulty_plays_legal_moves() {
        for d in Difficulty::ALL {
            let mut ai = Ai::with_seed(d, 11).with_search_depth(2);
            let chess = StandardChess.initial_position();
            let m = ai.select_move(&StandardChess, &chess).unwrap();
            assert!(StandardChess.is_legal(&chess, &m));

            let checkers = Checkers.initial_position();
            let m = ai.select_move(&Checkers, &checkers).unwrap();
            assert!(Checkers.is_legal(&checkers, &m));
        }
    }

    #[test]
    fn fallback_ignores_difficulty() {
        let mut ai = Ai::with_seed(Difficulty::Hard, 4);
        let pos = StandardChess.initial_position();
        let m = ai.fallback_move(&StandardChess, &pos).unwrap();
        assert!(StandardChess.is_legal(&pos, &m));
        assert_eq!(ai.search_depth(), DEFAULT_SEARCH_DEPTH);
    }
}
