//! One-ply heuristic move selection.

use super::eval::captured_value;
use super::{Evaluate, Strategy};
use crate::rules::MoveOf;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Scores every legal move once and plays the best.
///
/// Score = captured value x 10 + centrality of the destination x 0.5 +
/// the game's move bonus + a random jitter in `[0, 2)`. Ties keep the move
/// generated first.
#[derive(Debug, Clone)]
pub struct HeuristicStrategy {
    rng: StdRng,
}

impl HeuristicStrategy {
    pub fn new() -> Self {
        HeuristicStrategy {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        HeuristicStrategy {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// The deterministic part of a move's score.
    pub fn base_score<R: Evaluate>(rules: &R, position: &R::Position, m: &MoveOf<R>) -> f64 {
        captured_value(rules, position, m) * 10.0
            + (7.0 - m.to.center_distance()) * 0.5
            + rules.move_bonus(position, m)
    }
}

impl Default for HeuristicStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Evaluate> Strategy<R> for HeuristicStrategy {
    fn select_move(&mut self, rules: &R, position: &R::Position) -> Option<MoveOf<R>> {
        let mut best: Option<(f64, MoveOf<R>)> = None;
        for m in rules.generate_moves(position) {
            let score = Self::base_score(rules, position, &m) + self.rng.gen::<f64>() * 2.0;
            if best.as_ref().map_or(true, |(b, _)| score > *b) {
                best = Some((score, m));
            }
        }
        best.map(|(_, m)| m)
    }
}
