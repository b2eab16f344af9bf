//! Random move selection.

use super::{Evaluate, Strategy};
use crate::rules::MoveOf;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Plays a uniformly random legal move, preferring captures.
///
/// When any capture is available the choice is restricted to captures.
#[derive(Debug, Clone)]
pub struct RandomStrategy {
    rng: StdRng,
}

impl RandomStrategy {
    pub fn new() -> Self {
        RandomStrategy {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a strategy with a reproducible sequence of choices.
    pub fn with_seed(seed: u64) -> Self {
        RandomStrategy {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Evaluate> Strategy<R> for RandomStrategy {
    fn select_move(&mut self, rules: &R, position: &R::Position) -> Option<MoveOf<R>> {
        let moves = rules.generate_moves(position).into_vec();
        let captures: Vec<&MoveOf<R>> = moves.iter().filter(|m| m.is_capture()).collect();
        if !captures.is_empty() {
            return captures.choose(&mut self.rng).map(|m| (*m).clone());
        }
        moves.choose(&mut self.rng).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chess::{ChessPosition, StandardChess};
    use crate::rules::RuleSet;
    use board_core::Square;

    #[test]
    fn picks_a_legal_move() {
        let mut strategy = RandomStrategy::with_seed(7);
        let pos = StandardChess.initial_position();
        for _ in 0..20 {
            let m = strategy.select_move(&StandardChess, &pos).unwrap();
            assert!(StandardChess.is_legal(&pos, &m));
        }
    }

    #[test]
    fn prefers_captures() {
        let pos = ChessPosition::from_fen("4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1").unwrap();
        let mut strategy = RandomStrategy::with_seed(1);
        for _ in 0..20 {
            let m = strategy.select_move(&StandardChess, &pos).unwrap();
            assert_eq!(m.to, Square::from_algebraic("d5").unwrap());
        }
    }

    #[test]
    fn no_moves_gives_none() {
        let pos = ChessPosition::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        let mut strategy = RandomStrategy::with_seed(3);
        assert!(strategy.select_move(&StandardChess, &pos).is_none());
    }
}
