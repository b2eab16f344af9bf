//! Minimax with alpha-beta pruning.
//!
//! The search is plain fixed-depth minimax. Whether a node maximizes is
//! decided by whose turn it is rather than by ply parity, so a checkers
//! capture chain that keeps the same side on move stays on the same side
//! of the tree.

use super::eval::evaluate;
use super::{Evaluate, Strategy};
use crate::rules::{GamePosition, GameResult, MoveOf};
use board_core::Side;

/// Score of a won terminal position, before the ply adjustment.
const WIN_SCORE: f64 = 100_000.0;

/// Fixed-depth alpha-beta search.
#[derive(Debug, Clone)]
pub struct MinimaxStrategy {
    depth: u8,
}

impl MinimaxStrategy {
    pub fn new(depth: u8) -> Self {
        MinimaxStrategy {
            depth: depth.max(1),
        }
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn set_depth(&mut self, depth: u8) {
        self.depth = depth.max(1);
    }
}

/// Search state
struct Searcher<'a, R: Evaluate> {
    rules: &'a R,
    root: Side,
    nodes: u64,
}

impl<R: Evaluate> Searcher<'_, R> {
    fn terminal_score(&self, result: GameResult, ply: u32) -> f64 {
        match result.winner() {
            // Shorter wins score higher, longer losses score higher.
            Some(winner) if winner == self.root => WIN_SCORE - ply as f64,
            Some(_) => -(WIN_SCORE - ply as f64),
            None => 0.0,
        }
    }

    fn alpha_beta(
        &mut self,
        position: &R::Position,
        depth: u8,
        mut alpha: f64,
        mut beta: f64,
        ply: u32,
    ) -> f64 {
        self.nodes += 1;

        let moves = ordered_moves(self.rules, position);
        if moves.is_empty() {
            return match self.rules.game_result(position) {
                Some(result) => self.terminal_score(result, ply),
                None => 0.0,
            };
        }
        if self.rules.is_insufficient_material(position) {
            return 0.0;
        }
        if depth == 0 {
            return evaluate(self.rules, position, self.root);
        }

        let maximizing = position.side_to_move() == self.root;
        let mut best = if maximizing {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };

        for m in &moves {
            let child = self.rules.make_move(position, m);
            let score = self.alpha_beta(&child, depth - 1, alpha, beta, ply + 1);
            if maximizing {
                best = best.max(score);
                alpha = alpha.max(best);
            } else {
                best = best.min(score);
                beta = beta.min(best);
            }
            if alpha >= beta {
                break;
            }
        }
        best
    }
}

/// Legal moves with captures first, generation order kept otherwise.
fn ordered_moves<R: Evaluate>(rules: &R, position: &R::Position) -> Vec<MoveOf<R>> {
    let mut moves = rules.generate_moves(position).into_vec();
    moves.sort_by_key(|m| !m.is_capture());
    moves
}

impl<R: Evaluate> Strategy<R> for MinimaxStrategy {
    fn select_move(&mut self, rules: &R, position: &R::Position) -> Option<MoveOf<R>> {
        let root = position.side_to_move();
        let mut searcher = Searcher {
            rules,
            root,
            nodes: 0,
        };

        let mut alpha = f64::NEG_INFINITY;
        let mut best: Option<(f64, MoveOf<R>)> = None;
        for m in ordered_moves(rules, position) {
            let child = rules.make_move(position, &m);
            let score = searcher.alpha_beta(&child, self.depth - 1, alpha, f64::INFINITY, 1);
            if best.as_ref().map_or(true, |(b, _)| score > *b) {
                alpha = alpha.max(score);
                best = Some((score, m));
            }
        }

        if let Some((score, m)) = &best {
            tracing::trace!(
                game = rules.name(),
                depth = self.depth,
                nodes = searcher.nodes,
                score,
                best = %m,
                "search finished"
            );
        }
        best.map(|(_, m)| m)
    }
}
