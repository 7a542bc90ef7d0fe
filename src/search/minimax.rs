//! Depth-limited alpha-beta minimax over unit moves.
//!
//! The side handed to the search moves first and maximizes; the opponent
//! minimizes. Depth is the only bound. Successors are derived from immutable
//! snapshots, so the input state is never touched.

use tracing::debug;

use crate::board::{GameState, Team};
use crate::eval::{EvalWeights, Evaluator};
use crate::movegen::{side_moves, Move};
use crate::resolve::play;

use super::ordering::{order_moves, KillerMove, KillerTable, OrderingWeights};

/// Counters for one search call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub leaves: u64,
    pub cutoffs: u64,
}

/// Result of a root search: the best move and its score.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub mv: Move,
    pub score: f32,
    pub stats: SearchStats,
}

/// Minimax engine. Owns the evaluator, the ordering weights and the killer
/// table, which is reset on every call.
#[derive(Debug, Clone, Default)]
pub struct SearchEngine {
    evaluator: Evaluator,
    ordering: OrderingWeights,
    killers: KillerTable,
    stats: SearchStats,
}

impl SearchEngine {
    /// Creates an engine with the given evaluation and ordering weights.
    pub fn new(eval: EvalWeights, ordering: OrderingWeights) -> Self {
        SearchEngine {
            evaluator: Evaluator::new(eval),
            ordering,
            killers: KillerTable::new(),
            stats: SearchStats::default(),
        }
    }

    /// Returns the static evaluator used at the leaves.
    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// Killer moves left by the most recent call.
    pub(crate) fn killers(&self) -> &KillerTable {
        &self.killers
    }

    /// Statistics of the most recent call.
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    fn reset(&mut self) {
        self.killers.clear();
        self.stats = SearchStats::default();
    }

    /// Scores `state` from `side`'s perspective with `side` to move.
    ///
    /// `depth <= 0` is exactly the static evaluation.
    pub fn evaluate(&mut self, state: &GameState, depth: i32, side: Team) -> f32 {
        self.reset();
        let score = self.alpha_beta(state, depth, f32::NEG_INFINITY, f32::INFINITY, side, side);
        debug!(
            depth,
            ?side,
            score,
            nodes = self.stats.nodes,
            cutoffs = self.stats.cutoffs,
            "evaluate finished"
        );
        score
    }

    /// Searches the root and returns the arg-max move for `side`.
    ///
    /// Returns `None` when `depth <= 0` or `side` has no legal move.
    pub fn best_move(&mut self, state: &GameState, depth: i32, side: Team) -> Option<SearchResult> {
        self.reset();
        if depth <= 0 {
            return None;
        }
        self.stats.nodes += 1;

        let mut moves = side_moves(state, side);
        order_moves(state, &mut moves, side, depth as usize, &self.killers, &self.ordering);

        let mut alpha = f32::NEG_INFINITY;
        let mut best: Option<(Move, f32)> = None;
        for mv in moves {
            let child = play(state, &mv, side);
            let score = self.alpha_beta(&child, depth - 1, alpha, f32::INFINITY, side.opponent(), side);
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((mv, score));
            }
            alpha = alpha.max(score);
        }

        let (mv, score) = best?;
        debug!(
            depth,
            ?side,
            from = %mv.from,
            to = %mv.to,
            score,
            nodes = self.stats.nodes,
            leaves = self.stats.leaves,
            cutoffs = self.stats.cutoffs,
            "best move found"
        );
        Some(SearchResult {
            mv,
            score,
            stats: self.stats,
        })
    }

    fn alpha_beta(
        &mut self,
        state: &GameState,
        depth: i32,
        mut alpha: f32,
        mut beta: f32,
        to_move: Team,
        maximizer: Team,
    ) -> f32 {
        self.stats.nodes += 1;
        if depth <= 0 || state.player_hp() <= 0 {
            self.stats.leaves += 1;
            return self.evaluator.evaluate_for(state, maximizer);
        }

        let mut moves = side_moves(state, to_move);
        if moves.is_empty() {
            self.stats.leaves += 1;
            return self.evaluator.evaluate_for(state, maximizer);
        }
        let ply = depth as usize;
        order_moves(state, &mut moves, to_move, ply, &self.killers, &self.ordering);

        let maximizing = to_move == maximizer;
        let mut best = if maximizing {
            f32::NEG_INFINITY
        } else {
            f32::INFINITY
        };

        for mv in &moves {
            let child = play(state, mv, to_move);
            let score = self.alpha_beta(&child, depth - 1, alpha, beta, to_move.opponent(), maximizer);
            if maximizing {
                best = best.max(score);
                alpha = alpha.max(score);
            } else {
                best = best.min(score);
                beta = beta.min(score);
            }
            if alpha >= beta {
                self.stats.cutoffs += 1;
                let relative = if maximizing { score } else { -score };
                self.killers.record(ply, KillerMove::from(mv), relative);
                break;
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Tile, UnitId, UnitKind, UnitSnapshot};

    fn engine() -> SearchEngine {
        SearchEngine::new(EvalWeights::default(), OrderingWeights::default())
    }

    fn skirmish() -> GameState {
        GameState::new(6, 6, 10)
            .with_unit(UnitSnapshot::new(UnitId(0), Team::Boss, UnitKind::Rook, Tile::new(5, 0)))
            .with_unit(UnitSnapshot::new(UnitId(1), Team::Boss, UnitKind::Knight, Tile::new(4, 3)))
            .with_unit(UnitSnapshot::new(UnitId(2), Team::Player, UnitKind::Pawn, Tile::new(2, 3)))
            .with_unit(UnitSnapshot::new(UnitId(3), Team::Player, UnitKind::Bishop, Tile::new(1, 1)))
    }

    #[test]
    fn depth_zero_is_static_eval() {
        let state = skirmish();
        let mut e = engine();
        let eval = Evaluator::default();
        assert_eq!(e.evaluate(&state, 0, Team::Boss), eval.evaluate_for(&state, Team::Boss));
        assert_eq!(e.evaluate(&state, 0, Team::Player), eval.evaluate_for(&state, Team::Player));
        assert_eq!(e.evaluate(&state, -3, Team::Boss), eval.evaluate_for(&state, Team::Boss));
        assert_eq!(e.stats().nodes, 1);
    }

    #[test]
    fn search_does_not_mutate_input() {
        let state = skirmish();
        let before = state.clone();
        let mut e = engine();
        e.evaluate(&state, 3, Team::Boss);
        e.best_move(&state, 2, Team::Player);
        assert_eq!(state, before);
    }

    #[test]
    fn depth_one_takes_free_material() {
        // The rook can take an undefended queen along row 5.
        let state = GameState::new(6, 6, 10)
            .with_unit(UnitSnapshot::new(UnitId(0), Team::Boss, UnitKind::Rook, Tile::new(5, 0)))
            .with_unit(UnitSnapshot::new(UnitId(1), Team::Player, UnitKind::Queen, Tile::new(5, 4)));
        let mut e = engine();
        let mut weakened = UnitSnapshot::new(UnitId(1), Team::Player, UnitKind::Queen, Tile::new(5, 4));
        weakened.health = 1;
        let state = state.with_unit_replaced(weakened);

        let best = e.best_move(&state, 1, Team::Boss).unwrap();
        assert_eq!(best.mv.to, Tile::new(5, 4));
        assert!(best.mv.capture);
    }

    #[test]
    fn best_move_score_matches_evaluate() {
        let state = skirmish();
        let mut e = engine();
        let best = e.best_move(&state, 2, Team::Boss).unwrap();
        let score = e.evaluate(&state, 2, Team::Boss);
        assert!((best.score - score).abs() < 1e-4);
    }

    #[test]
    fn pruning_cuts_nodes() {
        let state = skirmish();
        let mut e = engine();
        e.evaluate(&state, 3, Team::Boss);
        assert!(e.stats().cutoffs > 0);
    }

    #[test]
    fn cutoff_move_becomes_killer_until_next_call() {
        let state = skirmish();
        let mut e = engine();

        let mut moves = side_moves(&state, Team::Boss);
        order_moves(&state, &mut moves, Team::Boss, 1, &KillerTable::new(), &OrderingWeights::default());
        let first = KillerMove::from(&moves[0]);

        // A window closed from above fails high on the first move searched.
        e.reset();
        e.alpha_beta(&state, 1, f32::NEG_INFINITY, f32::NEG_INFINITY, Team::Boss, Team::Boss);
        assert_eq!(e.stats().cutoffs, 1);
        assert_eq!(e.killers().slot(1, first), Some(1));

        e.evaluate(&state, 0, Team::Boss);
        assert_eq!(e.killers().slot(1, first), None);
    }

    #[test]
    fn repeated_calls_are_deterministic() {
        let state = skirmish();
        let mut e = engine();
        let a = e.evaluate(&state, 3, Team::Boss);
        let nodes = e.stats().nodes;
        let b = e.evaluate(&state, 3, Team::Boss);
        assert_eq!(a, b);
        // Killer tables reset, so the second call walks the same tree.
        assert_eq!(e.stats().nodes, nodes);
    }

    #[test]
    fn no_moves_is_static() {
        let state = GameState::new(4, 4, 10).with_unit(UnitSnapshot::new(
            UnitId(0),
            Team::Boss,
            UnitKind::Rook,
            Tile::new(3, 3),
        ));
        let mut e = engine();
        let eval = Evaluator::default();
        // The Player has nothing to move.
        assert_eq!(e.evaluate(&state, 4, Team::Player), eval.evaluate_for(&state, Team::Player));
        assert!(e.best_move(&state, 2, Team::Player).is_none());
        assert!(e.best_move(&state, 0, Team::Boss).is_none());
    }
}
