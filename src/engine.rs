//! Engine state management.
//!
//! Holds the configuration, the search engine and the fallback RNG, and runs
//! one AI decision per call against live collaborators: build a snapshot,
//! enumerate candidates, search, and map the answer back to live objects.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use crate::board::{GameState, Team, Tile, TileEffectSnapshot, UnitEffectSnapshot, UnitSnapshot};
use crate::builder::{LiveBoard, LiveUnit, Roster, StateBuilder};
use crate::config::EngineConfig;
use crate::eval::EvalBreakdown;
use crate::movegen::{legal_moves, side_moves, Move};
use crate::search::SearchEngine;
use crate::select::{
    resolve_unit, select_buff, select_spawn, select_tile_effect, Decision, SelectError, UnitTemplate,
};

/// A unit move chosen for the Boss, resolved to its live unit.
#[derive(Debug, PartialEq)]
pub struct MoveChoice<'a, U> {
    pub unit: &'a U,
    pub from: Tile,
    pub to: Tile,
    pub capture: bool,
}

/// Runs Boss decisions.
pub struct Engine {
    config: EngineConfig,
    search: SearchEngine,
    rng: SmallRng,
}

impl Engine {
    /// Creates an engine. The RNG is seeded from `config.seed` when set.
    pub fn new(config: EngineConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Engine {
            search: SearchEngine::new(config.eval.clone(), config.ordering.clone()),
            config,
            rng,
        }
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Static evaluation of `state`, component by component.
    pub fn breakdown(&self, state: &GameState) -> EvalBreakdown {
        self.search.evaluator().breakdown(state)
    }

    /// Searched score of `state` for the Boss at the configured depth.
    pub fn score(&mut self, state: &GameState) -> f32 {
        self.search.evaluate(state, self.config.depth, Team::Boss)
    }

    /// Chooses the back-row tile for a spawn card.
    pub fn choose_spawn<B, U>(
        &mut self,
        board: &B,
        units: &[U],
        template: &UnitTemplate,
    ) -> Result<Decision<Tile>, SelectError>
    where
        B: LiveBoard + ?Sized,
        U: LiveUnit,
    {
        let snapshot = StateBuilder::build(board, units);
        let root = snapshot.as_ref().map(|s| &s.state);
        let result = select_spawn(&mut self.search, &mut self.rng, board, root, template, self.config.depth);
        log_outcome("spawn", &result);
        result
    }

    /// Chooses the Boss unit that receives a buff card.
    pub fn choose_buff_target<'a, B, U>(
        &mut self,
        board: &B,
        units: &'a [U],
        effect: &UnitEffectSnapshot,
    ) -> Result<Decision<&'a U>, SelectError>
    where
        B: LiveBoard + ?Sized,
        U: LiveUnit,
    {
        let result = match StateBuilder::build(board, units) {
            Some(snapshot) => select_buff(
                &mut self.search,
                &mut self.rng,
                &snapshot.roster,
                Some(&snapshot.state),
                effect,
                self.config.effect_cap,
                self.config.depth,
            ),
            None => select_buff(
                &mut self.search,
                &mut self.rng,
                &Roster::of(units),
                None,
                effect,
                self.config.effect_cap,
                self.config.depth,
            ),
        };
        log_outcome("buff", &result);
        result
    }

    /// Chooses the tile for a tile-effect card.
    pub fn choose_tile_effect<B, U>(
        &mut self,
        board: &B,
        units: &[U],
        effect: &TileEffectSnapshot,
    ) -> Result<Decision<Tile>, SelectError>
    where
        B: LiveBoard + ?Sized,
        U: LiveUnit,
    {
        let snapshot = StateBuilder::build(board, units);
        let root = snapshot.as_ref().map(|s| &s.state);
        let result = select_tile_effect(&mut self.search, &mut self.rng, board, root, effect, self.config.depth);
        log_outcome("tile_effect", &result);
        result
    }

    /// Chooses the Boss's unit move for this turn.
    ///
    /// Requires a positive depth. Falls back to a random legal move when the
    /// snapshot cannot be built.
    pub fn choose_move<'a, B, U>(
        &mut self,
        board: &B,
        units: &'a [U],
    ) -> Result<Decision<MoveChoice<'a, U>>, SelectError>
    where
        B: LiveBoard + ?Sized,
        U: LiveUnit,
    {
        let depth = self.config.depth;
        if depth <= 0 {
            return Err(SelectError::InvalidInput(format!("move search needs a positive depth, got {depth}")));
        }

        let result = match StateBuilder::build(board, units) {
            Some(snapshot) => {
                let moves = side_moves(&snapshot.state, Team::Boss);
                let decision = match moves.as_slice() {
                    [] => Err(SelectError::NoValidTarget),
                    [only] => Ok(Decision::Single(*only)),
                    _ => match self.search.best_move(&snapshot.state, depth, Team::Boss) {
                        Some(best) => Ok(Decision::Searched {
                            target: best.mv,
                            score: best.score,
                        }),
                        None => Err(SelectError::NoValidTarget),
                    },
                };
                decision.and_then(|d| d.try_map(|mv| to_choice(&snapshot.roster, mv)))
            }
            None => {
                warn!("snapshot unavailable, choosing a random move");
                let roster = Roster::of(units);
                let moves = live_moves(board, &roster);
                if moves.is_empty() {
                    Err(SelectError::NoValidTarget)
                } else {
                    let mv = moves[self.rng.gen_range(0..moves.len())];
                    to_choice(&roster, mv).map(Decision::Random)
                }
            }
        };
        log_outcome("move", &result);
        result
    }
}

fn to_choice<'a, U: LiveUnit>(roster: &Roster<'a, U>, mv: Move) -> Result<MoveChoice<'a, U>, SelectError> {
    Ok(MoveChoice {
        unit: resolve_unit(roster, mv.unit)?,
        from: mv.from,
        to: mv.to,
        capture: mv.capture,
    })
}

/// Legal Boss moves read straight off the live board.
fn live_moves<B, U>(board: &B, roster: &Roster<'_, U>) -> Vec<Move>
where
    B: LiveBoard + ?Sized,
    U: LiveUnit,
{
    let mut moves = Vec::new();
    for (id, unit) in roster.iter() {
        let Some(from) = unit.position() else { continue };
        if unit.team() != Team::Boss {
            continue;
        }
        let proxy = UnitSnapshot::new(id, unit.team(), unit.kind(), from);
        for to in legal_moves(board, &proxy, unit.kind().movement()) {
            moves.push(Move {
                unit: id,
                from,
                to,
                capture: board.occupant(to).is_some(),
            });
        }
    }
    moves
}

fn log_outcome<T>(action: &str, result: &Result<Decision<T>, SelectError>) {
    match result {
        Ok(Decision::Single(_)) => info!(action, outcome = "single", "decision made"),
        Ok(Decision::Searched { score, .. }) => info!(action, outcome = "searched", score, "decision made"),
        Ok(Decision::Random(_)) => info!(action, outcome = "random", "decision made"),
        Ok(Decision::Declined { best_score, baseline }) => {
            info!(action, outcome = "declined", best_score, baseline, "decision made")
        }
        Err(e) => info!(action, error = %e, "no decision"),
    }
}
