//! Card target selection.
//!
//! Every selector runs the same pipeline: enumerate candidates, short-circuit
//! on zero or one, fall back to a random pick when no search is possible,
//! otherwise score one successor per candidate and keep the best, declining
//! when nothing beats the current position.

pub mod buff;
pub mod spawn;
pub mod tile_effect;

pub use buff::{buff_candidates, select_buff};
pub use spawn::{select_spawn, spawn_candidates, UnitTemplate};
pub use tile_effect::{select_tile_effect, tile_effect_candidates};

use rand::rngs::SmallRng;
use rand::Rng;
use tracing::{debug, error};

use crate::board::{GameState, Team, UnitId};
use crate::builder::{LiveUnit, Roster};
use crate::search::SearchEngine;

/// Errors a selector reports instead of a decision.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SelectError {
    #[error("no valid target")]
    NoValidTarget,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unit id {id} is outside the roster of {roster_len} units")]
    UnknownUnit { id: u16, roster_len: usize },
}

/// Outcome of a selector.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision<T> {
    /// The only candidate; no search ran.
    Single(T),
    /// The best-scoring candidate.
    Searched { target: T, score: f32 },
    /// Picked uniformly at random because no search was possible.
    Random(T),
    /// No candidate improves on the current position.
    Declined { best_score: f32, baseline: f32 },
}

impl<T> Decision<T> {
    /// The chosen target, if the selector did not decline.
    pub fn target(&self) -> Option<&T> {
        match self {
            Decision::Single(t) | Decision::Random(t) => Some(t),
            Decision::Searched { target, .. } => Some(target),
            Decision::Declined { .. } => None,
        }
    }

    /// Transforms the target, keeping the outcome kind.
    pub fn map<V>(self, f: impl FnOnce(T) -> V) -> Decision<V> {
        match self {
            Decision::Single(t) => Decision::Single(f(t)),
            Decision::Searched { target, score } => Decision::Searched {
                target: f(target),
                score,
            },
            Decision::Random(t) => Decision::Random(f(t)),
            Decision::Declined { best_score, baseline } => Decision::Declined { best_score, baseline },
        }
    }

    /// Like `map`, for mappings that can fail.
    pub fn try_map<V, E>(self, f: impl FnOnce(T) -> Result<V, E>) -> Result<Decision<V>, E> {
        Ok(match self {
            Decision::Single(t) => Decision::Single(f(t)?),
            Decision::Searched { target, score } => Decision::Searched {
                target: f(target)?,
                score,
            },
            Decision::Random(t) => Decision::Random(f(t)?),
            Decision::Declined { best_score, baseline } => Decision::Declined { best_score, baseline },
        })
    }
}

/// Runs the shared selection pipeline over `candidates`.
///
/// `root` is `None` when the state builder failed. `derive` produces the
/// successor state for one candidate.
pub fn select<T: Clone>(
    search: &mut SearchEngine,
    rng: &mut SmallRng,
    root: Option<&GameState>,
    mut candidates: Vec<T>,
    depth: i32,
    derive: impl Fn(&GameState, &T) -> GameState,
) -> Result<Decision<T>, SelectError> {
    match candidates.len() {
        0 => return Err(SelectError::NoValidTarget),
        1 => return Ok(Decision::Single(candidates.swap_remove(0))),
        _ => {}
    }

    let root = match root {
        Some(root) if depth > 0 => root,
        _ => {
            let i = rng.gen_range(0..candidates.len());
            debug!(candidates = candidates.len(), pick = i, depth, "falling back to random choice");
            return Ok(Decision::Random(candidates.swap_remove(i)));
        }
    };

    let baseline = search.evaluate(root, depth, Team::Boss);
    let mut best: Option<(usize, f32)> = None;
    for (i, candidate) in candidates.iter().enumerate() {
        let successor = derive(root, candidate);
        let score = search.evaluate(&successor, depth, Team::Boss);
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((i, score));
        }
    }

    let Some((i, score)) = best else {
        return Err(SelectError::NoValidTarget);
    };
    debug!(candidates = candidates.len(), best = i, score, baseline, "candidates scored");
    if score > baseline {
        Ok(Decision::Searched {
            target: candidates.swap_remove(i),
            score,
        })
    } else {
        Ok(Decision::Declined {
            best_score: score,
            baseline,
        })
    }
}

/// Maps a snapshot id back to its live unit, logging inconsistencies.
pub fn resolve_unit<'a, U: LiveUnit>(
    roster: &Roster<'a, U>,
    id: UnitId,
) -> Result<&'a U, SelectError> {
    roster.get(id).ok_or_else(|| {
        error!(id = id.0, roster_len = roster.len(), "snapshot id has no live unit");
        SelectError::UnknownUnit {
            id: id.0,
            roster_len: roster.len(),
        }
    })
}
