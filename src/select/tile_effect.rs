//! Tile effect placement.

use rand::rngs::SmallRng;

use crate::board::{DurationKind, GameState, Occupancy, Tile, TileEffectSnapshot};
use crate::search::SearchEngine;

use super::{select, Decision, SelectError};

/// Tiles that can take `effect`: any unblocked tile, and for effects that
/// occupy their tile, only empty ones.
pub fn tile_effect_candidates<O: Occupancy + ?Sized>(board: &O, effect: &TileEffectSnapshot) -> Vec<Tile> {
    board
        .tiles()
        .into_iter()
        .filter(|t| {
            if effect.occupies_tile {
                board.is_free(*t)
            } else {
                !board.is_blocked(*t)
            }
        })
        .collect()
}

/// Chooses where the Boss places `effect`.
pub fn select_tile_effect<O: Occupancy + ?Sized>(
    search: &mut SearchEngine,
    rng: &mut SmallRng,
    board: &O,
    root: Option<&GameState>,
    effect: &TileEffectSnapshot,
    depth: i32,
) -> Result<Decision<Tile>, SelectError> {
    if board.rows() == 0 || board.cols() == 0 {
        return Err(SelectError::InvalidInput("board has no tiles".into()));
    }
    if effect.duration == DurationKind::Temporary && effect.remaining <= 0 {
        return Err(SelectError::InvalidInput(format!(
            "tile effect {} lasts {} turns",
            effect.effect.0, effect.remaining
        )));
    }
    let candidates = tile_effect_candidates(board, effect);
    select(search, rng, root, candidates, depth, |state, tile| {
        let mut effects = state.tile_effects(*tile).to_vec();
        effects.push(*effect);
        state.with_tile_effects(*tile, effects)
    })
}
