//! End-of-turn bookkeeping.
//!
//! After a side finishes its ply, its units age: finite lifetimes count down,
//! temporary effects lose a turn, instant effects vanish. Tile effects age once
//! per round, after the Boss moves.

use crate::board::{GameState, Team, UnitSnapshot};

/// Returns the state after `team` ends its turn.
pub fn end_turn(state: &GameState, team: Team) -> GameState {
    let mut next = state.clone();

    let aged: Vec<UnitSnapshot> = state
        .units()
        .iter()
        .filter_map(|u| if u.team == team { u.tick() } else { Some(u.clone()) })
        .collect();
    if aged[..] != state.units()[..] {
        *next.units_mut() = aged;
    }

    if team == Team::Boss && state.has_tile_effects() {
        for effects in next.tile_effects_mut().iter_mut() {
            if effects.is_empty() {
                continue;
            }
            *effects = effects.iter().filter_map(|e| e.tick()).collect();
        }
    }

    next
}
