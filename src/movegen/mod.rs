//! Legal move generation.
//!
//! Wraps the movement resolver into whole-side move lists: every unit of a
//! side paired with each tile it may move to.

pub mod movement;

pub use movement::{legal_moves, threatens};

use crate::board::{GameState, Occupancy, Team, Tile, UnitId, UnitSnapshot};

/// One unit relocating (or attacking) during a ply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub unit: UnitId,
    pub from: Tile,
    pub to: Tile,
    /// The destination holds an enemy unit.
    pub capture: bool,
}

/// Generates every legal move for one unit. Units off the board have none.
pub fn unit_moves(state: &GameState, unit: &UnitSnapshot) -> Vec<Move> {
    let Some(from) = unit.position else {
        return Vec::new();
    };
    legal_moves(state, unit, unit.kind.movement())
        .into_iter()
        .map(|to| Move {
            unit: unit.id,
            from,
            to,
            capture: state.occupant(to).is_some(),
        })
        .collect()
}

/// Generates every legal move for every placed unit of `team`.
pub fn side_moves(state: &GameState, team: Team) -> Vec<Move> {
    state
        .units_of(team)
        .filter(|u| u.position.is_some())
        .flat_map(|u| unit_moves(state, u))
        .collect()
}

/// Number of legal moves available to `team`.
pub fn mobility(state: &GameState, team: Team) -> usize {
    state
        .units_of(team)
        .filter(|u| u.position.is_some())
        .map(|u| legal_moves(state, u, u.kind.movement()).len())
        .sum()
}
