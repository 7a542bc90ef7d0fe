//! Move resolution.
//!
//! Derives successor states: applying one move, then aging the side that
//! just moved.

pub mod combat;
pub mod turn;

pub use combat::apply_move;
pub use turn::end_turn;

use crate::board::{GameState, Team};
use crate::movegen::Move;

/// Applies `mv` for `team` and ends that side's turn.
pub fn play(state: &GameState, mv: &Move, team: Team) -> GameState {
    end_turn(&apply_move(state, mv), team)
}
