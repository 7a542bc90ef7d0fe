//! Board representation and snapshot types.
//!
//! Contains the immutable snapshot model the search runs on: tiles, units,
//! effects, movement rule data, and the overall game state.

pub mod effect;
pub mod movement;
pub mod occupancy;
pub mod state;
pub mod tile;
pub mod unit;

pub use effect::{DurationKind, EffectId, StatLayer, TileEffectSnapshot, UnitEffectSnapshot};
pub use movement::{MovementDefinition, MovementRule};
pub use occupancy::{Occupancy, Occupant};
pub use state::GameState;
pub use tile::{Team, Tile};
pub use unit::{BaseStats, UnitId, UnitKind, UnitSnapshot, ALL_KINDS};
