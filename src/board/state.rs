//! Game state snapshot.
//!
//! Holds the complete board at one point in a simulation: dimensions, player
//! health, every unit, and every tile effect. Nothing references live game
//! objects.
//!
//! Design: units and tile effects sit behind `Arc`, so cloning a state is two
//! reference-count bumps. Every `with_*` method returns a new state and copies
//! only the part it changes (`Arc::make_mut`); the receiver is never touched.

use std::sync::Arc;

use super::effect::TileEffectSnapshot;
use super::occupancy::{Occupancy, Occupant};
use super::tile::{Team, Tile};
use super::unit::{UnitId, UnitSnapshot};

/// Complete board state at a point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    rows: u8,
    cols: u8,
    player_hp: i32,
    /// Lowest id never handed out in this simulation tree.
    next_id: u16,
    units: Arc<Vec<UnitSnapshot>>,
    /// Effects per tile, row-major.
    tile_effects: Arc<Vec<Vec<TileEffectSnapshot>>>,
}

impl GameState {
    /// Creates an empty board with no units or tile effects.
    pub fn new(rows: u8, cols: u8, player_hp: i32) -> Self {
        GameState {
            rows,
            cols,
            player_hp,
            next_id: 0,
            units: Arc::new(Vec::new()),
            tile_effects: Arc::new(vec![Vec::new(); rows as usize * cols as usize]),
        }
    }

    /// Returns the player's remaining health.
    pub fn player_hp(&self) -> i32 {
        self.player_hp
    }

    /// All units in id order of insertion.
    pub fn units(&self) -> &[UnitSnapshot] {
        &self.units
    }

    /// Units belonging to `team`.
    pub fn units_of(&self, team: Team) -> impl Iterator<Item = &UnitSnapshot> {
        self.units.iter().filter(move |u| u.team == team)
    }

    /// Looks up a unit by id.
    pub fn unit(&self, id: UnitId) -> Option<&UnitSnapshot> {
        self.units.iter().find(|u| u.id == id)
    }

    /// The unit standing on `tile`, if any.
    pub fn unit_at(&self, tile: Tile) -> Option<&UnitSnapshot> {
        self.units.iter().find(|u| u.position == Some(tile))
    }

    /// Effects on `tile`; empty for tiles off the board.
    pub fn tile_effects(&self, tile: Tile) -> &[TileEffectSnapshot] {
        if !self.contains(tile) {
            return &[];
        }
        &self.tile_effects[tile.index(self.cols)]
    }

    /// True when any tile carries an effect.
    pub fn has_tile_effects(&self) -> bool {
        self.tile_effects.iter().any(|e| !e.is_empty())
    }

    /// An id no unit in this state or any of its ancestors has used.
    pub fn next_unit_id(&self) -> UnitId {
        UnitId(self.next_id)
    }

    /// Returns a state with the player's health set to `player_hp`.
    pub fn with_player_hp(&self, player_hp: i32) -> GameState {
        GameState {
            player_hp,
            ..self.clone()
        }
    }

    /// Returns a state with `unit` appended.
    pub fn with_unit(&self, unit: UnitSnapshot) -> GameState {
        let mut next = self.clone();
        next.next_id = next.next_id.max(unit.id.0.saturating_add(1));
        next.units_mut().push(unit);
        next
    }

    /// Returns a state where the unit sharing `unit.id` is replaced by `unit`.
    /// Unknown ids leave the state unchanged.
    pub fn with_unit_replaced(&self, unit: UnitSnapshot) -> GameState {
        let Some(idx) = self.units.iter().position(|u| u.id == unit.id) else {
            return self.clone();
        };
        let mut next = self.clone();
        next.units_mut()[idx] = unit;
        next
    }

    /// Returns a state with unit `id` removed.
    pub fn without_unit(&self, id: UnitId) -> GameState {
        let mut next = self.clone();
        next.units_mut().retain(|u| u.id != id);
        next
    }

    /// Returns a state where `tile` carries exactly `effects`.
    pub fn with_tile_effects(&self, tile: Tile, effects: Vec<TileEffectSnapshot>) -> GameState {
        if !self.contains(tile) {
            return self.clone();
        }
        let mut next = self.clone();
        let cols = next.cols;
        Arc::make_mut(&mut next.tile_effects)[tile.index(cols)] = effects;
        next
    }

    pub(crate) fn units_mut(&mut self) -> &mut Vec<UnitSnapshot> {
        Arc::make_mut(&mut self.units)
    }

    pub(crate) fn tile_effects_mut(&mut self) -> &mut Vec<Vec<TileEffectSnapshot>> {
        Arc::make_mut(&mut self.tile_effects)
    }

    pub(crate) fn set_player_hp(&mut self, player_hp: i32) {
        self.player_hp = player_hp;
    }
}

impl Occupancy for GameState {
    fn rows(&self) -> u8 {
        self.rows
    }

    fn cols(&self) -> u8 {
        self.cols
    }

    fn occupant(&self, tile: Tile) -> Option<Occupant> {
        self.unit_at(tile).map(|u| Occupant {
            team: u.team,
            can_be_attacked: u.can_be_attacked(),
        })
    }

    fn is_blocked(&self, tile: Tile) -> bool {
        self.tile_effects(tile).iter().any(|e| e.occupies_tile)
    }
}
