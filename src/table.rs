//! In-memory live game.
//!
//! A mutable table of named units and tile effects that implements the live
//! collaborator traits. The binary drives decisions against it, and tests use
//! it to exercise the builder to selector to live unit round trip.

use crate::board::{
    GameState, Occupancy, Occupant, Team, Tile, TileEffectSnapshot, UnitEffectSnapshot, UnitKind,
};
use crate::builder::{LiveBoard, LiveStats, LiveUnit};

/// One unit on a live table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableUnit {
    pub name: String,
    pub team: Team,
    pub kind: UnitKind,
    pub position: Option<Tile>,
    pub health: i32,
    pub damage: i32,
    pub lifetime: i32,
    pub worth: f32,
    pub moves_per_turn: u8,
    pub effects: Vec<UnitEffectSnapshot>,
    pub alive: bool,
    /// Simulates a unit whose data cannot be read.
    pub corrupt: bool,
}

impl TableUnit {
    /// A living unit with the archetype's default stats.
    pub fn new(name: impl Into<String>, team: Team, kind: UnitKind, position: Option<Tile>) -> Self {
        let stats = kind.base_stats();
        TableUnit {
            name: name.into(),
            team,
            kind,
            position,
            health: stats.health,
            damage: stats.damage,
            lifetime: -1,
            worth: stats.worth,
            moves_per_turn: stats.moves_per_turn,
            effects: Vec::new(),
            alive: true,
            corrupt: false,
        }
    }

    fn can_be_attacked(&self) -> bool {
        self.effects.iter().all(|e| e.can_be_attacked)
    }
}

impl LiveUnit for TableUnit {
    fn team(&self) -> Team {
        self.team
    }

    fn kind(&self) -> UnitKind {
        self.kind
    }

    fn position(&self) -> Option<Tile> {
        self.position
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn stats(&self) -> Option<LiveStats> {
        if self.corrupt {
            return None;
        }
        Some(LiveStats {
            health: self.health,
            damage: self.damage,
            lifetime: self.lifetime,
            worth: self.worth,
            moves_per_turn: self.moves_per_turn,
        })
    }

    fn effects(&self) -> Option<Vec<UnitEffectSnapshot>> {
        if self.corrupt {
            return None;
        }
        Some(self.effects.clone())
    }
}

/// A live board with its units.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    rows: u8,
    cols: u8,
    player_hp: Option<i32>,
    units: Vec<TableUnit>,
    tile_effects: Vec<Vec<TileEffectSnapshot>>,
}

impl Table {
    /// Creates an empty table with readable player health.
    pub fn new(rows: u8, cols: u8, player_hp: i32) -> Self {
        Table {
            rows,
            cols,
            player_hp: Some(player_hp),
            units: Vec::new(),
            tile_effects: vec![Vec::new(); rows as usize * cols as usize],
        }
    }

    /// Rebuilds a live table from a snapshot. Units are named after their
    /// team and snapshot id, e.g. `b0` or `p3`.
    pub fn from_state(state: &GameState) -> Self {
        let mut table = Table::new(state.rows(), state.cols(), state.player_hp());
        for tile in state.tiles() {
            let effects = state.tile_effects(tile);
            if !effects.is_empty() {
                table.set_tile_effects(tile, effects.to_vec());
            }
        }
        for u in state.units() {
            table.add(TableUnit {
                name: format!("{}{}", u.team.notation_char(), u.id.0),
                team: u.team,
                kind: u.kind,
                position: u.position,
                health: u.health,
                damage: u.damage,
                lifetime: u.lifetime,
                worth: u.worth,
                moves_per_turn: u.moves_per_turn,
                effects: u.effects.to_vec(),
                alive: true,
                corrupt: false,
            });
        }
        table
    }

    /// Adds a unit at the end of the unit list.
    pub fn add(&mut self, unit: TableUnit) {
        self.units.push(unit);
    }

    /// Returns every unit, dead ones included, in insertion order.
    pub fn units(&self) -> &[TableUnit] {
        &self.units
    }

    pub fn units_mut(&mut self) -> &mut [TableUnit] {
        &mut self.units
    }

    /// Replaces the effects on `tile`. Ignored for tiles off the board.
    pub fn set_tile_effects(&mut self, tile: Tile, effects: Vec<TileEffectSnapshot>) {
        if self.contains(tile) {
            let cols = self.cols;
            self.tile_effects[tile.index(cols)] = effects;
        }
    }

    /// `None` simulates an unreadable player.
    pub fn set_player_hp(&mut self, player_hp: Option<i32>) {
        self.player_hp = player_hp;
    }
}

impl Occupancy for Table {
    fn rows(&self) -> u8 {
        self.rows
    }

    fn cols(&self) -> u8 {
        self.cols
    }

    fn occupant(&self, tile: Tile) -> Option<Occupant> {
        self.units
            .iter()
            .find(|u| u.alive && u.position == Some(tile))
            .map(|u| Occupant {
                team: u.team,
                can_be_attacked: u.can_be_attacked(),
            })
    }

    fn is_blocked(&self, tile: Tile) -> bool {
        self.contains(tile)
            && self.tile_effects[tile.index(self.cols)]
                .iter()
                .any(|e| e.occupies_tile)
    }
}

impl LiveBoard for Table {
    fn player_hp(&self) -> Option<i32> {
        self.player_hp
    }

    fn tile_effects(&self, tile: Tile) -> Option<Vec<TileEffectSnapshot>> {
        if !self.contains(tile) {
            return None;
        }
        Some(self.tile_effects[tile.index(self.cols)].clone())
    }
}
