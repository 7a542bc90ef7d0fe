//! State builder: the boundary between a live game and the search.
//!
//! Reads a live board and its units through the collaborator traits and
//! produces an immutable root `GameState`, plus a `Roster` that maps snapshot
//! ids back to the live units they were copied from.

use tracing::warn;

use crate::board::{
    GameState, Occupancy, Team, Tile, TileEffectSnapshot, UnitEffectSnapshot, UnitId, UnitKind,
    UnitSnapshot,
};

/// A live board the builder can copy.
///
/// Read accessors return `None` when the underlying data is unavailable.
pub trait LiveBoard: Occupancy {
    fn player_hp(&self) -> Option<i32>;

    /// Active effects on `tile`.
    fn tile_effects(&self, tile: Tile) -> Option<Vec<TileEffectSnapshot>>;
}

/// Mutable stats of a live unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiveStats {
    pub health: i32,
    pub damage: i32,
    /// -1 means infinite.
    pub lifetime: i32,
    pub worth: f32,
    pub moves_per_turn: u8,
}

/// A live unit the builder can copy.
pub trait LiveUnit {
    fn team(&self) -> Team;

    fn kind(&self) -> UnitKind;

    /// `None` for units not placed on the board.
    fn position(&self) -> Option<Tile>;

    fn is_alive(&self) -> bool;

    fn stats(&self) -> Option<LiveStats>;

    fn effects(&self) -> Option<Vec<UnitEffectSnapshot>>;
}

/// Snapshot id to live unit mapping.
///
/// Ids are positions in the list of living units, in the order the caller
/// supplied them.
#[derive(Debug)]
pub struct Roster<'a, U> {
    units: Vec<&'a U>,
}

impl<'a, U: LiveUnit> Roster<'a, U> {
    /// Collects the living units of `units`, preserving order.
    pub fn of(units: &'a [U]) -> Self {
        Roster {
            units: units.iter().filter(|u| u.is_alive()).collect(),
        }
    }

    /// The live unit behind `id`, or `None` if the id is out of range.
    pub fn get(&self, id: UnitId) -> Option<&'a U> {
        self.units.get(id.index()).copied()
    }

    /// Number of living units.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Living units with their snapshot ids.
    pub fn iter(&self) -> impl Iterator<Item = (UnitId, &'a U)> + '_ {
        self.units
            .iter()
            .enumerate()
            .map(|(i, u)| (UnitId(i as u16), *u))
    }
}

/// Root snapshot plus the mapping back to live units.
#[derive(Debug)]
pub struct Snapshot<'a, U> {
    pub state: GameState,
    pub roster: Roster<'a, U>,
}

/// Builds snapshots from live collaborators.
pub struct StateBuilder;

impl StateBuilder {
    /// Copies `board` and the living `units` into a root snapshot.
    ///
    /// Returns `None`, with a warning, if anything cannot be read or a unit is
    /// off the board.
    pub fn build<'a, B, U>(board: &B, units: &'a [U]) -> Option<Snapshot<'a, U>>
    where
        B: LiveBoard + ?Sized,
        U: LiveUnit,
    {
        let (rows, cols) = (board.rows(), board.cols());
        if rows == 0 || cols == 0 {
            warn!(rows, cols, "live board has no tiles");
            return None;
        }
        let Some(player_hp) = board.player_hp() else {
            warn!("player hp unavailable");
            return None;
        };

        let roster = Roster::of(units);
        if roster.len() > u16::MAX as usize {
            warn!(units = roster.len(), "too many units to snapshot");
            return None;
        }

        let mut state = GameState::new(rows, cols, player_hp);

        for tile in board.tiles() {
            let Some(effects) = board.tile_effects(tile) else {
                warn!(%tile, "tile effects unavailable");
                return None;
            };
            if !effects.is_empty() {
                state.tile_effects_mut()[tile.index(cols)] = effects;
            }
        }

        for (id, unit) in roster.iter() {
            let snapshot = Self::copy_unit(board, id, unit)?;
            if let Some(tile) = snapshot.position {
                if state.unit_at(tile).is_some() {
                    warn!(%tile, "two units share a tile");
                    return None;
                }
            }
            state = state.with_unit(snapshot);
        }

        Some(Snapshot { state, roster })
    }

    fn copy_unit<B, U>(board: &B, id: UnitId, unit: &U) -> Option<UnitSnapshot>
    where
        B: LiveBoard + ?Sized,
        U: LiveUnit,
    {
        let position = unit.position();
        if let Some(tile) = position {
            if !board.contains(tile) {
                warn!(unit = id.0, %tile, "unit outside the board");
                return None;
            }
        }
        let Some(stats) = unit.stats() else {
            warn!(unit = id.0, "unit stats unavailable");
            return None;
        };
        let Some(effects) = unit.effects() else {
            warn!(unit = id.0, "unit effects unavailable");
            return None;
        };

        Some(UnitSnapshot {
            id,
            team: unit.team(),
            kind: unit.kind(),
            position,
            health: stats.health,
            damage: stats.damage,
            lifetime: stats.lifetime,
            worth: stats.worth,
            moves_per_turn: stats.moves_per_turn,
            effects: effects.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{DurationKind, EffectId};
    use crate::table::{Table, TableUnit};

    fn table() -> Table {
        let mut t = Table::new(6, 5, 12);
        t.add(TableUnit::new("boss-rook", Team::Boss, UnitKind::Rook, Some(Tile::new(5, 0))));
        t.add(TableUnit::new("hero", Team::Player, UnitKind::Pawn, Some(Tile::new(1, 2))));
        t.add(TableUnit::new("reserve", Team::Boss, UnitKind::Knight, None));
        t
    }

    #[test]
    fn ids_follow_supplied_order() {
        let t = table();
        let snap = StateBuilder::build(&t, t.units()).unwrap();
        assert_eq!(snap.state.units().len(), 3);
        assert_eq!(snap.state.player_hp(), 12);
        for (i, u) in snap.state.units().iter().enumerate() {
            assert_eq!(u.id, UnitId(i as u16));
            assert_eq!(snap.roster.get(u.id).unwrap().kind(), u.kind);
        }
        assert_eq!(snap.roster.get(UnitId(0)).unwrap().name, "boss-rook");
        assert_eq!(snap.state.unit(UnitId(2)).unwrap().position, None);
        assert!(snap.roster.get(UnitId(3)).is_none());
    }

    #[test]
    fn dead_units_are_skipped() {
        let mut t = table();
        t.units_mut()[0].alive = false;
        let snap = StateBuilder::build(&t, t.units()).unwrap();
        assert_eq!(snap.state.units().len(), 2);
        assert_eq!(snap.roster.get(UnitId(0)).unwrap().name, "hero");
    }

    #[test]
    fn copies_tile_and_unit_effects() {
        let mut t = table();
        t.set_tile_effects(
            Tile::new(3, 3),
            vec![TileEffectSnapshot::new(EffectId(4), DurationKind::Temporary, 2, true)],
        );
        t.units_mut()[0]
            .effects
            .push(UnitEffectSnapshot::invulnerable(EffectId(1), DurationKind::Temporary, 2));
        let snap = StateBuilder::build(&t, t.units()).unwrap();
        assert!(snap.state.is_blocked(Tile::new(3, 3)));
        assert!(!snap.state.unit(UnitId(0)).unwrap().can_be_attacked());
    }

    #[test]
    fn fails_closed_on_unreadable_data() {
        let mut t = table();
        t.units_mut()[1].corrupt = true;
        assert!(StateBuilder::build(&t, t.units()).is_none());

        let mut t = table();
        t.set_player_hp(None);
        assert!(StateBuilder::build(&t, t.units()).is_none());
    }

    #[test]
    fn fails_closed_on_out_of_bounds_unit() {
        let mut t = table();
        t.units_mut()[1].position = Some(Tile::new(9, 0));
        assert!(StateBuilder::build(&t, t.units()).is_none());
    }

    #[test]
    fn fails_closed_on_shared_tile() {
        let mut t = table();
        t.units_mut()[1].position = Some(Tile::new(5, 0));
        assert!(StateBuilder::build(&t, t.units()).is_none());
    }
}
