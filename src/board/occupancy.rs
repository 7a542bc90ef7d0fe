//! Read-only view of tile occupancy shared by snapshots and live boards.

use super::tile::{Team, Tile};

/// What the movement rules need to know about a unit standing on a tile.
///
/// Carries no id: live boards and snapshots number units differently, and
/// only the builder's `Roster` maps between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occupant {
    pub team: Team,
    pub can_be_attacked: bool,
}

/// Board dimensions plus per-tile occupancy.
///
/// Implemented by `GameState` and by live boards, so the movement resolver and
/// candidate enumeration work on either.
pub trait Occupancy {
    fn rows(&self) -> u8;

    fn cols(&self) -> u8;

    /// The unit standing on `tile`, if any.
    fn occupant(&self, tile: Tile) -> Option<Occupant>;

    /// True when a tile effect occupies `tile` even without a unit.
    fn is_blocked(&self, tile: Tile) -> bool;

    /// True when the tile holds neither a unit nor a blocking effect.
    fn is_free(&self, tile: Tile) -> bool {
        self.occupant(tile).is_none() && !self.is_blocked(tile)
    }

    fn contains(&self, tile: Tile) -> bool {
        tile.row < self.rows() && tile.col < self.cols()
    }

    /// Every tile in row-major order.
    fn tiles(&self) -> Vec<Tile> {
        let (rows, cols) = (self.rows(), self.cols());
        (0..rows)
            .flat_map(|r| (0..cols).map(move |c| Tile::new(r, c)))
            .collect()
    }
}
