//! Spawn placement.

use rand::rngs::SmallRng;

use crate::board::{GameState, Occupancy, Team, Tile, UnitKind, UnitSnapshot};
use crate::search::SearchEngine;

use super::{select, Decision, SelectError};

/// Stats of a unit about to be spawned by a card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitTemplate {
    pub kind: UnitKind,
    pub health: i32,
    pub damage: i32,
    pub lifetime: i32,
    pub worth: f32,
    pub moves_per_turn: u8,
}

impl UnitTemplate {
    /// The archetype's default stats with an infinite lifetime.
    pub fn of(kind: UnitKind) -> Self {
        let stats = kind.base_stats();
        UnitTemplate {
            kind,
            health: stats.health,
            damage: stats.damage,
            lifetime: -1,
            worth: stats.worth,
            moves_per_turn: stats.moves_per_turn,
        }
    }

    /// A snapshot of this template standing on `tile`.
    pub fn instantiate(&self, state: &GameState, team: Team, tile: Tile) -> UnitSnapshot {
        let mut unit = UnitSnapshot::new(state.next_unit_id(), team, self.kind, tile);
        unit.health = self.health;
        unit.damage = self.damage;
        unit.lifetime = self.lifetime;
        unit.worth = self.worth;
        unit.moves_per_turn = self.moves_per_turn;
        unit
    }
}

/// Free tiles on `team`'s back row, left to right.
pub fn spawn_candidates<O: Occupancy + ?Sized>(board: &O, team: Team) -> Vec<Tile> {
    let row = team.home_row(board.rows());
    (0..board.cols())
        .map(|col| Tile::new(row, col))
        .filter(|t| board.is_free(*t))
        .collect()
}

/// Chooses where the Boss spawns `template`.
///
/// `board` supplies the candidates; `root` is the built snapshot, or `None`
/// when building failed.
pub fn select_spawn<O: Occupancy + ?Sized>(
    search: &mut SearchEngine,
    rng: &mut SmallRng,
    board: &O,
    root: Option<&GameState>,
    template: &UnitTemplate,
    depth: i32,
) -> Result<Decision<Tile>, SelectError> {
    if board.rows() == 0 || board.cols() == 0 {
        return Err(SelectError::InvalidInput("board has no tiles".into()));
    }
    if template.health <= 0 {
        return Err(SelectError::InvalidInput(format!(
            "spawned {:?} would have {} health",
            template.kind, template.health
        )));
    }
    let candidates = spawn_candidates(board, Team::Boss);
    select(search, rng, root, candidates, depth, |state, tile| {
        state.with_unit(template.instantiate(state, Team::Boss, *tile))
    })
}
